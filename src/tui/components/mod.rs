//! Reusable UI components for the deskboard TUI

pub mod form_field;
pub mod resource_table;
pub mod status_display;

pub use form_field::{Form, FormField, FormFieldType, FormInput};
pub use resource_table::{ResourceTable, TableConfig};
pub use status_display::{message_style, StatusDisplay};
