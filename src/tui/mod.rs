//! Terminal user interface for deskboard

pub mod app;
pub mod components;
pub mod context;
pub mod events;
pub mod operations;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::{App, Screen};
pub use context::AppContext;
pub use events::AppEvent;
