//! Remote resource synchronization
//!
//! One generic implementation of the fetch / filter / mutate cycle shared by
//! every list view: a pure [`ResourceMirror`] that folds completed calls into
//! local state, and a [`ResourceSync`] driver that issues the calls itself.

pub mod filter;
pub mod mirror;
pub mod remote;
pub mod submission;

pub use filter::{FilterState, Filterable};
pub use mirror::{DeleteConfirmation, ResourceMirror, SyncEvent, SyncOutcome};
pub use remote::ResourceSync;
pub use submission::{StatusMessage, StatusType, SubmitError, Submission};
