//! Remote REST API module
//!
//! Typed clients for the two collections served by the admin backend. Both
//! implement [`RemoteResource`], the seam the synchronization layer is generic
//! over.

pub mod client;
pub mod documents;
pub mod employees;
pub mod errors;
pub mod resource;

pub use client::ApiClient;
pub use documents::DocumentsApi;
pub use employees::EmployeesApi;
pub use errors::{ApiError, Operation};
pub use resource::RemoteResource;
