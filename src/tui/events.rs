//! Events delivered to the TUI loop by background tasks

use crate::api::ApiError;
use crate::models::{Document, Employee};
use crate::sync::SyncEvent;

/// Completion of a remote call, tagged with the screen that issued it
#[derive(Debug)]
pub enum AppEvent {
    /// Documents list screen
    Documents(SyncEvent<Document>),
    /// Employees list screen
    Employees(SyncEvent<Employee>),
    /// Dashboard document collection
    DashboardDocuments(SyncEvent<Document>),
    /// Dashboard employee collection
    DashboardEmployees(SyncEvent<Employee>),
    /// New document form
    DocumentUploaded(Result<Document, ApiError>),
    /// New employee form
    EmployeeAdded(Result<Employee, ApiError>),
}
