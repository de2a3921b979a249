use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::sync::filter::Filterable;

/// Display placeholder for a document without a recorded size
pub const SIZE_PLACEHOLDER: &str = "N/A";
/// Display placeholder for a document without a status
pub const STATUS_PLACEHOLDER: &str = "Unknown";

/// A record owned by a remote collection
pub trait Record: Clone + Send + Sync + 'static {
    /// Singular noun used in user-facing messages
    const NOUN: &'static str;
    /// Collection path segment on the remote API
    const COLLECTION: &'static str;

    fn id(&self) -> u64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "fileUrl", default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl Document {
    pub fn size_display(&self) -> &str {
        match self.size.as_deref() {
            Some(size) if !size.trim().is_empty() => size,
            _ => SIZE_PLACEHOLDER,
        }
    }

    pub fn status_display(&self) -> &str {
        if self.status.trim().is_empty() {
            STATUS_PLACEHOLDER
        } else {
            &self.status
        }
    }
}

impl Record for Document {
    const NOUN: &'static str = "document";
    const COLLECTION: &'static str = "documents";

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFacets {
    /// Exact status to keep, or all statuses when unset
    pub status: Option<String>,
}

impl Filterable for Document {
    type Facets = DocumentFacets;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str(), self.status.as_str()]
    }

    fn matches_facets(&self, facets: &DocumentFacets) -> bool {
        facets
            .status
            .as_ref()
            .map_or(true, |status| &self.status == status)
    }
}

/// File attached to a document upload
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Read an upload from disk, keeping only the file name for the wire
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self { file_name, bytes })
    }
}

/// Fields submitted when uploading a new document
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub name: String,
    pub description: String,
    pub file: Upload,
}

/// Fields submitted when renaming or re-describing a document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEdit {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmployeeStatus {
    Approved,
    Blocked,
    Rejected,
    Other(String),
}

impl EmployeeStatus {
    pub const KNOWN: [EmployeeStatus; 3] = [
        EmployeeStatus::Approved,
        EmployeeStatus::Blocked,
        EmployeeStatus::Rejected,
    ];

    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "approved" => EmployeeStatus::Approved,
            "blocked" => EmployeeStatus::Blocked,
            "rejected" => EmployeeStatus::Rejected,
            _ => EmployeeStatus::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EmployeeStatus::Approved => "approved",
            EmployeeStatus::Blocked => "blocked",
            EmployeeStatus::Rejected => "rejected",
            EmployeeStatus::Other(s) => s,
        }
    }

    /// Value of a record that carries no status at all
    pub fn missing() -> Self {
        EmployeeStatus::Other(String::new())
    }

    /// Label for tables, with a placeholder for a missing status
    pub fn display(&self) -> &str {
        match self.as_str() {
            "" => STATUS_PLACEHOLDER,
            value => value,
        }
    }
}

impl Default for EmployeeStatus {
    fn default() -> Self {
        EmployeeStatus::Approved
    }
}

impl From<String> for EmployeeStatus {
    fn from(value: String) -> Self {
        EmployeeStatus::parse(&value)
    }
}

impl From<EmployeeStatus> for String {
    fn from(status: EmployeeStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccessLevel {
    Edit,
    View,
    None,
    Other(String),
}

impl AccessLevel {
    pub const KNOWN: [AccessLevel; 3] = [AccessLevel::Edit, AccessLevel::View, AccessLevel::None];

    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "edit" => AccessLevel::Edit,
            "view" => AccessLevel::View,
            "none" => AccessLevel::None,
            _ => AccessLevel::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AccessLevel::Edit => "edit",
            AccessLevel::View => "view",
            AccessLevel::None => "none",
            AccessLevel::Other(s) => s,
        }
    }

    /// Value of a record that carries no access level at all
    pub fn missing() -> Self {
        AccessLevel::Other(String::new())
    }

    /// Label for tables, with a placeholder for a missing access level
    pub fn display(&self) -> &str {
        match self.as_str() {
            "" => STATUS_PLACEHOLDER,
            value => value,
        }
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        AccessLevel::View
    }
}

impl From<String> for AccessLevel {
    fn from(value: String) -> Self {
        AccessLevel::parse(&value)
    }
}

impl From<AccessLevel> for String {
    fn from(access: AccessLevel) -> Self {
        access.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default = "EmployeeStatus::missing")]
    pub status: EmployeeStatus,
    #[serde(default = "AccessLevel::missing")]
    pub access: AccessLevel,
}

impl Record for Employee {
    const NOUN: &'static str = "employee";
    const COLLECTION: &'static str = "employees";

    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeFacets {
    pub status: Option<EmployeeStatus>,
    pub access: Option<AccessLevel>,
}

impl Filterable for Employee {
    type Facets = EmployeeFacets;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn matches_facets(&self, facets: &EmployeeFacets) -> bool {
        let status_ok = facets.status.as_ref().map_or(true, |s| &self.status == s);
        let access_ok = facets.access.as_ref().map_or(true, |a| &self.access == a);
        status_ok && access_ok
    }
}

/// Fields submitted when adding an employee
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub status: EmployeeStatus,
    pub access: AccessLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_deserialization_with_missing_optionals() {
        let json = r#"{"id": 3, "name": "Policy", "description": "HR policy", "status": "Active"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.size, None);
        assert_eq!(doc.size_display(), "N/A");
        assert_eq!(doc.file_url, None);

        let json = r#"{"id": 4, "name": "Scan", "size": "12.5 KB", "fileUrl": "/uploads/scan.pdf"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.size_display(), "12.5 KB");
        assert_eq!(doc.file_url.as_deref(), Some("/uploads/scan.pdf"));
        assert_eq!(doc.status_display(), "Unknown");
    }

    #[test]
    fn test_employee_enums_tolerate_unknown_values() {
        let json = r#"[
            {"id": 1, "name": "Alice", "email": "alice@corp.io", "status": "approved", "access": "edit"},
            {"id": 2, "name": "Bob", "email": "bob@corp.io", "status": "rejected\t", "access": "View"},
            {"id": 3, "name": "Cy", "email": "cy@corp.io", "status": "Active", "access": "User"}
        ]"#;
        let employees: Vec<Employee> = serde_json::from_str(json).unwrap();

        assert_eq!(employees[0].status, EmployeeStatus::Approved);
        assert_eq!(employees[1].status, EmployeeStatus::Rejected);
        assert_eq!(employees[1].access, AccessLevel::View);
        assert_eq!(employees[2].status, EmployeeStatus::Other("Active".to_string()));
        assert_eq!(employees[2].access.as_str(), "User");
    }

    #[test]
    fn test_employee_serializes_lowercase_values() {
        let employee = NewEmployee {
            name: "Dana".to_string(),
            email: "dana@corp.io".to_string(),
            status: EmployeeStatus::Blocked,
            access: AccessLevel::None,
        };
        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["status"], "blocked");
        assert_eq!(value["access"], "none");
    }

    #[test]
    fn test_missing_status_and_access_stay_missing() {
        let json = r#"{"id": 1, "name": "Nia", "email": "nia@corp.io"}"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.status, EmployeeStatus::missing());
        assert_eq!(employee.access, AccessLevel::missing());
        assert_eq!(employee.status.display(), "Unknown");
        assert_eq!(employee.access.display(), "Unknown");

        for status in EmployeeStatus::KNOWN {
            let facets = EmployeeFacets {
                status: Some(status),
                access: None,
            };
            assert!(!employee.matches_facets(&facets));
        }
        for access in AccessLevel::KNOWN {
            let facets = EmployeeFacets {
                status: None,
                access: Some(access),
            };
            assert!(!employee.matches_facets(&facets));
        }

        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["status"], "");
        assert_eq!(value["access"], "");
    }

    #[test]
    fn test_known_values_are_normalized_and_others_kept_verbatim() {
        let json = r#"{"id": 2, "name": "Oz", "email": "oz@corp.io", "status": "Approved ", "access": "Admin "}"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["status"], "approved");
        assert_eq!(value["access"], "Admin");
    }

    #[test]
    fn test_unknown_facet_value_never_matches_known_filter() {
        let employee = Employee {
            id: 9,
            name: "Eve".to_string(),
            email: "eve@corp.io".to_string(),
            status: EmployeeStatus::Other("Active".to_string()),
            access: AccessLevel::Other("User".to_string()),
        };
        let facets = EmployeeFacets {
            status: Some(EmployeeStatus::Approved),
            access: None,
        };
        assert!(!employee.matches_facets(&facets));
        assert!(employee.matches_facets(&EmployeeFacets::default()));
    }
}
