//! Dashboard metrics computed from fetched collections

use std::collections::BTreeMap;

use crate::models::{Document, Employee};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_documents: usize,
    pub active_documents: usize,
    pub total_employees: usize,
    /// Employee count per status, sorted by status name
    pub employees_by_status: Vec<(String, usize)>,
    /// Employee count per access level, sorted by access name
    pub employees_by_access: Vec<(String, usize)>,
}

impl DashboardStats {
    pub fn from_records(documents: &[Document], employees: &[Employee]) -> Self {
        let active_documents = documents
            .iter()
            .filter(|doc| doc.status.trim().eq_ignore_ascii_case("active"))
            .count();

        Self {
            total_documents: documents.len(),
            active_documents,
            total_employees: employees.len(),
            employees_by_status: tally(employees.iter().map(|e| e.status.display())),
            employees_by_access: tally(employees.iter().map(|e| e.access.display())),
        }
    }

    /// Share of documents that are active, as a whole percentage
    pub fn active_percentage(&self) -> u16 {
        if self.total_documents == 0 {
            return 0;
        }
        ((self.active_documents * 100) / self.total_documents) as u16
    }
}

fn tally<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccessLevel, EmployeeStatus};

    fn document(id: u64, status: &str) -> Document {
        Document {
            id,
            name: format!("doc-{}", id),
            description: String::new(),
            size: None,
            status: status.to_string(),
            file_url: None,
        }
    }

    fn employee(id: u64, status: EmployeeStatus, access: AccessLevel) -> Employee {
        Employee {
            id,
            name: format!("emp-{}", id),
            email: format!("emp-{}@corp.io", id),
            status,
            access,
        }
    }

    #[test]
    fn test_stats_from_records() {
        let documents = vec![document(1, "Active"), document(2, "active "), document(3, "Archived"), document(4, "")];
        let employees = vec![
            employee(1, EmployeeStatus::Approved, AccessLevel::Edit),
            employee(2, EmployeeStatus::Approved, AccessLevel::View),
            employee(3, EmployeeStatus::Blocked, AccessLevel::View),
        ];

        let stats = DashboardStats::from_records(&documents, &employees);
        assert_eq!(stats.total_documents, 4);
        assert_eq!(stats.active_documents, 2);
        assert_eq!(stats.active_percentage(), 50);
        assert_eq!(stats.total_employees, 3);
        assert_eq!(
            stats.employees_by_status,
            vec![("approved".to_string(), 2), ("blocked".to_string(), 1)]
        );
        assert_eq!(
            stats.employees_by_access,
            vec![("edit".to_string(), 1), ("view".to_string(), 2)]
        );
    }

    #[test]
    fn test_empty_stats() {
        let stats = DashboardStats::from_records(&[], &[]);
        assert_eq!(stats, DashboardStats::default());
        assert_eq!(stats.active_percentage(), 0);
    }
}
