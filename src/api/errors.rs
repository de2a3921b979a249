//! Remote API error types

use thiserror::Error;

use crate::models::Record;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Status {
        status: u16,
        body: String,
    },

    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Remote operations that can fail from a user's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// The single message shown for any failure of this operation.
    ///
    /// Transport, status and decode failures all map to the same text; the
    /// cause only goes to the log.
    pub fn failure_message<T: Record>(self) -> String {
        match self {
            Operation::Load => format!("Failed to fetch {}", T::COLLECTION),
            Operation::Create => format!("Failed to add {}", T::NOUN),
            Operation::Update => format!("Failed to edit {}", T::NOUN),
            Operation::Delete => format!("Failed to delete {}", T::NOUN),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operation::Load => "load",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Document, Employee};

    #[test]
    fn test_failure_messages_name_the_resource() {
        assert_eq!(Operation::Load.failure_message::<Document>(), "Failed to fetch documents");
        assert_eq!(Operation::Load.failure_message::<Employee>(), "Failed to fetch employees");
        assert_eq!(Operation::Update.failure_message::<Document>(), "Failed to edit document");
        assert_eq!(Operation::Delete.failure_message::<Employee>(), "Failed to delete employee");
    }

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 404,
            body: r#"{"error": "Employee not found"}"#.to_string(),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("Employee not found"));
    }
}
