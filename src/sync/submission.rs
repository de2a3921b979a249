//! In-flight guard and status message for a single write path

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("A previous submission is still in progress")]
    InFlight,
}

/// Types of status messages
#[derive(Debug, Clone, PartialEq)]
pub enum StatusType {
    Info,
    Success,
    Warning,
    Error,
    Loading,
}

/// Status message with type and content
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>, status_type: StatusType) -> Self {
        Self {
            message: message.into(),
            status_type,
            timestamp: chrono::Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, StatusType::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, StatusType::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, StatusType::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, StatusType::Error)
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self::new(message, StatusType::Loading)
    }

    pub fn is_error(&self) -> bool {
        self.status_type == StatusType::Error
    }
}

/// Tracks whether a submission is outstanding and the last outcome message.
///
/// At most one submission may be in flight; each new message replaces the
/// previous one.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    in_flight: bool,
    message: Option<StatusMessage>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the write path, clearing the previous message
    pub fn begin(&mut self) -> Result<(), SubmitError> {
        if self.in_flight {
            return Err(SubmitError::InFlight);
        }
        self.in_flight = true;
        self.message = None;
        Ok(())
    }

    pub fn succeed(&mut self, message: impl Into<String>) {
        self.in_flight = false;
        self.message = Some(StatusMessage::success(message));
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.in_flight = false;
        self.message = Some(StatusMessage::error(message));
    }

    /// Report a problem found before anything was sent
    pub fn reject(&mut self, message: impl Into<String>) {
        self.message = Some(StatusMessage::warning(message));
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}
