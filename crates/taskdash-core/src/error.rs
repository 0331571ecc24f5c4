use taskdash_shared::ParsePriorityError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaskError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// Transport failure, non-success status, or an undecodable body.
    #[error("task service request failed: {0}")]
    Service(String),

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("a submission is already in progress")]
    Busy,

    #[error("task not found: {0}")]
    NotFound(String),
}

impl TaskError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service(_))
    }
}

impl From<reqwest::Error> for TaskError {
    fn from(err: reqwest::Error) -> Self {
        Self::Service(err.to_string())
    }
}

impl From<ParsePriorityError> for TaskError {
    fn from(err: ParsePriorityError) -> Self {
        Self::validation("priority", err.to_string())
    }
}

/// User-facing outcome of an action. Every failed action produces an
/// `Error` notice regardless of which component ran it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn failure(action: &str, err: &TaskError) -> Self {
        let text = match err {
            TaskError::Service(_) => format!("Failed to {action}. Please try again."),
            other => format!("Failed to {action}: {other}"),
        };
        Self::Error(text)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Info(text) | Self::Error(text) => text,
        }
    }
}
