use thiserror::Error;

/// Failures that cause a notification to be dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Missing identifier for screen '{screen}' (looked at {fields})")]
    MissingIdentifier { screen: String, fields: String },

    #[error("Navigation failed: {0}")]
    NavigationFailure(String),
}

impl NotificationError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        NotificationError::MalformedPayload(reason.into())
    }
}
