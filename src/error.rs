use crate::billing::SubscriptionError;

/// The main error type for leadgate
#[derive(Debug, thiserror::Error)]
pub enum LeadgateError {
    #[error(transparent)]
    Subscription(#[from] SubscriptionError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl LeadgateError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the subscription error, if this is one.
    pub fn as_subscription(&self) -> Option<&SubscriptionError> {
        match self {
            Self::Subscription(err) => Some(err),
            _ => None,
        }
    }

    /// Check if the error was caused by caller input (bad plan id, bad billing
    /// type, invalid config) rather than by a collaborator failing.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Subscription(_) | Self::Config(_))
    }
}

/// Result type alias for leadgate operations
pub type Result<T> = std::result::Result<T, LeadgateError>;

impl From<serde_json::Error> for LeadgateError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            LeadgateError::Storage(format!("Malformed subscription record: {}", err))
        } else {
            LeadgateError::Internal(format!("JSON serialization error: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_error_is_transparent() {
        let err: LeadgateError = SubscriptionError::InvalidBillingType {
            value: "weekly".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid billing type 'weekly': expected 'monthly' or 'annual'"
        );
        assert!(err.as_subscription().is_some());
    }

    #[test]
    fn test_classification() {
        assert!(LeadgateError::config("bad level").is_client_error());
        assert!(!LeadgateError::storage("connection reset").is_client_error());
        assert!(!LeadgateError::internal("lock poisoned").is_client_error());
    }

    #[test]
    fn test_from_serde_json() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: LeadgateError = err.into();
        assert!(matches!(err, LeadgateError::Storage(_)));
    }

    #[test]
    fn test_from_anyhow() {
        let err: LeadgateError = anyhow::anyhow!("backend unavailable").into();
        assert_eq!(err.to_string(), "backend unavailable");
    }
}
