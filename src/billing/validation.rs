//! Input validation for subscription operations.
//!
//! Organization ids come from the identity collaborator and end up in store
//! keys and log lines, so they are checked before use.

use super::error::SubscriptionError;

/// Maximum length for organization IDs.
const MAX_ORGANIZATION_ID_LENGTH: usize = 256;

/// Validate an organization ID.
///
/// Organization IDs must:
/// - Not be empty
/// - Not exceed 256 characters
/// - Contain only alphanumeric characters, underscores, and hyphens (UUIDs pass)
///
/// # Errors
///
/// Returns `SubscriptionError::InvalidOrganizationId` if validation fails.
pub fn validate_organization_id(id: &str) -> Result<(), SubscriptionError> {
    if id.is_empty() {
        return Err(SubscriptionError::InvalidOrganizationId {
            id: id.to_string(),
            reason: "organization_id cannot be empty".to_string(),
        });
    }

    if id.len() > MAX_ORGANIZATION_ID_LENGTH {
        return Err(SubscriptionError::InvalidOrganizationId {
            id: sanitize_for_error(id),
            reason: format!(
                "organization_id exceeds maximum length of {}",
                MAX_ORGANIZATION_ID_LENGTH
            ),
        });
    }

    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(SubscriptionError::InvalidOrganizationId {
            id: sanitize_for_error(id),
            reason: "organization_id contains invalid characters (only alphanumeric, underscore, and hyphen allowed)".to_string(),
        });
    }

    Ok(())
}

/// Sanitize a string for error messages to prevent log injection.
fn sanitize_for_error(s: &str) -> String {
    let sanitized: String = s
        .chars()
        .take(50)
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '?' })
        .collect();

    if s.chars().count() > 50 {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
