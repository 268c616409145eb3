//! Toast-style feedback for finished operations.

use crate::dashboard::DashboardError;
use crate::entity::{Entity, Operation};
use std::fmt;

/// One message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The operation went through
    Success(String),
    /// The operation failed
    Error(String),
}

impl Notification {
    /// Text without the kind
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }

    /// Whether this reports a failure
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(message) => write!(f, "✓ {message}"),
            Self::Error(message) => write!(f, "✗ {message}"),
        }
    }
}

/// Success toast for a mutation; reads are silent
#[must_use]
pub fn success<E: Entity>(operation: Operation) -> Option<Notification> {
    let verb = match operation {
        Operation::Add => "created",
        Operation::Update => "updated",
        Operation::Delete => "deleted",
        Operation::Publish => "status updated",
        Operation::GetList | Operation::GetOne => return None,
    };
    Some(Notification::Success(format!("{} {verb} successfully", E::TITLE)))
}

/// Error toast for a failed operation
///
/// Server and transport failures carry the message already extracted by the
/// slice. Anything unexpected, such as a timeout waiting for the result,
/// shows the operation's fixed fallback text.
#[must_use]
pub fn failure<E: Entity>(operation: Operation, error: &DashboardError) -> Notification {
    let message = match error {
        DashboardError::Operation { message, .. } => message.clone(),
        DashboardError::Invalid(fields) => {
            format!("Please fix the highlighted fields: {}", fields.join(", "))
        },
        _ => E::fallback_message(operation),
    };
    Notification::Error(message)
}

/// Toast for any outcome
#[must_use]
pub fn outcome<E: Entity, T>(
    operation: Operation,
    result: &Result<T, DashboardError>,
) -> Option<Notification> {
    match result {
        Ok(_) => success::<E>(operation),
        Err(error) => Some(failure::<E>(operation, error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Blogs, Tags};
    use faraway_admin_runtime::StoreError;

    #[test]
    fn test_success_messages() {
        assert_eq!(
            success::<Blogs>(Operation::Add),
            Some(Notification::Success("Blog created successfully".to_string()))
        );
        assert_eq!(
            success::<Blogs>(Operation::Update).map(|n| n.message().to_string()),
            Some("Blog updated successfully".to_string())
        );
        assert_eq!(
            success::<Tags>(Operation::Delete).map(|n| n.message().to_string()),
            Some("Tag deleted successfully".to_string())
        );
        assert_eq!(success::<Tags>(Operation::GetList), None);
    }

    #[test]
    fn test_failure_carries_extracted_message() {
        let error = DashboardError::Operation {
            operation: Operation::Delete,
            message: "Blog not found".to_string(),
        };
        let toast = failure::<Blogs>(Operation::Delete, &error);
        assert!(toast.is_error());
        assert_eq!(toast.message(), "Blog not found");
    }

    #[test]
    fn test_unexpected_failure_uses_fallback() {
        let error = DashboardError::Store(StoreError::Timeout);
        assert_eq!(failure::<Blogs>(Operation::Delete, &error).message(), "Failed to delete blog");
    }

    #[test]
    fn test_outcome() {
        let ok: Result<(), DashboardError> = Ok(());
        assert_eq!(outcome::<Tags, _>(Operation::GetOne, &ok), None);
        assert_eq!(
            outcome::<Tags, _>(Operation::Add, &ok).map(|n| n.to_string()),
            Some("✓ Tag created successfully".to_string())
        );
    }
}
