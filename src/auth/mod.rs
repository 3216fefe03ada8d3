//! Account creation and credential verification.
//!
//! Handlers in `api::auth` orchestrate these pieces: password hashing lives
//! in [`password`], field-level checks here.

pub mod password;

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password hashing or verification failed internally.
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// The supplied credentials do not match a known account.
    #[error("Invalid email or password")]
    InvalidCredentials,
}

/// Loose email shape check: something before and after a single '@',
/// with a dot in the domain part. Deliverability is not our problem.
pub fn email_looks_valid(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(email_looks_valid("user@example.com"));
        assert!(email_looks_valid("first.last@sub.domain.org"));
        assert!(!email_looks_valid("no-at-sign"));
        assert!(!email_looks_valid("@example.com"));
        assert!(!email_looks_valid("user@nodot"));
        assert!(!email_looks_valid("user@.com"));
        assert!(!email_looks_valid("user@com."));
    }
}
