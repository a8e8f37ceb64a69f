//! Unified authentication/profile error model and mapping helpers.
//! This module provides the common error enum used across the session service,
//! the auth providers and the HTTP frontend, along with an HTTP status mapper.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthError {
    /// The email does not carry one of the accepted institutional suffixes.
    /// Raised before any provider call is made.
    #[error("please use your official college email (@matrusri.edu.in): {email}")]
    DomainRejected { email: String },
    /// The provider handed back an identity we cannot make sense of
    /// (missing id or email). Unreachable from local validation, since role
    /// derivation is total over the closed `Role` enum.
    #[error("invalid college email format: {detail}")]
    InvalidEmailFormat { detail: String },
    #[error("credentials rejected by the identity provider")]
    CredentialsRejected,
    #[error("failed to load user profile: {reason}")]
    ProfileFetchFailed { reason: String },
    #[error("failed to create user profile: {reason}")]
    ProfileCreateFailed { reason: String },
    #[error("identity provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },
}

impl AuthError {
    pub fn profile_fetch<S: Into<String>>(reason: S) -> Self {
        AuthError::ProfileFetchFailed { reason: reason.into() }
    }

    pub fn profile_create<S: Into<String>>(reason: S) -> Self {
        AuthError::ProfileCreateFailed { reason: reason.into() }
    }

    pub fn unavailable<S: Into<String>>(reason: S) -> Self {
        AuthError::ProviderUnavailable { reason: reason.into() }
    }

    /// Short stable label, used in log lines and JSON error bodies.
    pub fn code_str(&self) -> &'static str {
        match self {
            AuthError::DomainRejected { .. } => "domain_rejected",
            AuthError::InvalidEmailFormat { .. } => "invalid_email_format",
            AuthError::CredentialsRejected => "credentials_rejected",
            AuthError::ProfileFetchFailed { .. } => "profile_fetch_failed",
            AuthError::ProfileCreateFailed { .. } => "profile_create_failed",
            AuthError::ProviderUnavailable { .. } => "provider_unavailable",
        }
    }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AuthError::DomainRejected { .. } => 400,
            AuthError::InvalidEmailFormat { .. } => 400,
            AuthError::CredentialsRejected => 401,
            AuthError::ProfileFetchFailed { .. } => 502,
            AuthError::ProfileCreateFailed { .. } => 502,
            AuthError::ProviderUnavailable { .. } => 503,
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_mapping() {
        assert_eq!(
            AuthError::DomainRejected { email: "a@b".into() }.http_status(),
            400
        );
        assert_eq!(AuthError::CredentialsRejected.http_status(), 401);
        assert_eq!(AuthError::profile_fetch("boom").http_status(), 502);
        assert_eq!(AuthError::profile_create("boom").http_status(), 502);
        assert_eq!(AuthError::unavailable("down").http_status(), 503);
    }

    #[test]
    fn serde_tagging_is_stable() {
        let e = AuthError::CredentialsRejected;
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["type"], "credentials_rejected");
        let e = AuthError::profile_fetch("timeout");
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["type"], "profile_fetch_failed");
        assert_eq!(v["reason"], "timeout");
    }

    #[test]
    fn code_labels() {
        assert_eq!(
            AuthError::DomainRejected { email: String::new() }.code_str(),
            "domain_rejected"
        );
        assert_eq!(AuthError::unavailable("x").code_str(), "provider_unavailable");
    }
}
