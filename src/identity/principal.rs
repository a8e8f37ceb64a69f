use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resolver::Role;

/// Institution-specific user record, distinct from the provider's bare
/// identity. Exactly one profile exists per authenticated identity; it is
/// created lazily on first successful authentication and never mutated by
/// this service afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row shape for the lazy-creation insert.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl NewProfile {
    /// Display name defaults to the email local part when unset.
    pub fn with_default_name(id: String, email: String, name: Option<String>) -> Self {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| {
                email
                    .split('@')
                    .next()
                    .filter(|s| !s.is_empty())
                    .unwrap_or("User")
                    .to_string()
            });
        let role = super::resolver::derive_role(&email);
        Self { id, email, name, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_defaults_to_local_part() {
        let p = NewProfile::with_default_name(
            "u1".into(),
            "new.student@matrusri.edu.in".into(),
            None,
        );
        assert_eq!(p.name, "new.student");
        assert_eq!(p.role, Role::Student);
    }

    #[test]
    fn explicit_name_wins() {
        let p = NewProfile::with_default_name(
            "u2".into(),
            "head@warden.matrusri.edu.in".into(),
            Some("Head Warden".into()),
        );
        assert_eq!(p.name, "Head Warden");
        assert_eq!(p.role, Role::Warden);
    }

    #[test]
    fn blank_name_falls_back() {
        let p = NewProfile::with_default_name("u3".into(), "@x".into(), Some("  ".into()));
        assert_eq!(p.name, "User");
    }
}
