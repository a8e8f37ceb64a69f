//! Email-domain identity resolution: institutional-domain validation and
//! role derivation. Pure and total; "invalid email" is only ever a concern
//! for [`is_institutional_email`].

use serde::{Deserialize, Serialize};

/// Bare institutional domain; role subdomains hang off it.
pub const BASE_DOMAIN: &str = "matrusri.edu.in";

/// Accepted suffixes, exact and case-sensitive. Matching is a suffix match,
/// never a substring match.
const ACCEPTED_SUFFIXES: [&str; 6] = [
    "@matrusri.edu.in",
    "@faculty.matrusri.edu.in",
    "@admin.matrusri.edu.in",
    "@warden.matrusri.edu.in",
    "@librarian.matrusri.edu.in",
    "@student.matrusri.edu.in",
];

/// Closed role enumeration. Navigation, default views and dashboard stats all
/// match exhaustively on this, so a new role cannot silently fall through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Faculty,
    Warden,
    Librarian,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Warden => "warden",
            Role::Librarian => "librarian",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True iff the email ends with one of the six accepted suffixes.
pub fn is_institutional_email(email: &str) -> bool {
    ACCEPTED_SUFFIXES.iter().any(|s| email.ends_with(s))
}

/// Derive a role from an email address.
///
/// Role subdomains are checked in fixed priority order (faculty, admin,
/// warden, librarian, student); the bare institutional domain maps to
/// student, and anything else falls back to student as well. Total function:
/// always returns a valid role.
pub fn derive_role(email: &str) -> Role {
    if email.is_empty() {
        return Role::Student;
    }
    if email.contains("@faculty.matrusri.edu.in") {
        return Role::Faculty;
    }
    if email.contains("@admin.matrusri.edu.in") {
        return Role::Admin;
    }
    if email.contains("@warden.matrusri.edu.in") {
        return Role::Warden;
    }
    if email.contains("@librarian.matrusri.edu.in") {
        return Role::Librarian;
    }
    if email.contains("@student.matrusri.edu.in") {
        return Role::Student;
    }
    // Any other @matrusri.edu.in address is a student account.
    Role::Student
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_six_suffixes() {
        for e in [
            "a@matrusri.edu.in",
            "b@faculty.matrusri.edu.in",
            "c@admin.matrusri.edu.in",
            "d@warden.matrusri.edu.in",
            "e@librarian.matrusri.edu.in",
            "f@student.matrusri.edu.in",
        ] {
            assert!(is_institutional_email(e), "{e} should be accepted");
        }
    }

    #[test]
    fn suffix_match_not_substring() {
        assert!(!is_institutional_email("x@matrusri.edu.inx"));
        assert!(!is_institutional_email("matrusri.edu.in@gmail.com"));
        assert!(!is_institutional_email("user@gmail.com"));
        assert!(!is_institutional_email(""));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert!(!is_institutional_email("a@MATRUSRI.EDU.IN"));
        assert!(!is_institutional_email("a@Faculty.matrusri.edu.IN"));
    }

    #[test]
    fn subdomain_priority_order() {
        assert_eq!(derive_role("x@faculty.matrusri.edu.in"), Role::Faculty);
        assert_eq!(derive_role("x@admin.matrusri.edu.in"), Role::Admin);
        assert_eq!(derive_role("x@warden.matrusri.edu.in"), Role::Warden);
        assert_eq!(derive_role("x@librarian.matrusri.edu.in"), Role::Librarian);
        assert_eq!(derive_role("x@student.matrusri.edu.in"), Role::Student);
        // Faculty wins even when other role substrings appear in the local part
        assert_eq!(
            derive_role("warden.admin@faculty.matrusri.edu.in"),
            Role::Faculty
        );
    }

    #[test]
    fn bare_domain_and_fallbacks_are_student() {
        assert_eq!(derive_role("someone@matrusri.edu.in"), Role::Student);
        assert_eq!(derive_role(""), Role::Student);
        assert_eq!(derive_role("nonsense"), Role::Student);
        assert_eq!(derive_role("user@gmail.com"), Role::Student);
    }

    #[test]
    fn role_serialization_is_snake_case() {
        assert_eq!(serde_json::to_value(Role::Librarian).unwrap(), "librarian");
        let r: Role = serde_json::from_value(serde_json::json!("admin")).unwrap();
        assert_eq!(r, Role::Admin);
    }
}
