//! Role-based view routing: which navigation entries a role sees, which view
//! it lands on after login, and how an arbitrary selected tab id resolves.
//! Pure mappings, matched exhaustively so a new role cannot fall through.

use serde::{Deserialize, Serialize};

use crate::identity::Role;

/// Every named section of the application. String ids are the wire/tab ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    Dashboard,
    Admissions,
    Fees,
    Hostel,
    Exams,
    Attendance,
    Library,
    LibraryDashboard,
    Students,
    Users,
    Analytics,
}

impl View {
    pub const fn id(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Admissions => "admissions",
            View::Fees => "fees",
            View::Hostel => "hostel",
            View::Exams => "exams",
            View::Attendance => "attendance",
            View::Library => "library",
            View::LibraryDashboard => "library-dashboard",
            View::Students => "students",
            View::Users => "users",
            View::Analytics => "analytics",
        }
    }

    pub fn parse(id: &str) -> Option<View> {
        Some(match id {
            "dashboard" => View::Dashboard,
            "admissions" => View::Admissions,
            "fees" => View::Fees,
            "hostel" => View::Hostel,
            "exams" => View::Exams,
            "attendance" => View::Attendance,
            "library" => View::Library,
            "library-dashboard" => View::LibraryDashboard,
            "students" => View::Students,
            "users" => View::Users,
            "analytics" => View::Analytics,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub id: &'static str,
    pub label: &'static str,
}

const fn nav(view: View, label: &'static str) -> NavEntry {
    NavEntry { id: view.id(), label }
}

const ADMIN_NAV: &[NavEntry] = &[
    nav(View::Dashboard, "Dashboard"),
    nav(View::Admissions, "Admissions"),
    nav(View::Fees, "Fee Management"),
    nav(View::Hostel, "Hostel"),
    nav(View::Exams, "Examinations"),
    nav(View::Library, "Library"),
    nav(View::Users, "Users"),
    nav(View::Analytics, "Analytics"),
];

const STUDENT_NAV: &[NavEntry] = &[
    nav(View::Dashboard, "Dashboard"),
    nav(View::Fees, "My Fees"),
    nav(View::Hostel, "My Room"),
    nav(View::Exams, "Results"),
    nav(View::Attendance, "Attendance"),
    nav(View::Library, "Library"),
];

const FACULTY_NAV: &[NavEntry] = &[
    nav(View::Dashboard, "Dashboard"),
    nav(View::Exams, "Examinations"),
    nav(View::Students, "Students"),
];

const WARDEN_NAV: &[NavEntry] = &[
    nav(View::Dashboard, "Dashboard"),
    nav(View::Hostel, "Hostel Management"),
    nav(View::Students, "Students"),
];

const LIBRARIAN_NAV: &[NavEntry] = &[
    nav(View::Dashboard, "Dashboard"),
    nav(View::Library, "Library Management"),
    nav(View::Students, "Students"),
];

/// Ordered navigation allow-list per role; dashboard is always first.
pub fn navigation(role: Role) -> &'static [NavEntry] {
    match role {
        Role::Admin => ADMIN_NAV,
        Role::Student => STUDENT_NAV,
        Role::Faculty => FACULTY_NAV,
        Role::Warden => WARDEN_NAV,
        Role::Librarian => LIBRARIAN_NAV,
    }
}

/// Landing view right after login/session restore.
pub fn default_view(role: Role) -> View {
    match role {
        Role::Admin => View::Analytics,
        Role::Student => View::Fees,
        Role::Faculty => View::Exams,
        Role::Warden => View::Hostel,
        Role::Librarian => View::LibraryDashboard,
    }
}

/// True when the view id sits in the role's navigation allow-list.
pub fn is_allowed(role: Role, view: View) -> bool {
    navigation(role).iter().any(|e| e.id == view.id())
}

/// Resolve a selected tab id to the view that actually renders.
///
/// Librarian accounts bypass the standard frame entirely: the library
/// dashboard renders as the full page whatever tab is selected. For everyone
/// else an unknown or disallowed id falls back to the dashboard instead of
/// erroring.
pub fn resolve(role: Role, selected: &str) -> View {
    if role == Role::Librarian {
        return View::LibraryDashboard;
    }
    match View::parse(selected) {
        Some(view) if is_allowed(role, view) => view,
        _ => View::Dashboard,
    }
}
