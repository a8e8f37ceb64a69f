//! Role-specific dashboard content: stat cards and the recent-activity feed.

use serde::Serialize;

use crate::identity::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<&'static str>,
    pub change_kind: ChangeKind,
}

const fn card(title: &'static str, value: &'static str) -> StatCard {
    StatCard { title, value, change: None, change_kind: ChangeKind::Neutral }
}

const fn trending(title: &'static str, value: &'static str, change: &'static str) -> StatCard {
    StatCard { title, value, change: Some(change), change_kind: ChangeKind::Positive }
}

const ADMIN_STATS: &[StatCard] = &[
    trending("Total Students", "1,247", "+5.2%"),
    trending("Fee Collection", "₹12.4L", "+12.8%"),
    trending("Hostel Occupancy", "89%", "+2.1%"),
    trending("Library Books", "15,678", "+234"),
];

const STUDENT_STATS: &[StatCard] = &[
    card("Current CGPA", "8.4"),
    card("Pending Fees", "₹2,500"),
    card("Books Issued", "3"),
    card("Attendance", "92%"),
];

const FACULTY_STATS: &[StatCard] = &[
    card("Total Students", "156"),
    card("Pending Evaluations", "23"),
    card("Classes This Week", "18"),
    card("Average Attendance", "87%"),
];

const OPERATIONS_STATS: &[StatCard] = &[
    card("Active Users", "1,247"),
    trending("System Health", "99.9%", "stable"),
];

/// Stat cards per role. Admin and student carry the full card set; warden and
/// librarian share the compact operational pair.
pub fn stats_for(role: Role) -> &'static [StatCard] {
    match role {
        Role::Admin => ADMIN_STATS,
        Role::Student => STUDENT_STATS,
        Role::Faculty => FACULTY_STATS,
        Role::Warden | Role::Librarian => OPERATIONS_STATS,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub text: &'static str,
    pub time: &'static str,
}

const fn activity(text: &'static str, time: &'static str) -> Activity {
    Activity { text, time }
}

const ADMIN_ACTIVITIES: &[Activity] = &[
    activity("25 new admissions this week", "2 hours ago"),
    activity("Fee reminder sent to 156 students", "4 hours ago"),
    activity("Exam schedule published", "1 day ago"),
    activity("Monthly report generated", "2 days ago"),
];

const STUDENT_ACTIVITIES: &[Activity] = &[
    activity("Assignment submitted for CS301", "1 hour ago"),
    activity("Upcoming exam: Database Systems", "3 days"),
    activity("Fee payment reminder", "1 day ago"),
    activity("Library book due tomorrow", "1 day left"),
];

const GENERIC_ACTIVITIES: &[Activity] = &[
    activity("System maintenance scheduled", "2 hours ago"),
    activity("New user registrations", "1 day ago"),
];

pub fn recent_activities(role: Role) -> &'static [Activity] {
    match role {
        Role::Admin => ADMIN_ACTIVITIES,
        Role::Student => STUDENT_ACTIVITIES,
        Role::Faculty | Role::Warden | Role::Librarian => GENERIC_ACTIVITIES,
    }
}
