//! Admissions: application pipeline and the admitted-student roster.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    UnderReview,
}

#[derive(Debug, Clone, Serialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub application_date: String,
    pub status: ApplicationStatus,
    pub documents: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    Active,
    Inactive,
    Graduated,
}

#[derive(Debug, Clone, Serialize)]
pub struct Student {
    pub id: String,
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub year: u8,
    pub semester: u8,
    pub admission_date: String,
    pub status: StudentStatus,
}

#[allow(clippy::too_many_arguments)]
fn app(
    id: &str,
    name: &str,
    email: &str,
    phone: &str,
    department: &str,
    date: &str,
    status: ApplicationStatus,
    documents: &[&str],
) -> Application {
    Application {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        phone: phone.into(),
        department: department.into(),
        application_date: date.into(),
        status,
        documents: documents.iter().map(|d| d.to_string()).collect(),
    }
}

static APPLICATIONS: Lazy<Vec<Application>> = Lazy::new(|| {
    vec![
        app(
            "1",
            "Rajesh Kumar",
            "rajesh@example.com",
            "+91 9876543210",
            "Computer Science",
            "2024-01-15",
            ApplicationStatus::Pending,
            &["10th Certificate", "12th Certificate", "Transfer Certificate"],
        ),
        app(
            "2",
            "Priya Sharma",
            "priya@example.com",
            "+91 9876543211",
            "Electronics",
            "2024-01-14",
            ApplicationStatus::Approved,
            &["10th Certificate", "12th Certificate", "Medical Certificate"],
        ),
        app(
            "3",
            "Amit Patel",
            "amit@example.com",
            "+91 9876543212",
            "Mechanical",
            "2024-01-12",
            ApplicationStatus::UnderReview,
            &["10th Certificate", "12th Certificate"],
        ),
        app(
            "4",
            "Sneha Reddy",
            "sneha@example.com",
            "+91 9876543213",
            "Civil",
            "2024-01-10",
            ApplicationStatus::Rejected,
            &["10th Certificate"],
        ),
    ]
});

static STUDENTS: Lazy<Vec<Student>> = Lazy::new(|| {
    let row = |id: &str, sid: &str, name: &str, email: &str, dept: &str, year: u8, sem: u8| Student {
        id: id.into(),
        student_id: sid.into(),
        name: name.into(),
        email: email.into(),
        phone: "+91 9876543210".into(),
        department: dept.into(),
        year,
        semester: sem,
        admission_date: "2023-08-01".into(),
        status: StudentStatus::Active,
    };
    vec![
        row("s1", "MAT2024001", "Rajesh Kumar", "rajesh.kumar@student.matrusri.edu.in", "Computer Science", 2, 4),
        row("s2", "MAT2024002", "Priya Sharma", "priya.sharma@student.matrusri.edu.in", "Electronics", 2, 4),
        row("s3", "MAT2024003", "Amit Patel", "amit.patel@student.matrusri.edu.in", "Mechanical", 1, 2),
        row("s4", "MAT2023014", "Kavya Nair", "kavya.nair@student.matrusri.edu.in", "Computer Science", 3, 6),
    ]
});

pub fn applications() -> &'static [Application] {
    &APPLICATIONS
}

pub fn students() -> &'static [Student] {
    &STUDENTS
}

/// Case-insensitive name/email substring search plus optional status filter,
/// matching the application-list widget.
pub fn search(term: &str, status: Option<ApplicationStatus>) -> Vec<&'static Application> {
    let term = term.to_lowercase();
    APPLICATIONS
        .iter()
        .filter(|a| {
            let matches_search = term.is_empty()
                || a.name.to_lowercase().contains(&term)
                || a.email.to_lowercase().contains(&term);
            let matches_filter = status.map(|s| a.status == s).unwrap_or(true);
            matches_search && matches_filter
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub under_review: usize,
}

pub fn status_counts() -> StatusCounts {
    APPLICATIONS.iter().fold(StatusCounts::default(), |mut c, a| {
        match a.status {
            ApplicationStatus::Pending => c.pending += 1,
            ApplicationStatus::Approved => c.approved += 1,
            ApplicationStatus::Rejected => c.rejected += 1,
            ApplicationStatus::UnderReview => c.under_review += 1,
        }
        c
    })
}
