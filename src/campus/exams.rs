//! Examinations and results with per-student lookups and pass-rate stats.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Exam {
    pub id: String,
    pub subject: String,
    pub exam_type: String,
    pub date: String,
    pub duration_minutes: u32,
    pub max_marks: u32,
    pub department: String,
    pub year: u8,
    pub semester: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Pass,
    Fail,
    Absent,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExamResult {
    pub id: String,
    pub student_id: String,
    pub exam_id: String,
    pub marks_obtained: u32,
    pub grade: String,
    pub status: ResultStatus,
}

static EXAMS: Lazy<Vec<Exam>> = Lazy::new(|| {
    let exam = |id: &str, subject: &str, date: &str, dept: &str| Exam {
        id: id.into(),
        subject: subject.into(),
        exam_type: "Semester".into(),
        date: date.into(),
        duration_minutes: 180,
        max_marks: 100,
        department: dept.into(),
        year: 2,
        semester: 4,
    };
    vec![
        exam("e1", "Database Systems", "2024-03-10", "Computer Science"),
        exam("e2", "Operating Systems", "2024-03-14", "Computer Science"),
        exam("e3", "Digital Circuits", "2024-03-12", "Electronics"),
    ]
});

static RESULTS: Lazy<Vec<ExamResult>> = Lazy::new(|| {
    let result = |id: &str, sid: &str, eid: &str, marks, grade: &str, status| ExamResult {
        id: id.into(),
        student_id: sid.into(),
        exam_id: eid.into(),
        marks_obtained: marks,
        grade: grade.into(),
        status,
    };
    vec![
        result("r1", "MAT2024001", "e1", 82, "A", ResultStatus::Pass),
        result("r2", "MAT2024001", "e2", 74, "B", ResultStatus::Pass),
        result("r3", "MAT2024002", "e3", 38, "F", ResultStatus::Fail),
        result("r4", "MAT2024003", "e1", 0, "-", ResultStatus::Absent),
        result("r5", "MAT2024002", "e1", 66, "B", ResultStatus::Pass),
    ]
});

pub fn exams() -> &'static [Exam] {
    &EXAMS
}

pub fn results() -> &'static [ExamResult] {
    &RESULTS
}

pub fn results_for(student_id: &str) -> Vec<&'static ExamResult> {
    RESULTS.iter().filter(|r| r.student_id == student_id).collect()
}

/// Percentage of pass results over appeared (absent rows excluded), rounded
/// down.
pub fn pass_rate() -> u32 {
    let appeared = RESULTS
        .iter()
        .filter(|r| r.status != ResultStatus::Absent)
        .count() as u32;
    if appeared == 0 {
        return 0;
    }
    let passed = RESULTS
        .iter()
        .filter(|r| r.status == ResultStatus::Pass)
        .count() as u32;
    passed * 100 / appeared
}
