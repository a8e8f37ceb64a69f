//! Attendance: per-student per-subject attended/held counters.

use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub student_id: String,
    pub subject: String,
    pub classes_attended: u32,
    pub classes_held: u32,
}

impl AttendanceRecord {
    /// Integer percentage, rounded down; zero classes held counts as 0%.
    pub fn percentage(&self) -> u32 {
        if self.classes_held == 0 {
            0
        } else {
            self.classes_attended * 100 / self.classes_held
        }
    }
}

static RECORDS: Lazy<Vec<AttendanceRecord>> = Lazy::new(|| {
    let rec = |sid: &str, subject: &str, attended, held| AttendanceRecord {
        student_id: sid.into(),
        subject: subject.into(),
        classes_attended: attended,
        classes_held: held,
    };
    vec![
        rec("MAT2024001", "Database Systems", 46, 50),
        rec("MAT2024001", "Operating Systems", 44, 48),
        rec("MAT2024002", "Digital Circuits", 31, 50),
        rec("MAT2024002", "Database Systems", 42, 50),
        rec("MAT2024003", "Engineering Mechanics", 12, 40),
    ]
});

pub fn records() -> &'static [AttendanceRecord] {
    &RECORDS
}

pub fn records_for(student_id: &str) -> Vec<&'static AttendanceRecord> {
    RECORDS.iter().filter(|r| r.student_id == student_id).collect()
}

/// Overall percentage across all of a student's subjects.
pub fn overall_percentage(student_id: &str) -> u32 {
    let (attended, held) = RECORDS
        .iter()
        .filter(|r| r.student_id == student_id)
        .fold((0u32, 0u32), |(a, h), r| {
            (a + r.classes_attended, h + r.classes_held)
        });
    if held == 0 {
        0
    } else {
        attended * 100 / held
    }
}

/// Records below the given percentage threshold (shortage list).
pub fn below_threshold(threshold: u32) -> Vec<&'static AttendanceRecord> {
    RECORDS.iter().filter(|r| r.percentage() < threshold).collect()
}
