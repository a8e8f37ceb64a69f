//! Feature modules behind the role gate: seeded in-memory datasets with the
//! search/filter/aggregate operations each dashboard renders.

pub mod admissions;
pub mod attendance;
pub mod dashboard;
pub mod exams;
pub mod fees;
pub mod hostel;
pub mod library;
