//! Fee tracking. Students only ever see their own transactions; staff roles
//! see the full ledger. Amounts are whole rupees.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::identity::{Role, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    Paid,
    Pending,
    Overdue,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeeTransaction {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub fee_type: String,
    pub amount: i64,
    pub due_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<String>,
    pub status: FeeStatus,
    pub semester: String,
    pub year: String,
}

#[allow(clippy::too_many_arguments)]
fn txn(
    id: &str,
    student_id: &str,
    student_name: &str,
    fee_type: &str,
    amount: i64,
    due_date: &str,
    paid_date: Option<&str>,
    status: FeeStatus,
    semester: &str,
) -> FeeTransaction {
    FeeTransaction {
        id: id.into(),
        student_id: student_id.into(),
        student_name: student_name.into(),
        fee_type: fee_type.into(),
        amount,
        due_date: due_date.into(),
        paid_date: paid_date.map(|d| d.into()),
        status,
        semester: semester.into(),
        year: "2024".into(),
    }
}

static TRANSACTIONS: Lazy<Vec<FeeTransaction>> = Lazy::new(|| {
    vec![
        txn("1", "MAT2024001", "Rajesh Kumar", "Tuition Fee", 25000, "2024-02-15", Some("2024-02-10"), FeeStatus::Paid, "2"),
        txn("2", "MAT2024002", "Priya Sharma", "Hostel Fee", 15000, "2024-02-15", None, FeeStatus::Pending, "2"),
        txn("3", "MAT2024003", "Amit Patel", "Lab Fee", 5000, "2024-01-20", None, FeeStatus::Overdue, "2"),
        txn("4", "MAT2024001", "Rajesh Kumar", "Library Fee", 2000, "2024-02-01", Some("2024-01-28"), FeeStatus::Paid, "1"),
        txn("5", "MAT2024002", "Priya Sharma", "Exam Fee", 2500, "2024-03-01", None, FeeStatus::Pending, "2"),
    ]
});

pub fn transactions() -> &'static [FeeTransaction] {
    &TRANSACTIONS
}

/// Rows the given user may see: students are restricted to their own
/// student_id, every other role sees the full ledger.
pub fn visible_for(user: &UserProfile) -> Vec<&'static FeeTransaction> {
    match user.role {
        Role::Student => {
            let Some(sid) = user.student_id.as_deref() else {
                return Vec::new();
            };
            TRANSACTIONS.iter().filter(|t| t.student_id == sid).collect()
        }
        Role::Faculty | Role::Warden | Role::Librarian | Role::Admin => {
            TRANSACTIONS.iter().collect()
        }
    }
}

/// Search over student name/id with an optional status filter.
pub fn filter<'a>(
    rows: &[&'a FeeTransaction],
    term: &str,
    status: Option<FeeStatus>,
) -> Vec<&'a FeeTransaction> {
    let term = term.to_lowercase();
    rows.iter()
        .copied()
        .filter(|t| {
            let matches_search = term.is_empty()
                || t.student_name.to_lowercase().contains(&term)
                || t.student_id.to_lowercase().contains(&term);
            let matches_filter = status.map(|s| t.status == s).unwrap_or(true);
            matches_search && matches_filter
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeeSummary {
    pub total_amount: i64,
    pub paid_amount: i64,
    /// Everything not yet paid, overdue included.
    pub pending_amount: i64,
}

pub fn summarize(rows: &[&FeeTransaction]) -> FeeSummary {
    rows.iter().fold(FeeSummary::default(), |mut s, t| {
        s.total_amount += t.amount;
        if t.status == FeeStatus::Paid {
            s.paid_amount += t.amount;
        } else {
            s.pending_amount += t.amount;
        }
        s
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn student(sid: Option<&str>) -> UserProfile {
        UserProfile {
            id: "u1".into(),
            email: "rajesh.kumar@student.matrusri.edu.in".into(),
            name: "Rajesh Kumar".into(),
            role: Role::Student,
            student_id: sid.map(|s| s.into()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn students_see_only_their_own_rows() {
        let rows = visible_for(&student(Some("MAT2024001")));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|t| t.student_id == "MAT2024001"));
    }

    #[test]
    fn student_without_student_id_sees_nothing() {
        assert!(visible_for(&student(None)).is_empty());
    }

    #[test]
    fn staff_see_the_full_ledger() {
        let admin = UserProfile {
            role: Role::Admin,
            ..student(None)
        };
        assert_eq!(visible_for(&admin).len(), transactions().len());
    }

    #[test]
    fn summary_splits_paid_and_pending() {
        let all: Vec<_> = transactions().iter().collect();
        let s = summarize(&all);
        assert_eq!(s.total_amount, 49500);
        assert_eq!(s.paid_amount, 27000);
        // pending includes the overdue lab fee
        assert_eq!(s.pending_amount, 22500);
        assert_eq!(s.total_amount, s.paid_amount + s.pending_amount);
    }

    #[test]
    fn filter_by_status_and_term() {
        let all: Vec<_> = transactions().iter().collect();
        let overdue = filter(&all, "", Some(FeeStatus::Overdue));
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].student_name, "Amit Patel");
        let priya = filter(&all, "priya", None);
        assert_eq!(priya.len(), 2);
    }
}
