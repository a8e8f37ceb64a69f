//! Library circulation: catalogue search, availability and overdue fines.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LibraryBook {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: String,
    pub total_copies: u32,
    pub available_copies: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Issued,
    Returned,
    Overdue,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookTransaction {
    pub id: String,
    pub student_id: String,
    pub book_id: String,
    pub issue_date: String,
    pub due_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    pub status: IssueStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fine_amount: Option<i64>,
}

static BOOKS: Lazy<Vec<LibraryBook>> = Lazy::new(|| {
    let book = |id: &str, title: &str, author: &str, isbn: &str, category: &str, total, avail| LibraryBook {
        id: id.into(),
        title: title.into(),
        author: author.into(),
        isbn: isbn.into(),
        category: category.into(),
        total_copies: total,
        available_copies: avail,
    };
    vec![
        book("b1", "Database System Concepts", "Silberschatz", "978-0073523323", "Computer Science", 10, 6),
        book("b2", "Clean Code", "Robert C. Martin", "978-0132350884", "Computer Science", 5, 0),
        book("b3", "Engineering Mechanics", "R.C. Hibbeler", "978-0133918922", "Mechanical", 8, 8),
        book("b4", "Digital Design", "M. Morris Mano", "978-0134549897", "Electronics", 6, 3),
    ]
});

static TRANSACTIONS: Lazy<Vec<BookTransaction>> = Lazy::new(|| {
    let issue = |id: &str, sid: &str, bid: &str, issued: &str, due: &str, status| BookTransaction {
        id: id.into(),
        student_id: sid.into(),
        book_id: bid.into(),
        issue_date: issued.into(),
        due_date: due.into(),
        return_date: None,
        status,
        fine_amount: None,
    };
    vec![
        issue("t1", "MAT2024001", "b1", "2024-01-10", "2024-01-24", IssueStatus::Issued),
        BookTransaction {
            fine_amount: Some(50),
            ..issue("t2", "MAT2024002", "b2", "2023-12-20", "2024-01-03", IssueStatus::Overdue)
        },
        BookTransaction {
            return_date: Some("2024-01-15".into()),
            ..issue("t3", "MAT2024003", "b4", "2024-01-02", "2024-01-16", IssueStatus::Returned)
        },
        BookTransaction {
            fine_amount: Some(120),
            ..issue("t4", "MAT2024001", "b2", "2023-12-01", "2023-12-15", IssueStatus::Overdue)
        },
    ]
});

pub fn books() -> &'static [LibraryBook] {
    &BOOKS
}

pub fn transactions() -> &'static [BookTransaction] {
    &TRANSACTIONS
}

/// Catalogue search over title/author/isbn, case-insensitive.
pub fn search_books(term: &str) -> Vec<&'static LibraryBook> {
    let term = term.to_lowercase();
    BOOKS
        .iter()
        .filter(|b| {
            term.is_empty()
                || b.title.to_lowercase().contains(&term)
                || b.author.to_lowercase().contains(&term)
                || b.isbn.contains(&term)
        })
        .collect()
}

pub fn overdue() -> Vec<&'static BookTransaction> {
    TRANSACTIONS
        .iter()
        .filter(|t| t.status == IssueStatus::Overdue)
        .collect()
}

pub fn issued_to(student_id: &str) -> Vec<&'static BookTransaction> {
    TRANSACTIONS
        .iter()
        .filter(|t| t.student_id == student_id && t.status != IssueStatus::Returned)
        .collect()
}

/// Outstanding fines across all overdue issues, rupees.
pub fn total_fines() -> i64 {
    TRANSACTIONS
        .iter()
        .filter_map(|t| t.fine_amount)
        .sum()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CirculationStats {
    pub total_books: u32,
    pub available_books: u32,
    pub books_on_loan: usize,
    pub overdue_count: usize,
}

pub fn circulation() -> CirculationStats {
    let (total, available) = BOOKS
        .iter()
        .fold((0u32, 0u32), |(t, a), b| (t + b.total_copies, a + b.available_copies));
    CirculationStats {
        total_books: total,
        available_books: available,
        books_on_loan: TRANSACTIONS
            .iter()
            .filter(|t| t.status != IssueStatus::Returned)
            .count(),
        overdue_count: overdue().len(),
    }
}
