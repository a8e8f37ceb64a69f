//! Transient user-visible notifications (toast equivalents). Passive-path
//! failures (session restore, profile resolution) land here; there is no
//! caller to propagate them to.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Oldest notices are dropped past this.
const MAX_PENDING: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Shared bounded queue of pending notices. Cloneable handle; one queue per
/// running application.
#[derive(Clone, Default)]
pub struct Notices {
    pending: Arc<Mutex<VecDeque<Notice>>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error<S: Into<String>>(&self, message: S) {
        self.push(NoticeLevel::Error, message.into());
    }

    pub fn info<S: Into<String>>(&self, message: S) {
        self.push(NoticeLevel::Info, message.into());
    }

    fn push(&self, level: NoticeLevel, message: String) {
        let mut q = self.pending.lock();
        if q.len() == MAX_PENDING {
            q.pop_front();
        }
        tracing::debug!(target: "notify", level = ?level, "{}", message);
        q.push_back(Notice { level, message });
    }

    /// Take all pending notices, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        self.pending.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_in_order_and_empties() {
        let n = Notices::new();
        n.error("first");
        n.info("second");
        let drained = n.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "first");
        assert_eq!(drained[0].level, NoticeLevel::Error);
        assert_eq!(drained[1].level, NoticeLevel::Info);
        assert!(n.is_empty());
    }

    #[test]
    fn queue_is_bounded() {
        let n = Notices::new();
        for i in 0..MAX_PENDING + 4 {
            n.error(format!("notice {i}"));
        }
        let drained = n.drain();
        assert_eq!(drained.len(), MAX_PENDING);
        assert_eq!(drained[0].message, "notice 4");
    }
}
