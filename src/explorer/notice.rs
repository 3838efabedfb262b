use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Failure,
    /// Stays until dismissed.
    Blocking,
}

/// Transient message shown in the status bar.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub raised_at: Instant,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            raised_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.is_expired_at(Instant::now(), ttl)
    }

    fn is_expired_at(&self, now: Instant, ttl: Duration) -> bool {
        self.kind != NoticeKind::Blocking && now.saturating_duration_since(self.raised_at) > ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocking_notice_never_expires() {
        let notice = Notice::new(NoticeKind::Blocking, "Delete failed");
        let later = notice.raised_at + Duration::from_secs(60);
        assert!(!notice.is_expired_at(later, Duration::from_secs(3)));
    }

    #[test]
    fn transient_notice_expires_after_ttl() {
        let notice = Notice::new(NoticeKind::Success, "Uploaded");
        assert!(!notice.is_expired(Duration::from_secs(3)));
        let later = notice.raised_at + Duration::from_secs(4);
        assert!(notice.is_expired_at(later, Duration::from_secs(3)));
    }
}
