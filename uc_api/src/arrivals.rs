use types::{Notification, NotificationFeed};

/// Detects notifications that arrived since the previous poll.
///
/// The server lists notifications newest first. The first feed observed
/// only sets the baseline, so a restart does not announce the whole
/// backlog again. An empty first feed is a baseline too: whatever shows
/// up after it is an arrival.
#[derive(Debug, Default)]
pub struct ArrivalTracker {
    primed: bool,
    newest_seen: Option<i64>,
}

impl ArrivalTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primed: false,
            newest_seen: None,
        }
    }

    /// Record `feed` and return its newest notification if it is newer
    /// than anything seen before.
    pub fn observe<'a>(
        &mut self,
        feed: &'a NotificationFeed,
    ) -> Option<&'a Notification> {
        let primed = std::mem::replace(&mut self.primed, true);
        let newest = feed.notifications.first()?;

        if self.newest_seen.is_some_and(|seen| newest.id <= seen) {
            return None;
        }

        self.newest_seen = Some(newest.id);
        primed.then_some(newest)
    }

    #[must_use]
    pub const fn newest_seen(&self) -> Option<i64> {
        self.newest_seen
    }
}
