//! [`Fetch`] adapters binding each polled endpoint to an [`ApiClient`].

use types::{ActiveUsers, NotificationFeed, PendingNotes, RealtimeStats, UnreadMessages};
use uc_poll::Fetch;

use crate::{ApiClient, ApiError};

/// Window used by the monitoring view when asking who is active.
pub const DEFAULT_ACTIVE_MINUTES: u32 = 30;

pub struct PendingNotesFetch {
    pub client: ApiClient,
    pub filiere_id: Option<i64>,
}

impl Fetch for PendingNotesFetch {
    type Output = PendingNotes;
    type Error = ApiError;

    async fn fetch(&self) -> Result<PendingNotes, ApiError> {
        self.client.pending_notes(self.filiere_id).await
    }
}

pub struct UnreadMessagesFetch {
    pub client: ApiClient,
}

impl Fetch for UnreadMessagesFetch {
    type Output = UnreadMessages;
    type Error = ApiError;

    async fn fetch(&self) -> Result<UnreadMessages, ApiError> {
        self.client.unread_messages().await
    }
}

pub struct UnreadNotificationsFetch {
    pub client: ApiClient,
}

impl Fetch for UnreadNotificationsFetch {
    type Output = NotificationFeed;
    type Error = ApiError;

    async fn fetch(&self) -> Result<NotificationFeed, ApiError> {
        self.client.unread_notifications().await
    }
}

pub struct ActiveUsersFetch {
    pub client: ApiClient,
    pub minutes: u32,
}

impl ActiveUsersFetch {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self {
            client,
            minutes: DEFAULT_ACTIVE_MINUTES,
        }
    }
}

impl Fetch for ActiveUsersFetch {
    type Output = ActiveUsers;
    type Error = ApiError;

    async fn fetch(&self) -> Result<ActiveUsers, ApiError> {
        self.client.active_users(self.minutes).await
    }
}

pub struct RealtimeStatsFetch {
    pub client: ApiClient,
}

impl Fetch for RealtimeStatsFetch {
    type Output = RealtimeStats;
    type Error = ApiError;

    async fn fetch(&self) -> Result<RealtimeStats, ApiError> {
        self.client.realtime_stats().await
    }
}
