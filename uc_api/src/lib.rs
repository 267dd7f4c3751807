//! Client for the UniCampus REST API.
//!
//! [`ApiClient`] wraps a `reqwest` client and the server's base URL. The
//! polled endpoints have a [`uc_poll::Fetch`] adapter each (see
//! [`fetchers`]); the mutate endpoints are plain async methods (see
//! [`actions`]).

pub mod actions;
pub mod arrivals;
pub mod fetchers;

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;
use types::{ActiveUsers, Collection, NotificationFeed, PendingNotes, RealtimeStats, UnreadMessages};

pub use arrivals::ArrivalTracker;
pub use fetchers::{
    ActiveUsersFetch, PendingNotesFetch, RealtimeStatsFetch,
    UnreadMessagesFetch, UnreadNotificationsFetch,
};

const PENDING_NOTES_PATH: &str = "api/notes/en-attente";
const UNREAD_MESSAGES_PATH: &str = "api/messages/non-lus";
const UNREAD_NOTIFICATIONS_PATH: &str = "api/notifications/unread";
const RECENT_NOTIFICATIONS_PATH: &str = "api/notifications/recent";
const ACTIVE_USERS_PATH: &str = "api/users/active";
const REALTIME_STATS_PATH: &str = "api/stats/realtime";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status { status: u16, url: String },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("server rejected the request: {0}")]
    Rejected(String),
    #[error("grade {0} is outside 0-20")]
    InvalidGrade(f64),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the server at `base_url`.
    ///
    /// `timeout` bounds each whole request; `None` leaves the transport
    /// default in place.
    ///
    /// # Errors
    /// If `base_url` is not an absolute URL or the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;

        // joining onto "http://host/prefix" would drop "prefix"
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    /// GET `path` and decode the JSON body.
    ///
    /// Any non-2xx status is an error, whatever the body says.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;

        tracing::debug!("GET {}", url);

        let response = self.http.get(url.clone()).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }

    /// GET a `{ success, count, items }` collection, treating
    /// `success: false` as a failure.
    async fn get_collection<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Collection<T>, ApiError> {
        let collection: Collection<T> = self.get_json(path, query).await?;

        if !collection.success {
            return Err(ApiError::Rejected(
                collection
                    .error
                    .unwrap_or_else(|| format!("{path} reported failure")),
            ));
        }

        Ok(collection)
    }

    /// Grades waiting for the director's validation, optionally limited to
    /// one programme.
    ///
    /// # Errors
    /// On transport failure, non-2xx status, malformed JSON or
    /// `success: false`.
    pub async fn pending_notes(
        &self,
        filiere_id: Option<i64>,
    ) -> Result<PendingNotes, ApiError> {
        let query: Vec<(&str, String)> = filiere_id
            .map(|id| ("filiere_id", id.to_string()))
            .into_iter()
            .collect();

        self.get_collection(PENDING_NOTES_PATH, &query).await
    }

    /// Unread messages of the signed-in user.
    ///
    /// # Errors
    /// On transport failure, non-2xx status, malformed JSON or
    /// `success: false`.
    pub async fn unread_messages(&self) -> Result<UnreadMessages, ApiError> {
        self.get_collection(UNREAD_MESSAGES_PATH, &[]).await
    }

    /// # Errors
    /// On transport failure, non-2xx status or malformed JSON.
    pub async fn unread_notifications(
        &self,
    ) -> Result<NotificationFeed, ApiError> {
        self.get_json(UNREAD_NOTIFICATIONS_PATH, &[]).await
    }

    /// The latest `limit` notifications, read or not. Used once to fill
    /// the notification panel before the first poll lands.
    ///
    /// # Errors
    /// On transport failure, non-2xx status or malformed JSON.
    pub async fn recent_notifications(
        &self,
        limit: u32,
    ) -> Result<NotificationFeed, ApiError> {
        self.get_json(RECENT_NOTIFICATIONS_PATH, &[("limit", limit.to_string())])
            .await
    }

    /// Users active within the last `minutes` minutes.
    ///
    /// # Errors
    /// On transport failure, non-2xx status or malformed JSON.
    pub async fn active_users(
        &self,
        minutes: u32,
    ) -> Result<ActiveUsers, ApiError> {
        self.get_json(ACTIVE_USERS_PATH, &[("minutes", minutes.to_string())])
            .await
    }

    /// # Errors
    /// On transport failure, non-2xx status or malformed JSON.
    pub async fn realtime_stats(&self) -> Result<RealtimeStats, ApiError> {
        self.get_json(REALTIME_STATS_PATH, &[]).await
    }
}
