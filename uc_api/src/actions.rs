use reqwest::Method;
use serde::Serialize;
use types::{ActionResponse, NoteUpdate};

use crate::{ApiClient, ApiError};

const MAX_GRADE: f64 = 20.0;

impl ApiClient {
    /// Validate a pending grade (`POST /api/notes/valider/{id}`).
    ///
    /// # Errors
    /// [`ApiError::Rejected`] with the server's message when the grade is
    /// unknown or already validated; transport and decode errors otherwise.
    pub async fn validate_note(
        &self,
        note_id: i64,
    ) -> Result<ActionResponse, ApiError> {
        self.send_action(
            Method::POST,
            &format!("api/notes/valider/{note_id}"),
            None::<&()>,
        )
        .await
    }

    /// Change a grade that has not been validated yet
    /// (`PUT /api/notes/modifier/{id}`).
    ///
    /// # Errors
    /// [`ApiError::InvalidGrade`] without contacting the server when the
    /// grade is outside 0-20; [`ApiError::Rejected`] when the server
    /// refuses the change.
    pub async fn modify_note(
        &self,
        note_id: i64,
        update: &NoteUpdate,
    ) -> Result<ActionResponse, ApiError> {
        if !(0.0..=MAX_GRADE).contains(&update.note) {
            return Err(ApiError::InvalidGrade(update.note));
        }

        self.send_action(
            Method::PUT,
            &format!("api/notes/modifier/{note_id}"),
            Some(update),
        )
        .await
    }

    /// # Errors
    /// [`ApiError::Rejected`] when the message does not exist.
    pub async fn mark_message_read(
        &self,
        message_id: i64,
    ) -> Result<ActionResponse, ApiError> {
        self.send_action(
            Method::PUT,
            &format!("api/messages/marquer-lu/{message_id}"),
            None::<&()>,
        )
        .await
    }

    /// # Errors
    /// [`ApiError::Rejected`] when the notification does not exist.
    pub async fn mark_notification_read(
        &self,
        notification_id: i64,
    ) -> Result<ActionResponse, ApiError> {
        self.send_action(
            Method::POST,
            &format!("api/notifications/{notification_id}/mark-read"),
            None::<&()>,
        )
        .await
    }

    /// # Errors
    /// On transport failure or when the server refuses.
    pub async fn mark_all_notifications_read(
        &self,
    ) -> Result<ActionResponse, ApiError> {
        self.send_action(
            Method::POST,
            "api/notifications/mark-all-read",
            None::<&()>,
        )
        .await
    }

    /// Send a mutate request and interpret the `{ success, error }` reply.
    ///
    /// Error statuses usually carry a JSON body explaining the refusal, so
    /// the body is read before the status is looked at.
    async fn send_action<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ActionResponse, ApiError> {
        let url = self.endpoint(path)?;

        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let reply = match serde_json::from_slice::<ActionResponse>(&bytes) {
            Ok(reply) => reply,
            Err(_) if !status.is_success() => {
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            Err(e) => return Err(ApiError::Decode(e)),
        };

        if !reply.success || !status.is_success() {
            let reason = reply
                .error
                .or(reply.message)
                .unwrap_or_else(|| format!("status {}", status.as_u16()));
            tracing::warn!("{} rejected: {}", url, reason);
            return Err(ApiError::Rejected(reason));
        }

        Ok(reply)
    }
}
