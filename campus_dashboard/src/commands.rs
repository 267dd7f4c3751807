use thiserror::Error;
use types::{ActionResponse, NoteUpdate};
use uc_api::{ApiClient, ApiError};

use crate::views::View;

pub const USAGE: &str = "\
commands:
  refresh                              poll every view now
  validate <grade-id>                  validate a pending grade
  modify <grade-id> <grade> [coef] [comment...]
                                       change a grade before validation
  read-message <message-id>            mark a message as read
  read <notification-id>               mark a notification as read
  read-all                             mark every notification as read
  quit                                 stop the dashboard";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Refresh,
    ValidateNote(i64),
    ModifyNote { id: i64, update: NoteUpdate },
    MarkMessageRead(i64),
    MarkNotificationRead(i64),
    MarkAllNotificationsRead,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{0}: missing argument <{1}>")]
    MissingArgument(&'static str, &'static str),
    #[error("{0}: invalid number {1:?}")]
    InvalidNumber(&'static str, String),
}

impl Command {
    /// Parse a command from its words, e.g. `["validate", "12"]`.
    ///
    /// # Errors
    /// If the command is unknown or an argument is missing or not a number.
    pub fn parse(words: &[&str]) -> Result<Self, CommandError> {
        let Some((&name, args)) = words.split_first() else {
            return Err(CommandError::Unknown(String::new()));
        };

        match name {
            "refresh" => Ok(Self::Refresh),
            "validate" => Ok(Self::ValidateNote(id_arg("validate", args)?)),
            "modify" => {
                let id = id_arg("modify", args)?;
                let note = number_arg("modify", "grade", args.get(1))?;
                let coefficient = args
                    .get(2)
                    .map(|raw| number_arg("modify", "coef", Some(raw)))
                    .transpose()?;
                let commentaire = (args.len() > 3).then(|| args[3..].join(" "));

                Ok(Self::ModifyNote {
                    id,
                    update: NoteUpdate {
                        note,
                        coefficient,
                        commentaire,
                    },
                })
            }
            "read-message" => {
                Ok(Self::MarkMessageRead(id_arg("read-message", args)?))
            }
            "read" => Ok(Self::MarkNotificationRead(id_arg("read", args)?)),
            "read-all" => Ok(Self::MarkAllNotificationsRead),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// The view whose content changes once this command succeeds.
    #[must_use]
    pub const fn affected_view(&self) -> Option<View> {
        match self {
            Self::ValidateNote(_) | Self::ModifyNote { .. } => Some(View::Notes),
            Self::MarkMessageRead(_) => Some(View::Messages),
            Self::MarkNotificationRead(_) | Self::MarkAllNotificationsRead => {
                Some(View::Notifications)
            }
            Self::Refresh | Self::Quit => None,
        }
    }

    /// Run a mutate command against the API.
    ///
    /// Returns the message to show the user, or `None` for commands that
    /// do not talk to the server.
    ///
    /// # Errors
    /// Whatever the API call returns; a refusal comes back as
    /// [`ApiError::Rejected`] with the server's reason.
    pub async fn execute(
        &self,
        client: &ApiClient,
    ) -> Result<Option<String>, ApiError> {
        let (reply, done) = match self {
            Self::ValidateNote(id) => {
                (client.validate_note(*id).await?, "grade validated")
            }
            Self::ModifyNote { id, update } => {
                (client.modify_note(*id, update).await?, "grade updated")
            }
            Self::MarkMessageRead(id) => {
                (client.mark_message_read(*id).await?, "message marked as read")
            }
            Self::MarkNotificationRead(id) => (
                client.mark_notification_read(*id).await?,
                "notification marked as read",
            ),
            Self::MarkAllNotificationsRead => (
                client.mark_all_notifications_read().await?,
                "all notifications marked as read",
            ),
            Self::Refresh | Self::Quit => return Ok(None),
        };

        Ok(Some(toast(&reply, done)))
    }
}

fn toast(reply: &ActionResponse, fallback: &str) -> String {
    reply.message.clone().unwrap_or_else(|| fallback.to_string())
}

fn id_arg(command: &'static str, args: &[&str]) -> Result<i64, CommandError> {
    let raw = args
        .first()
        .ok_or(CommandError::MissingArgument(command, "id"))?;

    raw.parse()
        .map_err(|_| CommandError::InvalidNumber(command, (*raw).to_string()))
}

fn number_arg(
    command: &'static str,
    name: &'static str,
    raw: Option<&&str>,
) -> Result<f64, CommandError> {
    let raw = raw.ok_or(CommandError::MissingArgument(command, name))?;

    // grades are often typed with a decimal comma
    raw.replace(',', ".")
        .parse()
        .map_err(|_| CommandError::InvalidNumber(command, (*raw).to_string()))
}
