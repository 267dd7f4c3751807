use std::{fmt, str::FromStr, time::Duration};

use uc_api::{
    ActiveUsersFetch, ApiClient, PendingNotesFetch, RealtimeStatsFetch,
    UnreadMessagesFetch, UnreadNotificationsFetch,
};
use uc_poll::{Fetch, PollController, PollError, Render};

use crate::{
    Config,
    renderers::{
        Panel,
        messages::UnreadMessagesView,
        monitoring::{ActiveUsersView, RealtimeStatsView},
        notes::PendingNotesView,
        notifications::NotificationsView,
    },
};

/// How many notifications prime the panel before polling starts.
const RECENT_NOTIFICATIONS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Notes,
    Messages,
    Notifications,
    /// Active users and realtime counters.
    Monitoring,
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "notes" => Ok(Self::Notes),
            "messages" => Ok(Self::Messages),
            "notifications" => Ok(Self::Notifications),
            "monitoring" => Ok(Self::Monitoring),
            other => Err(format!("unknown view: {other:?}")),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Notes => "notes",
            Self::Messages => "messages",
            Self::Notifications => "notifications",
            Self::Monitoring => "monitoring",
        };
        f.write_str(name)
    }
}

/// Parse a comma separated list such as `notes,notifications`.
///
/// Duplicates are dropped and blank entries ignored.
///
/// # Errors
/// On the first unknown view name.
pub fn parse_views(list: &str) -> Result<Vec<View>, String> {
    let mut views = Vec::new();

    for item in list.split(',').filter(|item| !item.trim().is_empty()) {
        let view = item.parse()?;
        if !views.contains(&view) {
            views.push(view);
        }
    }

    Ok(views)
}

/// Object-safe handle over controllers with different fetch/render types.
pub trait LiveView: Send {
    fn start(&mut self);
    fn stop(&mut self);
    fn refresh_now(&self);
    fn name(&self) -> &str;
}

impl<F, R> LiveView for PollController<F, R>
where
    F: Fetch,
    R: Render<F::Output>,
{
    fn start(&mut self) {
        Self::start(self);
    }

    fn stop(&mut self) {
        Self::stop(self);
    }

    fn refresh_now(&self) {
        Self::refresh_now(self);
    }

    fn name(&self) -> &str {
        Self::name(self)
    }
}

/// Every controller of the session, tagged with the view it belongs to.
pub struct Dashboard {
    controllers: Vec<(View, Box<dyn LiveView>)>,
}

impl Dashboard {
    /// Build one controller per selected view (two for monitoring).
    ///
    /// The notification panel is filled with the most recent notifications
    /// first; a failure there is logged and polling takes over.
    ///
    /// # Errors
    /// If a configured interval is zero.
    pub async fn build(
        client: &ApiClient,
        config: &Config,
        views: &[View],
    ) -> Result<Self, PollError> {
        let mut controllers: Vec<(View, Box<dyn LiveView>)> = Vec::new();

        for &view in views {
            match view {
                View::Notes => controllers.push((
                    view,
                    Box::new(PollController::new(
                        "notes",
                        millis(config.notes_interval_ms),
                        PendingNotesFetch {
                            client: client.clone(),
                            filiere_id: config.filiere_id,
                        },
                        PendingNotesView::new(Panel::new("Pending grades")),
                    )?),
                )),
                View::Messages => controllers.push((
                    view,
                    Box::new(PollController::new(
                        "messages",
                        millis(config.messages_interval_ms),
                        UnreadMessagesFetch {
                            client: client.clone(),
                        },
                        UnreadMessagesView::new(Panel::new("Messages")),
                    )?),
                )),
                View::Notifications => {
                    let renderer =
                        NotificationsView::new(Panel::new("Notifications"));
                    prime_notifications(client, &renderer).await;

                    controllers.push((
                        view,
                        Box::new(PollController::new(
                            "notifications",
                            millis(config.notifications_interval_ms),
                            UnreadNotificationsFetch {
                                client: client.clone(),
                            },
                            renderer,
                        )?),
                    ));
                }
                View::Monitoring => {
                    let interval = millis(config.monitoring_interval_ms);
                    controllers.push((
                        view,
                        Box::new(PollController::new(
                            "active users",
                            interval,
                            ActiveUsersFetch {
                                client: client.clone(),
                                minutes: config.active_minutes,
                            },
                            ActiveUsersView::new(Panel::new("Active users")),
                        )?),
                    ));
                    controllers.push((
                        view,
                        Box::new(PollController::new(
                            "realtime stats",
                            interval,
                            RealtimeStatsFetch {
                                client: client.clone(),
                            },
                            RealtimeStatsView::new(Panel::new("Activity")),
                        )?),
                    ));
                }
            }
        }

        Ok(Self { controllers })
    }

    pub fn start_all(&mut self) {
        for (_, controller) in &mut self.controllers {
            controller.start();
        }
    }

    pub fn stop_all(&mut self) {
        for (_, controller) in &mut self.controllers {
            controller.stop();
        }
    }

    /// Refresh the controllers of `view`, or every controller for `None`.
    pub fn refresh(&self, view: Option<View>) {
        self.controllers
            .iter()
            .filter(|(tag, _)| view.is_none_or(|view| *tag == view))
            .for_each(|(_, controller)| controller.refresh_now());
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.controllers
            .iter()
            .map(|(_, controller)| controller.name())
            .collect()
    }
}

async fn prime_notifications(client: &ApiClient, renderer: &NotificationsView) {
    match client.recent_notifications(RECENT_NOTIFICATIONS).await {
        Ok(feed) => {
            if let Err(e) = renderer.render(&feed) {
                tracing::warn!("notifications: cannot show recent feed: {e}");
            }
        }
        Err(e) => {
            tracing::warn!("notifications: cannot load recent feed: {e}");
        }
    }
}

const fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
