use std::sync::{Mutex, PoisonError};

use types::{Notification, NotificationFeed, Priority};
use uc_api::ArrivalTracker;
use uc_poll::{Render, RenderError};

use super::{Panel, badge};

/// Notification list plus a log line whenever a newer notification shows
/// up between two polls.
pub struct NotificationsView {
    pub panel: Panel,
    arrivals: Mutex<ArrivalTracker>,
}

impl NotificationsView {
    #[must_use]
    pub const fn new(panel: Panel) -> Self {
        Self {
            panel,
            arrivals: Mutex::new(ArrivalTracker::new()),
        }
    }
}

impl Render<NotificationFeed> for NotificationsView {
    fn render(&self, data: &NotificationFeed) -> Result<(), RenderError> {
        let mut lines =
            vec![format!("{} unread notification(s)", badge(data.count))];

        if data.notifications.is_empty() {
            lines.push("No notification".to_string());
        } else {
            lines.extend(data.notifications.iter().map(notification_line));
        }

        self.panel.replace(lines)?;

        let mut arrivals =
            self.arrivals.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(newest) = arrivals.observe(data) {
            tracing::info!("new notification #{}: {}", newest.id, newest.titre);
        }

        Ok(())
    }
}

const fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Critique => "CRITICAL",
        Priority::Haute => "HIGH",
        Priority::Normale => "NORMAL",
        Priority::Basse => "LOW",
    }
}

fn notification_line(notification: &Notification) -> String {
    let marker = if notification.is_read { ' ' } else { '*' };
    let mut line = format!(
        "{marker} #{:<5} [{}] {}",
        notification.id,
        priority_label(notification.priorite),
        notification.titre
    );

    if !notification.message.is_empty() {
        line.push_str(": ");
        line.push_str(&notification.message);
    }

    line
}
