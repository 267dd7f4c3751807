use types::{ActiveUsers, RealtimeStats};
use uc_poll::{Render, RenderError};

use super::{Panel, badge, full_name};

/// Recent audit entries shown under the counters.
const MAX_LOG_LINES: usize = 10;

pub struct ActiveUsersView {
    pub panel: Panel,
}

impl ActiveUsersView {
    #[must_use]
    pub const fn new(panel: Panel) -> Self {
        Self { panel }
    }
}

impl Render<ActiveUsers> for ActiveUsersView {
    fn render(&self, data: &ActiveUsers) -> Result<(), RenderError> {
        let mut lines = vec![format!("{} active user(s)", badge(data.count))];

        if data.users.is_empty() {
            lines.push("No active user".to_string());
        }

        for user in &data.users {
            lines.push(format!(
                "{:<24} {:<12} {:<20} last seen {}",
                full_name(&user.prenom, &user.nom),
                user.matricule.as_deref().unwrap_or("-"),
                user.role,
                user.derniere_activite.as_deref().unwrap_or("?")
            ));
        }

        self.panel.replace(lines)
    }
}

pub struct RealtimeStatsView {
    pub panel: Panel,
}

impl RealtimeStatsView {
    #[must_use]
    pub const fn new(panel: Panel) -> Self {
        Self { panel }
    }
}

impl Render<RealtimeStats> for RealtimeStatsView {
    fn render(&self, data: &RealtimeStats) -> Result<(), RenderError> {
        let stats = &data.stats;
        let mut lines = vec![
            format!(
                "active users {} | pending grades {} | validated grades {} | open reports {}",
                stats.utilisateurs_actifs,
                stats.notes_en_attente,
                stats.notes_validees,
                stats.signalements_en_attente
            ),
        ];

        if data.logs_recents.is_empty() {
            lines.push("No recent activity".to_string());
        }

        for log in data.logs_recents.iter().take(MAX_LOG_LINES) {
            let mut line = format!(
                "{} {} - {}",
                log.created_at.as_deref().unwrap_or("?"),
                full_name(&log.prenom, &log.nom),
                log.action
            );
            if let Some(description) = &log.description {
                line.push_str(": ");
                line.push_str(description);
            }
            lines.push(line);
        }

        self.panel.replace(lines)
    }
}
