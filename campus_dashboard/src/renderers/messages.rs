use types::UnreadMessages;
use uc_poll::{Render, RenderError};

use super::{Panel, badge, full_name};

pub struct UnreadMessagesView {
    pub panel: Panel,
}

impl UnreadMessagesView {
    #[must_use]
    pub const fn new(panel: Panel) -> Self {
        Self { panel }
    }
}

impl Render<UnreadMessages> for UnreadMessagesView {
    fn render(&self, data: &UnreadMessages) -> Result<(), RenderError> {
        let mut lines = vec![format!("{} unread message(s)", badge(data.count))];

        if data.is_empty() {
            lines.push("No new message".to_string());
        }

        for message in &data.items {
            let sender = full_name(&message.expediteur.prenom, &message.expediteur.nom);
            let role = message.expediteur.role.as_deref().unwrap_or("?");
            lines.push(format!(
                "#{:<5} {} ({}): {}",
                message.id, sender, role, message.sujet
            ));
            if let Some(note_id) = message.note_id {
                lines.push(format!("       about grade #{note_id}"));
            }
        }

        self.panel.replace(lines)
    }
}
