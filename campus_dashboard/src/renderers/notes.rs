use types::{PendingNote, PendingNotes};
use uc_poll::{Render, RenderError};

use super::{Panel, badge, full_name};

/// Grades waiting for the director's validation.
pub struct PendingNotesView {
    pub panel: Panel,
}

impl PendingNotesView {
    #[must_use]
    pub const fn new(panel: Panel) -> Self {
        Self { panel }
    }
}

impl Render<PendingNotes> for PendingNotesView {
    fn render(&self, data: &PendingNotes) -> Result<(), RenderError> {
        let mut lines = vec![format!(
            "{} grade(s) awaiting validation",
            badge(data.count)
        )];

        if data.is_empty() {
            lines.push("Nothing to validate".to_string());
        } else {
            lines.extend(data.items.iter().map(note_line));
        }

        self.panel.replace(lines)
    }
}

fn note_line(note: &PendingNote) -> String {
    let mut line = format!(
        "#{:<5} {:<24} {:<20} {:>5.2}/20 x{}",
        note.id,
        full_name(&note.etudiant.prenom, &note.etudiant.nom),
        note.cours.nom,
        note.note,
        note.coefficient
    );

    if let Some(evaluation) = &note.type_evaluation {
        line.push_str(&format!("  {evaluation}"));
    }
    if let Some(author) = &note.saisi_par {
        line.push_str(&format!("  by {}", full_name(&author.prenom, &author.nom)));
    }

    line
}
