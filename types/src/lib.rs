// Payload models for the UniCampus REST API.
//
// Field names follow the server's JSON verbatim (French, snake_case), so
// no renaming is applied except where a generic name is accepted as an
// alias.

use serde::{Deserialize, Serialize};

mod records;

pub use records::*;

/// A polled collection: `{ success, count, items }`.
///
/// The server names the array after the resource (`notes`, `messages`);
/// both those names and the generic `items` are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Collection<T> {
    #[serde(default = "default_success")]
    pub success: bool,

    #[serde(default)]
    pub count: u64,

    #[serde(default, alias = "notes", alias = "messages")]
    pub items: Vec<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

const fn default_success() -> bool {
    true
}

impl<T> Collection<T> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub type PendingNotes = Collection<PendingNote>;
pub type UnreadMessages = Collection<UnreadMessage>;

/// `{ count, notifications }` from the unread and recent endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationFeed {
    #[serde(default)]
    pub count: u64,

    #[serde(default)]
    pub notifications: Vec<Notification>,
}

/// `{ count, users }` from the active-users endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveUsers {
    #[serde(default)]
    pub count: u64,

    #[serde(default)]
    pub users: Vec<ActiveUser>,
}

/// `{ stats, logs_recents }` from the realtime statistics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeStats {
    pub stats: StatCounters,

    #[serde(default)]
    pub logs_recents: Vec<AuditLog>,
}

/// Reply of every mutate endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default = "default_success")]
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `PUT /api/notes/modifier/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub note: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coefficient: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentaire: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_accepts_generic_items() {
        let json = r#"{"success":true,"count":2,"items":[{"id":1},{"id":2}]}"#;
        let collection: Collection<serde_json::Value> =
            serde_json::from_str(json).unwrap();

        assert!(collection.success);
        assert_eq!(collection.count, 2);
        assert_eq!(collection.items[1]["id"], 2);
    }

    #[test]
    fn test_pending_notes_use_server_field_name() {
        let json = r#"{
            "success": true,
            "count": 1,
            "notes": [{
                "id": 7,
                "etudiant": {"id": 3, "nom": "Diallo", "prenom": "Awa", "matricule": "UC-2024-003"},
                "cours": {"id": 9, "nom": "Algorithmique", "type": "CM"},
                "filiere": {"id": 2, "nom": "Informatique", "niveau": "L2"},
                "type_evaluation": "EXAMEN",
                "note": 14.5,
                "coefficient": 2.0,
                "date_evaluation": "2024-05-02",
                "commentaire": "",
                "saisi_par": {"nom": "Kone", "prenom": "Ibrahim"},
                "date_creation": "2024-05-03 09:12:00"
            }]
        }"#;
        let notes: PendingNotes = serde_json::from_str(json).unwrap();

        assert_eq!(notes.items.len(), 1);
        let note = &notes.items[0];
        assert_eq!(note.id, 7);
        assert_eq!(note.etudiant.matricule.as_deref(), Some("UC-2024-003"));
        assert!((note.note - 14.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_list_decodes_as_empty_records() {
        let notes: PendingNotes =
            serde_json::from_str(r#"{"success":true,"count":0}"#).unwrap();

        assert!(notes.success);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_failed_collection_carries_error() {
        let json = r#"{"success":false,"error":"database unavailable"}"#;
        let messages: UnreadMessages = serde_json::from_str(json).unwrap();

        assert!(!messages.success);
        assert!(messages.is_empty());
        assert_eq!(messages.error.as_deref(), Some("database unavailable"));
    }

    #[test]
    fn test_empty_notification_feed() {
        let feed: NotificationFeed =
            serde_json::from_str(r#"{"count":0,"notifications":[]}"#).unwrap();

        assert_eq!(feed.count, 0);
        assert!(feed.notifications.is_empty());
    }

    #[test]
    fn test_note_update_skips_missing_fields() {
        let update = NoteUpdate {
            note: 12.0,
            coefficient: None,
            commentaire: Some("revu".to_string()),
        };

        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"note": 12.0, "commentaire": "revu"}));
    }
}
