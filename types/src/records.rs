use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingNote {
    pub id: i64,

    pub etudiant: Student,

    pub cours: Course,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filiere: Option<Programme>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_evaluation: Option<String>,

    pub note: f64,

    #[serde(default = "default_coefficient")]
    pub coefficient: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_evaluation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentaire: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub saisi_par: Option<Person>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_creation: Option<String>,
}

const fn default_coefficient() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub nom: String,

    pub prenom: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub matricule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub nom: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub course_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Programme {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub nom: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub niveau: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub nom: String,

    pub prenom: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnreadMessage {
    pub id: i64,

    pub expediteur: Person,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,

    pub sujet: String,

    #[serde(default)]
    pub contenu: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_creation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,

    pub titre: String,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub priorite: Priority,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_notification: Option<String>,

    #[serde(default)]
    pub is_read: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lien_action: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critique,

    Haute,

    Basse,

    #[default]
    #[serde(other)]
    Normale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveUser {
    pub nom: String,

    pub prenom: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub matricule: Option<String>,

    pub role: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub derniere_activite: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatCounters {
    #[serde(default)]
    pub utilisateurs_actifs: u64,

    #[serde(default)]
    pub notes_en_attente: u64,

    #[serde(default)]
    pub notes_validees: u64,

    #[serde(default)]
    pub signalements_en_attente: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub nom: String,

    pub prenom: String,

    pub action: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
