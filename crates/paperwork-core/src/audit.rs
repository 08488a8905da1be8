use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record of a user-visible action taken against a catalog entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Who performed the action.
    pub actor: String,

    /// What was done (e.g., "EXPORT_CWR", "CREATE_SONG").
    pub action: String,

    /// The kind of entity acted on (e.g., "composition").
    pub entity: String,

    pub entity_id: String,

    /// Free-form details about the action.
    pub data: serde_json::Value,

    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    #[must_use]
    pub fn new(
        actor: impl Into<String>,
        action: impl Into<String>,
        entity: impl Into<String>,
        entity_id: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            actor: actor.into(),
            action: action.into(),
            entity: entity.into(),
            entity_id: entity_id.into(),
            data,
            created_at: Utc::now(),
        }
    }
}
