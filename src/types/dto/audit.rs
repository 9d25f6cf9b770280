use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::audit_log;

/// Response model for an audit trail entry
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AuditLogResponse {
    /// Entry ID
    pub id: i32,

    /// Entity type tag (e.g. "patient")
    pub entity_type: String,

    /// Entity ID the action targeted
    pub entity_id: i32,

    /// Action tag: CREATE, UPDATE, DELETE, or RESTORE
    pub action: String,

    /// Email of the acting user
    pub user_email: String,

    /// When the action happened (ISO 8601)
    pub timestamp: String,

    /// JSON map of field name to {old, new}, or null
    pub changes: Option<String>,
}

impl From<audit_log::Model> for AuditLogResponse {
    fn from(entry: audit_log::Model) -> Self {
        Self {
            id: entry.id,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            action: entry.action,
            user_email: entry.user_email,
            timestamp: entry.timestamp.to_rfc3339(),
            changes: entry.changes,
        }
    }
}
