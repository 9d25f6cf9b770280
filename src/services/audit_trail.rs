use std::sync::Arc;

use crate::errors::ServiceError;
use crate::stores::AuditStore;
use crate::types::db::audit_log;
use crate::types::internal::audit::{AuditAction, ChangeSet};

/// Append-only record of who changed what and when
pub struct AuditTrail {
    audit_store: Arc<AuditStore>,
}

impl AuditTrail {
    /// Create a new AuditTrail over the given store
    pub fn new(audit_store: Arc<AuditStore>) -> Self {
        Self { audit_store }
    }

    /// Record a mutating action against an entity
    ///
    /// Best effort: the primary mutation has already committed when this
    /// runs, so a failed write is logged at WARN and swallowed. It is never
    /// surfaced to the caller and never rolls back the mutation that
    /// triggered it. Audit completeness is therefore not guaranteed under
    /// storage failure.
    pub async fn record(
        &self,
        entity_type: &str,
        entity_id: i32,
        action: AuditAction,
        actor: &str,
        changes: Option<ChangeSet>,
    ) {
        if let Err(err) = self
            .audit_store
            .append(entity_type, entity_id, action, actor, changes.as_ref())
            .await
        {
            tracing::warn!(
                entity_type,
                entity_id,
                action = action.as_str(),
                error = %err,
                "failed to write audit log entry"
            );
        }
    }

    /// All entries for one entity, newest first
    pub async fn list_for_entity(
        &self,
        entity_type: &str,
        entity_id: i32,
    ) -> Result<Vec<audit_log::Model>, ServiceError> {
        self.audit_store.list_for_entity(entity_type, entity_id).await
    }
}
