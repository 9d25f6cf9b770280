use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::ServiceError;
use crate::types::db::audit_log::{self, Entity as AuditLog};
use crate::types::internal::audit::{AuditAction, ChangeSet};

/// Repository for audit log storage operations
///
/// Rows are append-only; nothing here mutates or deletes existing entries.
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    /// Create a new AuditStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Write one audit entry
    ///
    /// Serializes the change set to JSON and inserts the row. Callers on the
    /// mutation path are expected to treat failures as best-effort (see
    /// `AuditTrail::record`); the read path propagates errors normally.
    pub async fn append(
        &self,
        entity_type: &str,
        entity_id: i32,
        action: AuditAction,
        user_email: &str,
        changes: Option<&ChangeSet>,
    ) -> Result<(), ServiceError> {
        let changes_json = match changes {
            Some(changes) => Some(
                serde_json::to_string(changes)
                    .map_err(|e| ServiceError::parse("audit changes", e.to_string()))?,
            ),
            None => None,
        };

        let entry = audit_log::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            entity_type: Set(entity_type.to_string()),
            entity_id: Set(entity_id),
            action: Set(action.as_str().to_string()),
            user_email: Set(user_email.to_string()),
            timestamp: Set(Utc::now()),
            changes: Set(changes_json),
        };

        entry
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::database("append_audit_log", e))?;

        Ok(())
    }

    /// All entries for one entity, newest first
    pub async fn list_for_entity(
        &self,
        entity_type: &str,
        entity_id: i32,
    ) -> Result<Vec<audit_log::Model>, ServiceError> {
        AuditLog::find()
            .filter(audit_log::Column::EntityType.eq(entity_type))
            .filter(audit_log::Column::EntityId.eq(entity_id))
            .order_by_desc(audit_log::Column::Timestamp)
            .order_by_desc(audit_log::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::database("list_audit_logs", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::internal::audit::FieldChange;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use serde_json::{json, Value};

    async fn setup_test_db() -> AuditStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        AuditStore::new(db)
    }

    #[tokio::test]
    async fn test_append_serializes_change_set() {
        let store = setup_test_db().await;

        let mut changes = ChangeSet::new();
        changes.insert("name".to_string(), FieldChange::new(json!("Old"), json!("New")));

        store
            .append("patient", 1, AuditAction::Update, "doc@x.com", Some(&changes))
            .await
            .expect("Failed to append entry");

        let entries = store.list_for_entity("patient", 1).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "UPDATE");
        assert_eq!(entries[0].user_email, "doc@x.com");

        let parsed: Value = serde_json::from_str(entries[0].changes.as_deref().unwrap()).unwrap();
        assert_eq!(parsed["name"]["old"], json!("Old"));
        assert_eq!(parsed["name"]["new"], json!("New"));
    }

    #[tokio::test]
    async fn test_append_without_changes_stores_null() {
        let store = setup_test_db().await;

        store
            .append("patient", 7, AuditAction::Delete, "admin@x.com", None)
            .await
            .expect("Failed to append entry");

        let entries = store.list_for_entity("patient", 7).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].changes.is_none());
    }

    #[tokio::test]
    async fn test_list_for_entity_is_newest_first_and_scoped() {
        let store = setup_test_db().await;

        store
            .append("patient", 1, AuditAction::Create, "doc@x.com", None)
            .await
            .unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
        store
            .append("patient", 1, AuditAction::Update, "doc@x.com", None)
            .await
            .unwrap();
        store
            .append("medical_record", 1, AuditAction::Create, "doc@x.com", None)
            .await
            .unwrap();

        let entries = store.list_for_entity("patient", 1).await.unwrap();
        let actions: Vec<_> = entries.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["UPDATE", "CREATE"]);
    }
}
