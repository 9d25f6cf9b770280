use std::sync::Arc;

use chrono::Utc;
use sea_orm::Set;
use serde_json::{json, Value};

use crate::errors::{PatientError, ServiceError};
use crate::services::export;
use crate::services::notifier::Notifier;
use crate::services::AuditTrail;
use crate::stores::PatientStore;
use crate::types::db::patient;
use crate::types::dto::common::PaginationMeta;
use crate::types::internal::audit::{AuditAction, ChangeSet, FieldChange};

/// Entity type tag used for audit entries on patients
pub const ENTITY_TYPE: &str = "patient";

const MIN_PATIENT_AGE: i64 = 0;
const MAX_PATIENT_AGE: i64 = 150;
const DEFAULT_PER_PAGE: u64 = 10;
const MAX_PER_PAGE: u64 = 100;

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub contact: Option<String>,
}

fn validate_name(name: &str) -> Result<String, PatientError> {
    let trimmed = name.trim();
    if trimmed.chars().count() < 2 {
        return Err(PatientError::InvalidName);
    }
    Ok(trimmed.to_string())
}

fn validate_contact(contact: &str) -> Result<String, PatientError> {
    let trimmed = contact.trim();
    if trimmed.chars().count() < 9 {
        return Err(PatientError::InvalidContact);
    }
    Ok(trimmed.to_string())
}

fn validate_age(age: i64) -> Result<i32, PatientError> {
    if !(MIN_PATIENT_AGE..=MAX_PATIENT_AGE).contains(&age) {
        return Err(PatientError::InvalidAge {
            min: MIN_PATIENT_AGE,
            max: MAX_PATIENT_AGE,
        });
    }
    Ok(age as i32)
}

/// Full field snapshot for a CREATE entry: old is null
fn creation_changes(patient: &patient::Model) -> ChangeSet {
    let mut changes = ChangeSet::new();
    changes.insert(
        "name".to_string(),
        FieldChange::new(Value::Null, json!(patient.name)),
    );
    changes.insert(
        "age".to_string(),
        FieldChange::new(Value::Null, json!(patient.age)),
    );
    changes.insert(
        "contact".to_string(),
        FieldChange::new(Value::Null, json!(patient.contact)),
    );
    changes
}

/// Full field snapshot for a hard-delete entry: new is null
fn removal_changes(patient: &patient::Model) -> ChangeSet {
    let mut changes = ChangeSet::new();
    changes.insert(
        "name".to_string(),
        FieldChange::new(json!(patient.name), Value::Null),
    );
    changes.insert(
        "age".to_string(),
        FieldChange::new(json!(patient.age), Value::Null),
    );
    changes.insert(
        "contact".to_string(),
        FieldChange::new(json!(patient.contact), Value::Null),
    );
    changes
}

/// Patient registry: owns the patient lifecycle
///
/// Every mutating operation validates before touching storage, commits the
/// row as one statement or transaction, and only then writes the audit entry
/// and queues the notification. Audit and notification failures never affect
/// the committed mutation.
pub struct PatientService {
    patient_store: Arc<PatientStore>,
    audit: Arc<AuditTrail>,
    notifier: Notifier,
}

impl PatientService {
    /// Create a new PatientService
    pub fn new(patient_store: Arc<PatientStore>, audit: Arc<AuditTrail>, notifier: Notifier) -> Self {
        Self {
            patient_store,
            audit,
            notifier,
        }
    }

    /// Create a patient record
    pub async fn create(
        &self,
        name: &str,
        age: i64,
        contact: &str,
        actor: &str,
    ) -> Result<patient::Model, ServiceError> {
        if name.trim().is_empty() || contact.trim().is_empty() {
            return Err(PatientError::MissingFields.into());
        }

        let age = validate_age(age)?;
        let name = validate_name(name)?;
        let contact = validate_contact(contact)?;

        let created = self.patient_store.insert(name, age, contact, actor).await?;

        self.audit
            .record(
                ENTITY_TYPE,
                created.id,
                AuditAction::Create,
                actor,
                Some(creation_changes(&created)),
            )
            .await;
        self.notifier.emit(
            "patient_created",
            json!({"patient_id": created.id, "name": created.name}),
        );

        Ok(created)
    }

    /// Fetch a patient from the active set
    pub async fn get(&self, id: i32) -> Result<patient::Model, ServiceError> {
        self.patient_store
            .find_active(id)
            .await?
            .ok_or_else(|| PatientError::NotFound(id).into())
    }

    /// List patients with pagination and optional name search
    ///
    /// `page` defaults to 1, `per_page` to 10; `per_page` is silently clamped
    /// to 100. Soft-deleted rows are hidden unless `include_deleted` is set.
    pub async fn list(
        &self,
        page: Option<u64>,
        per_page: Option<u64>,
        search: Option<&str>,
        include_deleted: bool,
    ) -> Result<(Vec<patient::Model>, PaginationMeta), ServiceError> {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        let search = search.map(str::trim).filter(|term| !term.is_empty());

        let result = self
            .patient_store
            .list(page, per_page, search, include_deleted)
            .await?;

        let meta = PaginationMeta {
            page,
            per_page,
            total_pages: result.total_pages,
            total_items: result.total_items,
            has_next: page < result.total_pages,
            has_prev: page > 1,
        };

        Ok((result.items, meta))
    }

    /// Apply a partial update to an active patient
    ///
    /// Only submitted fields are validated and applied. The audit delta holds
    /// just the fields whose value actually changed; submitting a field at
    /// its current value does not create an audit entry. `updated_at` and
    /// `updated_by` are stamped even when nothing changed.
    pub async fn update(
        &self,
        id: i32,
        update: PatientUpdate,
        actor: &str,
    ) -> Result<patient::Model, ServiceError> {
        let current = self
            .patient_store
            .find_active(id)
            .await?
            .ok_or(PatientError::NotFound(id))?;

        let mut changes = ChangeSet::new();
        let mut pending: patient::ActiveModel = current.clone().into();

        if let Some(name) = update.name {
            let name = validate_name(&name)?;
            if name != current.name {
                changes.insert(
                    "name".to_string(),
                    FieldChange::new(json!(current.name), json!(name)),
                );
            }
            pending.name = Set(name);
        }

        if let Some(age) = update.age {
            let age = validate_age(age)?;
            if age != current.age {
                changes.insert(
                    "age".to_string(),
                    FieldChange::new(json!(current.age), json!(age)),
                );
            }
            pending.age = Set(age);
        }

        if let Some(contact) = update.contact {
            let contact = validate_contact(&contact)?;
            if contact != current.contact {
                changes.insert(
                    "contact".to_string(),
                    FieldChange::new(json!(current.contact), json!(contact)),
                );
            }
            pending.contact = Set(contact);
        }

        pending.updated_at = Set(Utc::now());
        pending.updated_by = Set(actor.to_string());

        let updated = self.patient_store.update(pending).await?;

        if !changes.is_empty() {
            self.audit
                .record(ENTITY_TYPE, updated.id, AuditAction::Update, actor, Some(changes))
                .await;
            self.notifier
                .emit("patient_updated", json!({"patient_id": updated.id}));
        }

        Ok(updated)
    }

    /// Soft-delete an active patient; its medical records stay intact
    pub async fn soft_delete(&self, id: i32, actor: &str) -> Result<(), ServiceError> {
        let current = self
            .patient_store
            .find_active(id)
            .await?
            .ok_or(PatientError::NotFound(id))?;

        let now = Utc::now();
        let mut pending: patient::ActiveModel = current.into();
        pending.is_deleted = Set(true);
        pending.deleted_at = Set(Some(now));
        pending.deleted_by = Set(Some(actor.to_string()));
        pending.updated_at = Set(now);
        pending.updated_by = Set(actor.to_string());

        self.patient_store.update(pending).await?;

        self.audit
            .record(ENTITY_TYPE, id, AuditAction::Delete, actor, None)
            .await;
        self.notifier
            .emit("patient_deleted", json!({"patient_id": id}));

        Ok(())
    }

    /// Bring a soft-deleted patient back into the active set
    ///
    /// The precondition is the inverse of soft_delete: the target must
    /// currently be soft-deleted, otherwise NotFound.
    pub async fn restore(&self, id: i32, actor: &str) -> Result<(), ServiceError> {
        let current = self
            .patient_store
            .find_any(id)
            .await?
            .filter(|p| p.is_deleted)
            .ok_or(PatientError::NotFound(id))?;

        let mut pending: patient::ActiveModel = current.into();
        pending.is_deleted = Set(false);
        pending.deleted_at = Set(None);
        pending.deleted_by = Set(None);
        pending.updated_at = Set(Utc::now());
        pending.updated_by = Set(actor.to_string());

        self.patient_store.update(pending).await?;

        self.audit
            .record(ENTITY_TYPE, id, AuditAction::Restore, actor, None)
            .await;
        self.notifier
            .emit("patient_restored", json!({"patient_id": id}));

        Ok(())
    }

    /// Permanently remove a patient and all of its medical records
    ///
    /// Works on soft-deleted rows too. Unlike soft_delete this cascades; the
    /// audit entry carries the removed row snapshot.
    pub async fn hard_delete(&self, id: i32, actor: &str) -> Result<(), ServiceError> {
        let current = self
            .patient_store
            .find_any(id)
            .await?
            .ok_or(PatientError::NotFound(id))?;

        self.patient_store.hard_delete(id).await?;

        self.audit
            .record(
                ENTITY_TYPE,
                id,
                AuditAction::Delete,
                actor,
                Some(removal_changes(&current)),
            )
            .await;
        self.notifier
            .emit("patient_deleted", json!({"patient_id": id, "permanent": true}));

        Ok(())
    }

    /// Serialize the active patient set to CSV
    pub async fn export_csv(&self) -> Result<String, ServiceError> {
        let patients = self.patient_store.list_all(false).await?;
        export::patients_to_csv(&patients)
    }
}
