use std::sync::Arc;

use serde_json::{json, Value};

use crate::errors::{PatientError, RecordError, ServiceError};
use crate::services::export;
use crate::services::notifier::Notifier;
use crate::services::AuditTrail;
use crate::stores::{MedicalRecordStore, PatientStore};
use crate::types::db::medical_record;
use crate::types::internal::audit::{AuditAction, ChangeSet, FieldChange};

/// Entity type tag used for audit entries on medical records
pub const ENTITY_TYPE: &str = "medical_record";

/// Input for appending a record to a patient's ledger
#[derive(Debug, Clone)]
pub struct NewMedicalRecord {
    pub diagnosis: String,
    pub prescription: Option<String>,
    pub notes: Option<String>,
}

/// Medical record ledger: per-patient clinical entries, append-only
pub struct MedicalRecordService {
    record_store: Arc<MedicalRecordStore>,
    patient_store: Arc<PatientStore>,
    audit: Arc<AuditTrail>,
    notifier: Notifier,
}

impl MedicalRecordService {
    /// Create a new MedicalRecordService
    pub fn new(
        record_store: Arc<MedicalRecordStore>,
        patient_store: Arc<PatientStore>,
        audit: Arc<AuditTrail>,
        notifier: Notifier,
    ) -> Self {
        Self {
            record_store,
            patient_store,
            audit,
            notifier,
        }
    }

    /// Append a record to an active patient's ledger
    ///
    /// The patient must exist and not be soft-deleted at creation time.
    pub async fn create(
        &self,
        patient_id: i32,
        input: NewMedicalRecord,
        actor: &str,
    ) -> Result<medical_record::Model, ServiceError> {
        let patient = self
            .patient_store
            .find_active(patient_id)
            .await?
            .ok_or(PatientError::NotFound(patient_id))?;

        let diagnosis = input.diagnosis.trim();
        if diagnosis.is_empty() {
            return Err(RecordError::MissingDiagnosis.into());
        }

        let created = self
            .record_store
            .insert(
                patient.id,
                diagnosis.to_string(),
                input.prescription,
                input.notes,
                actor,
            )
            .await?;

        let mut changes = ChangeSet::new();
        changes.insert(
            "patient_id".to_string(),
            FieldChange::new(Value::Null, json!(created.patient_id)),
        );
        changes.insert(
            "diagnosis".to_string(),
            FieldChange::new(Value::Null, json!(created.diagnosis)),
        );
        self.audit
            .record(ENTITY_TYPE, created.id, AuditAction::Create, actor, Some(changes))
            .await;
        self.notifier.emit(
            "medical_record_created",
            json!({"record_id": created.id, "patient_id": created.patient_id}),
        );

        Ok(created)
    }

    /// All records for an active patient, most recent visit first
    pub async fn list_for_patient(
        &self,
        patient_id: i32,
    ) -> Result<Vec<medical_record::Model>, ServiceError> {
        self.patient_store
            .find_active(patient_id)
            .await?
            .ok_or(PatientError::NotFound(patient_id))?;

        self.record_store.list_for_patient(patient_id).await
    }

    /// Serialize an active patient's ledger to CSV
    pub async fn export_csv(&self, patient_id: i32) -> Result<String, ServiceError> {
        let patient = self
            .patient_store
            .find_active(patient_id)
            .await?
            .ok_or(PatientError::NotFound(patient_id))?;

        let records = self.record_store.list_for_patient(patient_id).await?;
        export::medical_records_to_csv(&patient, &records)
    }
}
