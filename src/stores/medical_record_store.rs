use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::ServiceError;
use crate::types::db::medical_record::{self, Entity as MedicalRecord};

/// Repository for medical record rows. Append-only: there is no update or
/// delete operation on this store.
pub struct MedicalRecordStore {
    db: DatabaseConnection,
}

impl MedicalRecordStore {
    /// Create a new MedicalRecordStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append a record for a patient; visit_date and created_at are both now
    pub async fn insert(
        &self,
        patient_id: i32,
        diagnosis: String,
        prescription: Option<String>,
        notes: Option<String>,
        actor: &str,
    ) -> Result<medical_record::Model, ServiceError> {
        let now = Utc::now();
        let new_record = medical_record::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            patient_id: Set(patient_id),
            diagnosis: Set(diagnosis),
            prescription: Set(prescription),
            notes: Set(notes),
            visit_date: Set(now),
            created_by: Set(actor.to_string()),
            created_at: Set(now),
        };

        new_record
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::database("insert_medical_record", e))
    }

    /// All records for a patient, most recent visit first
    pub async fn list_for_patient(
        &self,
        patient_id: i32,
    ) -> Result<Vec<medical_record::Model>, ServiceError> {
        MedicalRecord::find()
            .filter(medical_record::Column::PatientId.eq(patient_id))
            .order_by_desc(medical_record::Column::VisitDate)
            .order_by_desc(medical_record::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::database("list_medical_records", e))
    }
}
