use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::medical_record;

/// Request model for appending a medical record to a patient
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateMedicalRecordRequest {
    /// Diagnosis (required, non-empty)
    pub diagnosis: String,

    /// Prescription, if any
    pub prescription: Option<String>,

    /// Free-form clinical notes
    pub notes: Option<String>,
}

/// Response model for a single medical record
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct MedicalRecordResponse {
    /// Record ID
    pub id: i32,

    /// Owning patient ID
    pub patient_id: i32,

    /// Diagnosis
    pub diagnosis: String,

    /// Prescription, if any
    pub prescription: Option<String>,

    /// Free-form clinical notes
    pub notes: Option<String>,

    /// Visit timestamp (ISO 8601)
    pub visit_date: String,

    /// Actor who created the record
    pub created_by: String,

    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl From<medical_record::Model> for MedicalRecordResponse {
    fn from(record: medical_record::Model) -> Self {
        Self {
            id: record.id,
            patient_id: record.patient_id,
            diagnosis: record.diagnosis,
            prescription: record.prescription,
            notes: record.notes,
            visit_date: record.visit_date.to_rfc3339(),
            created_by: record.created_by,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}
