use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::patient;
use crate::types::dto::common::PaginationMeta;

/// Request model for patient creation
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    /// Patient name (trimmed length >= 2)
    pub name: String,

    /// Age in years, 0 to 150
    pub age: i64,

    /// Contact number (trimmed length >= 9)
    pub contact: String,
}

/// Request model for partial patient update; absent fields are left unchanged
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    /// New patient name
    pub name: Option<String>,

    /// New age in years
    pub age: Option<i64>,

    /// New contact number
    pub contact: Option<String>,
}

/// Response model for a single patient
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PatientResponse {
    /// Patient ID
    pub id: i32,

    /// Patient name
    pub name: String,

    /// Age in years
    pub age: i32,

    /// Contact number
    pub contact: String,

    /// Whether the patient is soft-deleted
    pub is_deleted: bool,

    /// Deletion timestamp (ISO 8601), set iff soft-deleted
    pub deleted_at: Option<String>,

    /// Actor who soft-deleted the patient
    pub deleted_by: Option<String>,

    /// Creation timestamp (ISO 8601)
    pub created_at: String,

    /// Actor who created the patient
    pub created_by: String,

    /// Last mutation timestamp (ISO 8601)
    pub updated_at: String,

    /// Actor of the last mutation
    pub updated_by: String,
}

impl From<patient::Model> for PatientResponse {
    fn from(patient: patient::Model) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            age: patient.age,
            contact: patient.contact,
            is_deleted: patient.is_deleted,
            deleted_at: patient.deleted_at.map(|t| t.to_rfc3339()),
            deleted_by: patient.deleted_by,
            created_at: patient.created_at.to_rfc3339(),
            created_by: patient.created_by,
            updated_at: patient.updated_at.to_rfc3339(),
            updated_by: patient.updated_by,
        }
    }
}

/// Response model for the paginated patient list
#[derive(Object, Debug)]
pub struct PatientListResponse {
    /// Patients on this page
    pub patients: Vec<PatientResponse>,

    /// Derived pagination metadata
    pub pagination: PaginationMeta,
}
