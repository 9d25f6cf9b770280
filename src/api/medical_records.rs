use std::sync::Arc;

use poem_openapi::param::Path;
use poem_openapi::payload::{Attachment, Json};
use poem_openapi::{OpenApi, Tags};

use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::services::medical_record_service::NewMedicalRecord;
use crate::services::{AccessControl, MedicalRecordService};
use crate::types::dto::medical_record::{CreateMedicalRecordRequest, MedicalRecordResponse};
use crate::types::internal::role::Role;

/// Medical record ledger API endpoints
pub struct MedicalRecordApi {
    medical_record_service: Arc<MedicalRecordService>,
    access_control: Arc<AccessControl>,
}

impl MedicalRecordApi {
    /// Create a new MedicalRecordApi
    pub fn new(
        medical_record_service: Arc<MedicalRecordService>,
        access_control: Arc<AccessControl>,
    ) -> Self {
        Self {
            medical_record_service,
            access_control,
        }
    }
}

/// API tags for medical record endpoints
#[derive(Tags)]
enum RecordTags {
    /// Medical record endpoints
    MedicalRecords,
}

#[OpenApi]
impl MedicalRecordApi {
    /// Append a medical record to a patient's ledger
    #[oai(
        path = "/patients/:patient_id/records",
        method = "post",
        tag = "RecordTags::MedicalRecords"
    )]
    async fn create_record(
        &self,
        auth: BearerAuth,
        patient_id: Path<i32>,
        body: Json<CreateMedicalRecordRequest>,
    ) -> Result<Json<MedicalRecordResponse>, ApiError> {
        let actor = self
            .access_control
            .authorize(&auth.0.token, &[Role::Admin, Role::Doctor])
            .await?;

        let body = body.0;
        let record = self
            .medical_record_service
            .create(
                patient_id.0,
                NewMedicalRecord {
                    diagnosis: body.diagnosis,
                    prescription: body.prescription,
                    notes: body.notes,
                },
                &actor.email,
            )
            .await?;

        Ok(Json(record.into()))
    }

    /// List a patient's medical records, most recent visit first
    #[oai(
        path = "/patients/:patient_id/records",
        method = "get",
        tag = "RecordTags::MedicalRecords"
    )]
    async fn list_records(
        &self,
        auth: BearerAuth,
        patient_id: Path<i32>,
    ) -> Result<Json<Vec<MedicalRecordResponse>>, ApiError> {
        self.access_control
            .authorize(&auth.0.token, &Role::ALL)
            .await?;

        let records = self
            .medical_record_service
            .list_for_patient(patient_id.0)
            .await?;

        Ok(Json(records.into_iter().map(Into::into).collect()))
    }

    /// Export a patient's medical records as CSV
    #[oai(
        path = "/patients/:patient_id/records/export",
        method = "get",
        tag = "RecordTags::MedicalRecords"
    )]
    async fn export_records(
        &self,
        auth: BearerAuth,
        patient_id: Path<i32>,
    ) -> Result<Attachment<Vec<u8>>, ApiError> {
        self.access_control
            .authorize(&auth.0.token, &[Role::Admin, Role::Doctor])
            .await?;

        let csv = self.medical_record_service.export_csv(patient_id.0).await?;

        Ok(Attachment::new(csv.into_bytes()).filename("medical_records.csv"))
    }
}
