use std::sync::Arc;

use poem_openapi::param::{Path, Query};
use poem_openapi::payload::{Attachment, Json};
use poem_openapi::{OpenApi, Tags};

use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::services::patient_service::PatientUpdate;
use crate::services::{AccessControl, PatientService};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::patient::{
    CreatePatientRequest, PatientListResponse, PatientResponse, UpdatePatientRequest,
};
use crate::types::internal::role::Role;

/// Patient registry API endpoints
///
/// Every handler resolves the caller through AccessControl with the explicit
/// role set for that operation before touching the registry.
pub struct PatientApi {
    patient_service: Arc<PatientService>,
    access_control: Arc<AccessControl>,
}

impl PatientApi {
    /// Create a new PatientApi
    pub fn new(patient_service: Arc<PatientService>, access_control: Arc<AccessControl>) -> Self {
        Self {
            patient_service,
            access_control,
        }
    }
}

/// API tags for patient endpoints
#[derive(Tags)]
enum PatientTags {
    /// Patient management endpoints
    Patients,
}

#[OpenApi]
impl PatientApi {
    /// Create a new patient record
    #[oai(path = "/patients", method = "post", tag = "PatientTags::Patients")]
    async fn create_patient(
        &self,
        auth: BearerAuth,
        body: Json<CreatePatientRequest>,
    ) -> Result<Json<PatientResponse>, ApiError> {
        let actor = self
            .access_control
            .authorize(&auth.0.token, &[Role::Admin, Role::Doctor, Role::Nurse])
            .await?;

        let patient = self
            .patient_service
            .create(&body.name, body.age, &body.contact, &actor.email)
            .await?;

        Ok(Json(patient.into()))
    }

    /// List patients with pagination and optional name search
    #[oai(path = "/patients", method = "get", tag = "PatientTags::Patients")]
    async fn list_patients(
        &self,
        auth: BearerAuth,
        page: Query<Option<u64>>,
        per_page: Query<Option<u64>>,
        search: Query<Option<String>>,
        include_deleted: Query<Option<bool>>,
    ) -> Result<Json<PatientListResponse>, ApiError> {
        self.access_control
            .authorize(&auth.0.token, &Role::ALL)
            .await?;

        let (patients, pagination) = self
            .patient_service
            .list(
                page.0,
                per_page.0,
                search.0.as_deref(),
                include_deleted.0.unwrap_or(false),
            )
            .await?;

        Ok(Json(PatientListResponse {
            patients: patients.into_iter().map(Into::into).collect(),
            pagination,
        }))
    }

    /// Export the active patient set as CSV
    #[oai(path = "/patients/export", method = "get", tag = "PatientTags::Patients")]
    async fn export_patients(&self, auth: BearerAuth) -> Result<Attachment<Vec<u8>>, ApiError> {
        self.access_control
            .authorize(&auth.0.token, &[Role::Admin, Role::Doctor])
            .await?;

        let csv = self.patient_service.export_csv().await?;

        Ok(Attachment::new(csv.into_bytes()).filename("patients.csv"))
    }

    /// Fetch a single patient
    #[oai(path = "/patients/:id", method = "get", tag = "PatientTags::Patients")]
    async fn get_patient(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<PatientResponse>, ApiError> {
        self.access_control
            .authorize(&auth.0.token, &Role::ALL)
            .await?;

        let patient = self.patient_service.get(id.0).await?;

        Ok(Json(patient.into()))
    }

    /// Update an existing patient's information
    #[oai(path = "/patients/:id", method = "put", tag = "PatientTags::Patients")]
    async fn update_patient(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdatePatientRequest>,
    ) -> Result<Json<PatientResponse>, ApiError> {
        let actor = self
            .access_control
            .authorize(&auth.0.token, &[Role::Admin, Role::Doctor, Role::Nurse])
            .await?;

        let body = body.0;
        let patient = self
            .patient_service
            .update(
                id.0,
                PatientUpdate {
                    name: body.name,
                    age: body.age,
                    contact: body.contact,
                },
                &actor.email,
            )
            .await?;

        Ok(Json(patient.into()))
    }

    /// Soft-delete a patient; reversible via restore
    #[oai(path = "/patients/:id", method = "delete", tag = "PatientTags::Patients")]
    async fn delete_patient(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let actor = self
            .access_control
            .authorize(&auth.0.token, &[Role::Admin])
            .await?;

        self.patient_service.soft_delete(id.0, &actor.email).await?;

        Ok(Json(MessageResponse {
            message: "Patient deleted successfully".to_string(),
        }))
    }

    /// Restore a soft-deleted patient
    #[oai(path = "/patients/:id/restore", method = "post", tag = "PatientTags::Patients")]
    async fn restore_patient(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let actor = self
            .access_control
            .authorize(&auth.0.token, &[Role::Admin])
            .await?;

        self.patient_service.restore(id.0, &actor.email).await?;

        Ok(Json(MessageResponse {
            message: "Patient restored successfully".to_string(),
        }))
    }

    /// Permanently delete a patient and all of its medical records
    #[oai(path = "/patients/:id/permanent", method = "delete", tag = "PatientTags::Patients")]
    async fn hard_delete_patient(
        &self,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let actor = self
            .access_control
            .authorize(&auth.0.token, &[Role::Admin])
            .await?;

        self.patient_service.hard_delete(id.0, &actor.email).await?;

        Ok(Json(MessageResponse {
            message: "Patient permanently deleted".to_string(),
        }))
    }
}
