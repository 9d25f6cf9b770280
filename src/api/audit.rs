use std::sync::Arc;

use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::{OpenApi, Tags};

use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::services::{AccessControl, AuditTrail};
use crate::types::dto::audit::AuditLogResponse;
use crate::types::internal::role::Role;

/// Audit trail API endpoints
pub struct AuditApi {
    audit_trail: Arc<AuditTrail>,
    access_control: Arc<AccessControl>,
}

impl AuditApi {
    /// Create a new AuditApi
    pub fn new(audit_trail: Arc<AuditTrail>, access_control: Arc<AccessControl>) -> Self {
        Self {
            audit_trail,
            access_control,
        }
    }
}

/// API tags for audit endpoints
#[derive(Tags)]
enum AuditTags {
    /// Audit trail endpoints
    Audit,
}

#[OpenApi]
impl AuditApi {
    /// View the audit trail for one entity, newest first
    #[oai(
        path = "/audit/:entity_type/:entity_id",
        method = "get",
        tag = "AuditTags::Audit"
    )]
    async fn list_entries(
        &self,
        auth: BearerAuth,
        entity_type: Path<String>,
        entity_id: Path<i32>,
    ) -> Result<Json<Vec<AuditLogResponse>>, ApiError> {
        self.access_control
            .authorize(&auth.0.token, &[Role::Admin, Role::Doctor])
            .await?;

        let entries = self
            .audit_trail
            .list_for_entity(&entity_type.0, entity_id.0)
            .await?;

        Ok(Json(entries.into_iter().map(Into::into).collect()))
    }
}
