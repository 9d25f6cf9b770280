// API layer - HTTP endpoints
pub mod audit;
pub mod auth;
pub mod health;
pub mod medical_records;
pub mod patients;

pub use audit::AuditApi;
pub use auth::AuthApi;
pub use health::HealthApi;
pub use medical_records::MedicalRecordApi;
pub use patients::PatientApi;

use poem_openapi::auth::Bearer;
use poem_openapi::SecurityScheme;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);
