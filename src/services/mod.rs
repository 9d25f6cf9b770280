// Services layer - Business logic and orchestration
pub mod access_control;
pub mod audit_trail;
pub mod auth_service;
pub mod crypto;
pub mod export;
pub mod medical_record_service;
pub mod notifier;
pub mod patient_service;
pub mod token_service;

pub use access_control::AccessControl;
pub use audit_trail::AuditTrail;
pub use auth_service::AuthService;
pub use medical_record_service::MedicalRecordService;
pub use notifier::Notifier;
pub use patient_service::PatientService;
pub use token_service::TokenService;
