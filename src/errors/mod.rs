pub mod api;
pub mod domain;

pub use api::ApiError;
pub use domain::{AuthError, PatientError, RecordError, ServiceError};
