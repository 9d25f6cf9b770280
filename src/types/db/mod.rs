// Database entities (sea-orm models)
pub mod audit_log;
pub mod medical_record;
pub mod patient;
pub mod user;
