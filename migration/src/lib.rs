pub use sea_orm_migration::prelude::*;

mod m20260112_000001_create_users;
mod m20260112_000002_create_patients;
mod m20260112_000003_create_medical_records;
mod m20260112_000004_create_audit_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260112_000001_create_users::Migration),
            Box::new(m20260112_000002_create_patients::Migration),
            Box::new(m20260112_000003_create_medical_records::Migration),
            Box::new(m20260112_000004_create_audit_logs::Migration),
        ]
    }
}
