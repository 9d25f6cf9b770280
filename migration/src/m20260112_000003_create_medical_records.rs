use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MedicalRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MedicalRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MedicalRecords::PatientId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MedicalRecords::Diagnosis).string().not_null())
                    .col(ColumnDef::new(MedicalRecords::Prescription).string().null())
                    .col(ColumnDef::new(MedicalRecords::Notes).text().null())
                    .col(
                        ColumnDef::new(MedicalRecords::VisitDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MedicalRecords::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(MedicalRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medical_records_patient_id")
                            .from(MedicalRecords::Table, MedicalRecords::PatientId)
                            .to(Patients::Table, Patients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_medical_records_patient_id")
                    .table(MedicalRecords::Table)
                    .col(MedicalRecords::PatientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MedicalRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MedicalRecords {
    Table,
    Id,
    PatientId,
    Diagnosis,
    Prescription,
    Notes,
    VisitDate,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Patients {
    Table,
    Id,
}
