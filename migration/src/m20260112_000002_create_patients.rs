use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Patients::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Patients::Name).string().not_null())
                    .col(ColumnDef::new(Patients::Age).integer().not_null())
                    .col(ColumnDef::new(Patients::Contact).string().not_null())
                    .col(
                        ColumnDef::new(Patients::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Patients::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Patients::DeletedBy).string().null())
                    .col(
                        ColumnDef::new(Patients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Patients::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Patients::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Patients::UpdatedBy).string().not_null())
                    .to_owned(),
            )
            .await?;

        // List queries filter on the active set and search by name.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_patients_is_deleted")
                    .table(Patients::Table)
                    .col(Patients::IsDeleted)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_patients_name")
                    .table(Patients::Table)
                    .col(Patients::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Patients::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Patients {
    Table,
    Id,
    Name,
    Age,
    Contact,
    IsDeleted,
    DeletedAt,
    DeletedBy,
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
}
