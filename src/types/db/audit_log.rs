use sea_orm::entity::prelude::*;

/// Append-only audit row, written once per net-changing mutation.
/// `changes` holds a JSON map of field name to `{old, new}`, or null.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub entity_type: String,
    pub entity_id: i32,
    pub action: String,
    pub user_email: String,
    pub timestamp: DateTimeUtc,
    pub changes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
