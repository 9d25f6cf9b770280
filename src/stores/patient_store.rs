use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ItemsAndPagesNumber,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::errors::ServiceError;
use crate::types::db::medical_record::{self, Entity as MedicalRecord};
use crate::types::db::patient::{self, Entity as Patient};

/// One page of patients plus the derived totals
#[derive(Debug)]
pub struct PatientPage {
    pub items: Vec<patient::Model>,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Repository for patient rows
pub struct PatientStore {
    db: DatabaseConnection,
}

impl PatientStore {
    /// Create a new PatientStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new patient row with creation and update stamps set to now
    pub async fn insert(
        &self,
        name: String,
        age: i32,
        contact: String,
        actor: &str,
    ) -> Result<patient::Model, ServiceError> {
        let now = Utc::now();
        let new_patient = patient::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            name: Set(name),
            age: Set(age),
            contact: Set(contact),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
            created_at: Set(now),
            created_by: Set(actor.to_string()),
            updated_at: Set(now),
            updated_by: Set(actor.to_string()),
        };

        new_patient
            .insert(&self.db)
            .await
            .map_err(|e| ServiceError::database("insert_patient", e))
    }

    /// Find a patient that has not been soft-deleted
    pub async fn find_active(&self, id: i32) -> Result<Option<patient::Model>, ServiceError> {
        Patient::find_by_id(id)
            .filter(patient::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::database("find_patient", e))
    }

    /// Find a patient regardless of soft-delete state
    pub async fn find_any(&self, id: i32) -> Result<Option<patient::Model>, ServiceError> {
        Patient::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::database("find_patient", e))
    }

    /// Fetch one page of patients ordered by id
    ///
    /// # Arguments
    /// * `page` - 1-based page number
    /// * `per_page` - page size (caller is responsible for clamping)
    /// * `search` - case-insensitive substring match on name
    /// * `include_deleted` - when false, only the active set is visible
    ///
    /// A page past the end yields an empty item list, not an error.
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
        search: Option<&str>,
        include_deleted: bool,
    ) -> Result<PatientPage, ServiceError> {
        let mut query = Patient::find();

        if !include_deleted {
            query = query.filter(patient::Column::IsDeleted.eq(false));
        }

        if let Some(term) = search {
            let pattern = format!("%{}%", term.to_lowercase());
            query = query
                .filter(Expr::expr(Func::lower(Expr::col(patient::Column::Name))).like(pattern));
        }

        let paginator = query
            .order_by_asc(patient::Column::Id)
            .paginate(&self.db, per_page);

        let ItemsAndPagesNumber {
            number_of_items,
            number_of_pages,
        } = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| ServiceError::database("count_patients", e))?;

        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| ServiceError::database("list_patients", e))?;

        Ok(PatientPage {
            items,
            total_items: number_of_items,
            total_pages: number_of_pages,
        })
    }

    /// Fetch every patient ordered by id, for export
    pub async fn list_all(&self, include_deleted: bool) -> Result<Vec<patient::Model>, ServiceError> {
        let mut query = Patient::find();

        if !include_deleted {
            query = query.filter(patient::Column::IsDeleted.eq(false));
        }

        query
            .order_by_asc(patient::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::database("list_all_patients", e))
    }

    /// Persist field changes on an existing patient row
    pub async fn update(
        &self,
        patient: patient::ActiveModel,
    ) -> Result<patient::Model, ServiceError> {
        patient
            .update(&self.db)
            .await
            .map_err(|e| ServiceError::database("update_patient", e))
    }

    /// Remove a patient row and all of its medical records
    ///
    /// Runs in a single transaction so a partial cascade is never visible.
    pub async fn hard_delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ServiceError::transaction("hard_delete_patient", e))?;

        MedicalRecord::delete_many()
            .filter(medical_record::Column::PatientId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| ServiceError::database("delete_patient_records", e))?;

        Patient::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| ServiceError::database("delete_patient", e))?;

        txn.commit()
            .await
            .map_err(|e| ServiceError::transaction("hard_delete_patient", e))
    }
}
