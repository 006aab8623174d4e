use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::errors::internal::InternalError;
use crate::types::db::{health_form, user};
use crate::types::dto::admin::StatusUpdate;
use crate::types::dto::forms::NewFormSubmission;
use crate::types::internal::{FormFilter, FormStatus};

/// Health assessment form persistence
pub struct FormStore {
    db: DatabaseConnection,
}

impl FormStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(
        &self,
        user_id: i32,
        form_id: String,
        submission: &NewFormSubmission,
        now: i64,
    ) -> Result<health_form::Model, InternalError> {
        let new_form = health_form::ActiveModel {
            id: NotSet,
            form_id: Set(form_id),
            user_id: Set(user_id),
            full_name: Set(submission.full_name.clone()),
            father_mother_name: Set(submission.father_mother_name.clone()),
            age: Set(submission.age),
            gender: Set(submission.gender.as_str().to_string()),
            contact: Set(submission.contact.clone()),
            complete_address: Set(submission.complete_address.clone()),
            medical_system: Set(submission.medical_system.as_str().to_string()),
            primary_issue: Set(submission.primary_issue.clone()),
            symptoms: Set(submission.symptoms.clone()),
            status: Set(FormStatus::Submitted.as_str().to_string()),
            admin_notes: Set(None),
            assigned_doctor_id: Set(None),
            consultation_date: Set(None),
            submitted_at: Set(now),
            updated_at: Set(now),
        };

        new_form
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_form", e))
    }

    /// Citizen-facing lookup by the public form identifier.
    pub async fn find_by_form_id(&self, form_id: &str) -> Result<Option<health_form::Model>, InternalError> {
        health_form::Entity::find()
            .filter(health_form::Column::FormId.eq(form_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_form_by_form_id", e))
    }

    /// Admin-facing lookup by primary key.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<health_form::Model>, InternalError> {
        health_form::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_form_by_id", e))
    }

    pub async fn find_by_id_with_user(
        &self,
        id: i32,
    ) -> Result<Option<(health_form::Model, Option<user::Model>)>, InternalError> {
        health_form::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_form_with_user", e))
    }

    /// Newest-first page of one citizen's forms, plus the unpaged total.
    pub async fn list_for_user(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<health_form::Model>, u64), InternalError> {
        let paginator = health_form::Entity::find()
            .filter(health_form::Column::UserId.eq(user_id))
            .order_by_desc(health_form::Column::SubmittedAt)
            .paginate(&self.db, per_page.max(1));

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_user_forms", e))?;
        let forms = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| InternalError::database("list_user_forms", e))?;

        Ok((forms, total))
    }

    pub async fn all_for_user(&self, user_id: i32) -> Result<Vec<health_form::Model>, InternalError> {
        health_form::Entity::find()
            .filter(health_form::Column::UserId.eq(user_id))
            .order_by_desc(health_form::Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("all_user_forms", e))
    }

    pub async fn recent_for_user(
        &self,
        user_id: i32,
        limit: u64,
    ) -> Result<Vec<health_form::Model>, InternalError> {
        health_form::Entity::find()
            .filter(health_form::Column::UserId.eq(user_id))
            .order_by_desc(health_form::Column::SubmittedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("recent_user_forms", e))
    }

    /// Status column of every form the citizen submitted; the statistics
    /// endpoint folds these in memory.
    pub async fn statuses_for_user(&self, user_id: i32) -> Result<Vec<String>, InternalError> {
        health_form::Entity::find()
            .select_only()
            .column(health_form::Column::Status)
            .filter(health_form::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("user_form_statuses", e))
    }

    /// Filtered, newest-first page across all citizens, joined with the
    /// submitter row. Filters run as SQL predicates.
    pub async fn admin_list(
        &self,
        filter: &FormFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<(health_form::Model, Option<user::Model>)>, u64), InternalError> {
        let query = apply_filter(
            health_form::Entity::find().find_also_related(user::Entity),
            filter,
        );
        let paginator = query
            .order_by_desc(health_form::Column::SubmittedAt)
            .paginate(&self.db, per_page.max(1));

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_filtered_forms", e))?;
        let forms = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| InternalError::database("list_filtered_forms", e))?;

        Ok((forms, total))
    }

    /// Returns false when no such form exists.
    pub async fn update_status(
        &self,
        id: i32,
        update: &StatusUpdate,
        now: i64,
    ) -> Result<bool, InternalError> {
        let result = health_form::Entity::update_many()
            .col_expr(health_form::Column::Status, Expr::value(update.status.as_str()))
            .col_expr(health_form::Column::AdminNotes, Expr::value(update.admin_notes.clone()))
            .col_expr(
                health_form::Column::AssignedDoctorId,
                Expr::value(update.assigned_doctor_id),
            )
            .col_expr(
                health_form::Column::ConsultationDate,
                Expr::value(update.consultation_date),
            )
            .col_expr(health_form::Column::UpdatedAt, Expr::value(now))
            .filter(health_form::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("update_form_status", e))?;
        Ok(result.rows_affected > 0)
    }

    /// Returns false when no such form exists.
    pub async fn delete(&self, id: i32) -> Result<bool, InternalError> {
        let result = health_form::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_form", e))?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64, InternalError> {
        health_form::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_forms", e))
    }

    pub async fn count_since(&self, since: i64) -> Result<u64, InternalError> {
        health_form::Entity::find()
            .filter(health_form::Column::SubmittedAt.gte(since))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_recent_forms", e))
    }

    /// Distinct citizens who submitted since the given timestamp.
    pub async fn active_users_since(&self, since: i64) -> Result<u64, InternalError> {
        let ids: Vec<i32> = health_form::Entity::find()
            .select_only()
            .column(health_form::Column::UserId)
            .filter(health_form::Column::SubmittedAt.gte(since))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("active_users_since", e))?;
        Ok(ids.len() as u64)
    }

    /// `(submitted_at, user_id)` pairs inside the window, for the monthly
    /// report fold. The scan is bounded by the year being reported.
    pub async fn submissions_in(
        &self,
        from: i64,
        until: i64,
    ) -> Result<Vec<(i64, i32)>, InternalError> {
        health_form::Entity::find()
            .select_only()
            .column(health_form::Column::SubmittedAt)
            .column(health_form::Column::UserId)
            .filter(health_form::Column::SubmittedAt.gte(from))
            .filter(health_form::Column::SubmittedAt.lt(until))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("submissions_in_window", e))
    }
}

fn apply_filter<Q: QueryFilter>(mut query: Q, filter: &FormFilter) -> Q {
    if let Some(system) = filter.medical_system {
        query = query.filter(health_form::Column::MedicalSystem.eq(system.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(health_form::Column::Status.eq(status.as_str()));
    }
    if let Some(from) = filter.submitted_from {
        query = query.filter(health_form::Column::SubmittedAt.gte(from));
    }
    if let Some(until) = filter.submitted_until {
        query = query.filter(health_form::Column::SubmittedAt.lt(until));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::internal::{Gender, MedicalSystem};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> (DatabaseConnection, FormStore) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");
        (db.clone(), FormStore::new(db))
    }

    async fn seed_user(db: &DatabaseConnection, email: &str) -> i32 {
        let user = user::ActiveModel {
            id: NotSet,
            first_name: Set("Test".to_string()),
            last_name: Set("Citizen".to_string()),
            email: Set(email.to_string()),
            phone: Set("9876543210".to_string()),
            password_hash: Set("hash".to_string()),
            agree_to_terms: Set(true),
            subscribe_newsletter: Set(true),
            is_active: Set(true),
            registration_time: Set(0),
            last_login: Set(None),
        };
        user.insert(db).await.expect("Failed to seed user").id
    }

    fn submission(system: MedicalSystem) -> NewFormSubmission {
        NewFormSubmission {
            full_name: "Test Citizen".to_string(),
            father_mother_name: "Parent Citizen".to_string(),
            age: 40,
            gender: Gender::Male,
            contact: "9876543210".to_string(),
            complete_address: "12 Shastri Nagar, Raipur".to_string(),
            medical_system: system,
            primary_issue: "Recurring migraines".to_string(),
            symptoms: None,
        }
    }

    #[tokio::test]
    async fn insert_and_both_lookups_round_trip() {
        let (db, store) = setup().await;
        let user_id = seed_user(&db, "citizen@example.com").await;

        let form = store
            .insert(user_id, "F2506101230042".to_string(), &submission(MedicalSystem::Any), 100)
            .await
            .unwrap();
        assert_eq!(form.status, "submitted");

        let by_form_id = store.find_by_form_id("F2506101230042").await.unwrap().unwrap();
        assert_eq!(by_form_id.id, form.id);

        let (by_pk, joined_user) = store.find_by_id_with_user(form.id).await.unwrap().unwrap();
        assert_eq!(by_pk.form_id, form.form_id);
        assert_eq!(joined_user.unwrap().email, "citizen@example.com");
    }

    #[tokio::test]
    async fn list_for_user_is_scoped_and_paged() {
        let (db, store) = setup().await;
        let alice = seed_user(&db, "alice@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;

        for i in 0..3 {
            store
                .insert(alice, format!("FA{}", i), &submission(MedicalSystem::Any), i)
                .await
                .unwrap();
        }
        store
            .insert(bob, "FB0".to_string(), &submission(MedicalSystem::Any), 50)
            .await
            .unwrap();

        let (forms, total) = store.list_for_user(alice, 1, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(forms.len(), 2);
        assert!(forms.iter().all(|f| f.user_id == alice));
        // newest first
        assert_eq!(forms[0].form_id, "FA2");
    }

    #[tokio::test]
    async fn admin_list_filters_compile_to_sql() {
        let (db, store) = setup().await;
        let user_id = seed_user(&db, "citizen@example.com").await;

        store
            .insert(user_id, "F1".to_string(), &submission(MedicalSystem::Ayurvedic), 1_000)
            .await
            .unwrap();
        store
            .insert(user_id, "F2".to_string(), &submission(MedicalSystem::Allopathic), 2_000)
            .await
            .unwrap();
        store
            .insert(user_id, "F3".to_string(), &submission(MedicalSystem::Ayurvedic), 3_000)
            .await
            .unwrap();

        let filter = FormFilter {
            medical_system: Some(MedicalSystem::Ayurvedic),
            submitted_from: Some(2_000),
            ..Default::default()
        };
        let (rows, total) = store.admin_list(&filter, 1, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].0.form_id, "F3");
        assert_eq!(rows[0].1.as_ref().unwrap().email, "citizen@example.com");
    }

    #[tokio::test]
    async fn status_update_writes_all_review_fields() {
        let (db, store) = setup().await;
        let user_id = seed_user(&db, "citizen@example.com").await;
        let form = store
            .insert(user_id, "F1".to_string(), &submission(MedicalSystem::Any), 100)
            .await
            .unwrap();

        let update = StatusUpdate {
            status: FormStatus::ConsultationScheduled,
            admin_notes: Some("bring reports".to_string()),
            assigned_doctor_id: Some(7),
            consultation_date: Some(5_000),
        };
        assert!(store.update_status(form.id, &update, 200).await.unwrap());

        let stored = store.find_by_id(form.id).await.unwrap().unwrap();
        assert_eq!(stored.status, "consultation_scheduled");
        assert_eq!(stored.admin_notes.as_deref(), Some("bring reports"));
        assert_eq!(stored.assigned_doctor_id, Some(7));
        assert_eq!(stored.consultation_date, Some(5_000));
        assert_eq!(stored.updated_at, 200);

        assert!(!store.update_status(9999, &update, 300).await.unwrap());
    }

    #[tokio::test]
    async fn dashboard_counters_count_what_they_say() {
        let (db, store) = setup().await;
        let alice = seed_user(&db, "alice@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;

        store.insert(alice, "F1".to_string(), &submission(MedicalSystem::Any), 100).await.unwrap();
        store.insert(alice, "F2".to_string(), &submission(MedicalSystem::Any), 900).await.unwrap();
        store.insert(bob, "F3".to_string(), &submission(MedicalSystem::Any), 950).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 3);
        assert_eq!(store.count_since(900).await.unwrap(), 2);
        assert_eq!(store.active_users_since(900).await.unwrap(), 2);
        assert_eq!(store.active_users_since(925).await.unwrap(), 1);

        let pairs = store.submissions_in(100, 950).await.unwrap();
        assert_eq!(pairs.len(), 2);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_hit() {
        let (db, store) = setup().await;
        let user_id = seed_user(&db, "citizen@example.com").await;
        let form = store
            .insert(user_id, "F1".to_string(), &submission(MedicalSystem::Any), 100)
            .await
            .unwrap();

        assert!(store.delete(form.id).await.unwrap());
        assert!(store.find_by_id(form.id).await.unwrap().is_none());
        assert!(!store.delete(form.id).await.unwrap());
    }
}
