use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::internal::{CredentialError, DatabaseError, InternalError};
use crate::types::db::user;
use crate::types::dto::auth::NewRegistration;

/// Citizen account persistence
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Insert a validated registration. The unique email constraint is the
    /// last line of defense against concurrent duplicate signups.
    pub async fn insert(
        &self,
        registration: &NewRegistration,
        password_hash: String,
        now: i64,
    ) -> Result<user::Model, InternalError> {
        let new_user = user::ActiveModel {
            id: NotSet,
            first_name: Set(registration.first_name.clone()),
            last_name: Set(registration.last_name.clone()),
            email: Set(registration.email.clone()),
            phone: Set(registration.phone.clone()),
            password_hash: Set(password_hash),
            agree_to_terms: Set(registration.agree_to_terms),
            subscribe_newsletter: Set(registration.subscribe_newsletter),
            is_active: Set(true),
            registration_time: Set(now),
            last_login: Set(None),
        };

        new_user.insert(&self.db).await.map_err(|e| {
            match DatabaseError::classify("insert_user", e) {
                DatabaseError::UniqueViolation { .. } => {
                    CredentialError::DuplicateEmail(registration.email.clone()).into()
                }
                other => InternalError::Database(other),
            }
        })
    }

    pub async fn touch_last_login(&self, id: i32, now: i64) -> Result<(), InternalError> {
        user::Entity::update_many()
            .col_expr(user::Column::LastLogin, Expr::value(Some(now)))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("touch_user_last_login", e))?;
        Ok(())
    }

    /// Returns false when no such user exists.
    pub async fn deactivate(&self, id: i32) -> Result<bool, InternalError> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::IsActive, Expr::value(false))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("deactivate_user", e))?;
        Ok(result.rows_affected > 0)
    }

    /// Newest-first page of users, plus the unpaged total.
    pub async fn list(&self, page: u64, per_page: u64) -> Result<(Vec<user::Model>, u64), InternalError> {
        let paginator = user::Entity::find()
            .order_by_desc(user::Column::RegistrationTime)
            .paginate(&self.db, per_page.max(1));

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_users", e))?;
        let users = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| InternalError::database("list_users", e))?;

        Ok((users, total))
    }

    pub async fn count(&self) -> Result<u64, InternalError> {
        user::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_users", e))
    }
}
