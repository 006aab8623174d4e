use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::internal::{CredentialError, DatabaseError, InternalError};
use crate::types::db::admin;
use crate::types::internal::AdminRole;

/// Admin account persistence
pub struct AdminStore {
    db: DatabaseConnection,
}

impl AdminStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<admin::Model>, InternalError> {
        admin::Entity::find()
            .filter(admin::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_admin_by_username", e))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<admin::Model>, InternalError> {
        admin::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_admin_by_id", e))
    }

    /// Lookup backing the per-request admin authorization check: the row must
    /// exist and still be active.
    pub async fn find_active_by_id(&self, id: i32) -> Result<Option<admin::Model>, InternalError> {
        admin::Entity::find()
            .filter(admin::Column::Id.eq(id))
            .filter(admin::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_active_admin", e))
    }

    pub async fn insert(
        &self,
        username: &str,
        email: Option<String>,
        password_hash: String,
        role: AdminRole,
        now: i64,
    ) -> Result<admin::Model, InternalError> {
        let new_admin = admin::ActiveModel {
            id: NotSet,
            username: Set(username.to_string()),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(role.as_str().to_string()),
            is_active: Set(true),
            created_at: Set(now),
            last_login: Set(None),
        };

        new_admin.insert(&self.db).await.map_err(|e| {
            match DatabaseError::classify("insert_admin", e) {
                DatabaseError::UniqueViolation { .. } => {
                    CredentialError::DuplicateUsername(username.to_string()).into()
                }
                other => InternalError::Database(other),
            }
        })
    }

    pub async fn touch_last_login(&self, id: i32, now: i64) -> Result<(), InternalError> {
        admin::Entity::update_many()
            .col_expr(admin::Column::LastLogin, Expr::value(Some(now)))
            .filter(admin::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("touch_admin_last_login", e))?;
        Ok(())
    }

    /// Returns false when no such admin exists.
    pub async fn update_role(&self, id: i32, role: AdminRole) -> Result<bool, InternalError> {
        let result = admin::Entity::update_many()
            .col_expr(admin::Column::Role, Expr::value(role.as_str()))
            .filter(admin::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("update_admin_role", e))?;
        Ok(result.rows_affected > 0)
    }

    /// Returns false when no such admin exists.
    pub async fn deactivate(&self, id: i32) -> Result<bool, InternalError> {
        let result = admin::Entity::update_many()
            .col_expr(admin::Column::IsActive, Expr::value(false))
            .filter(admin::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("deactivate_admin", e))?;
        Ok(result.rows_affected > 0)
    }

    /// Newest-first page of admins, plus the unpaged total.
    pub async fn list(&self, page: u64, per_page: u64) -> Result<(Vec<admin::Model>, u64), InternalError> {
        let paginator = admin::Entity::find()
            .order_by_desc(admin::Column::CreatedAt)
            .paginate(&self.db, per_page.max(1));

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_admins", e))?;
        let admins = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| InternalError::database("list_admins", e))?;

        Ok((admins, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup() -> AdminStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");
        AdminStore::new(db)
    }

    #[tokio::test]
    async fn insert_and_lookup_by_username() {
        let store = setup().await;
        let admin = store
            .insert("clerk", None, "hash".to_string(), AdminRole::DataEntry, 1)
            .await
            .unwrap();

        let found = store.find_by_username("clerk").await.unwrap().unwrap();
        assert_eq!(found.id, admin.id);
        assert_eq!(found.role, "data_entry");
    }

    #[tokio::test]
    async fn duplicate_username_is_a_domain_error() {
        let store = setup().await;
        store
            .insert("clerk", None, "hash".to_string(), AdminRole::Viewer, 1)
            .await
            .unwrap();

        let err = store
            .insert("clerk", None, "hash2".to_string(), AdminRole::Viewer, 2)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InternalError::Credential(CredentialError::DuplicateUsername(_))
        ));
    }

    #[tokio::test]
    async fn deactivated_admin_disappears_from_active_lookup() {
        let store = setup().await;
        let admin = store
            .insert("clerk", None, "hash".to_string(), AdminRole::Viewer, 1)
            .await
            .unwrap();

        assert!(store.find_active_by_id(admin.id).await.unwrap().is_some());
        assert!(store.deactivate(admin.id).await.unwrap());
        assert!(store.find_active_by_id(admin.id).await.unwrap().is_none());
        // plain lookup still sees the row
        assert!(store.find_by_id(admin.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_role_persists_the_stored_role() {
        let store = setup().await;
        let admin = store
            .insert("clerk", None, "hash".to_string(), AdminRole::Viewer, 1)
            .await
            .unwrap();

        assert!(store.update_role(admin.id, AdminRole::SuperAdmin).await.unwrap());
        let found = store.find_by_id(admin.id).await.unwrap().unwrap();
        assert_eq!(found.role, "super_admin");

        assert!(!store.update_role(9999, AdminRole::Viewer).await.unwrap());
    }
}
