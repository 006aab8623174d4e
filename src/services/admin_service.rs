use chrono::Utc;
use std::sync::Arc;

use crate::errors::internal::{CredentialError, InternalError};
use crate::services::{crypto, TokenService};
use crate::stores::AdminStore;
use crate::types::db::admin;
use crate::types::dto::admin::{AdminLogin, NewAdmin};
use crate::types::internal::{AdminActor, AdminRole};

/// Default account seeded into an empty database so the portal is reachable.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@lifestyleclinic.com";

/// Admin login and account management flows
///
/// Self-modification guards live here rather than in the API layer so that
/// every caller of role changes and deactivation gets them.
pub struct AdminService {
    admin_store: Arc<AdminStore>,
    token_service: Arc<TokenService>,
}

impl AdminService {
    pub fn new(admin_store: Arc<AdminStore>, token_service: Arc<TokenService>) -> Self {
        Self {
            admin_store,
            token_service,
        }
    }

    /// Seed the default super admin if no account with that username exists.
    pub async fn ensure_default_admin(&self) -> Result<(), InternalError> {
        if self
            .admin_store
            .find_by_username(DEFAULT_ADMIN_USERNAME)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let password_hash = crypto::hash_password(DEFAULT_ADMIN_PASSWORD)?;
        self.admin_store
            .insert(
                DEFAULT_ADMIN_USERNAME,
                Some(DEFAULT_ADMIN_EMAIL.to_string()),
                password_hash,
                AdminRole::SuperAdmin,
                Utc::now().timestamp(),
            )
            .await?;

        tracing::warn!(
            "Default admin account created ({}); change the password after first login",
            DEFAULT_ADMIN_USERNAME
        );
        Ok(())
    }

    pub async fn login(&self, login: AdminLogin) -> Result<(String, admin::Model), InternalError> {
        let Some(mut admin) = self.admin_store.find_by_username(&login.username).await? else {
            return Err(CredentialError::InvalidCredentials.into());
        };

        if !admin.is_active {
            return Err(CredentialError::AccountInactive.into());
        }

        if !crypto::verify_password(&login.password, &admin.password_hash)? {
            return Err(CredentialError::InvalidCredentials.into());
        }

        let now = Utc::now().timestamp();
        self.admin_store.touch_last_login(admin.id, now).await?;
        admin.last_login = Some(now);

        let token = self.token_service.mint_admin_token(&admin)?;
        Ok((token, admin))
    }

    pub async fn create_admin(&self, new_admin: NewAdmin) -> Result<admin::Model, InternalError> {
        if self
            .admin_store
            .find_by_username(&new_admin.username)
            .await?
            .is_some()
        {
            return Err(CredentialError::DuplicateUsername(new_admin.username).into());
        }

        let password_hash = crypto::hash_password(&new_admin.password)?;
        let admin = self
            .admin_store
            .insert(
                &new_admin.username,
                None,
                password_hash,
                new_admin.role,
                Utc::now().timestamp(),
            )
            .await?;

        tracing::info!("Admin account created: {} ({})", admin.username, admin.role);
        Ok(admin)
    }

    pub async fn list_admins(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<admin::Model>, u64), InternalError> {
        self.admin_store.list(page, per_page).await
    }

    /// Change another admin's role. Changing one's own role is refused.
    pub async fn update_role(
        &self,
        actor: &AdminActor,
        target_id: i32,
        role: AdminRole,
    ) -> Result<(), InternalError> {
        if actor.admin_id() == target_id {
            return Err(CredentialError::SelfModificationDenied.into());
        }

        if !self.admin_store.update_role(target_id, role).await? {
            return Err(CredentialError::AdminNotFound(target_id.to_string()).into());
        }

        tracing::info!(
            "Admin {} role changed to {} by {}",
            target_id,
            role,
            actor.admin_id()
        );
        Ok(())
    }

    /// Deactivate another admin. Deactivating one's own account is refused.
    pub async fn deactivate(&self, actor: &AdminActor, target_id: i32) -> Result<(), InternalError> {
        if actor.admin_id() == target_id {
            return Err(CredentialError::SelfModificationDenied.into());
        }

        if !self.admin_store.deactivate(target_id).await? {
            return Err(CredentialError::AdminNotFound(target_id.to_string()).into());
        }

        tracing::info!("Admin {} deactivated by {}", target_id, actor.admin_id());
        Ok(())
    }
}
