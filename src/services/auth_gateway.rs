use std::sync::Arc;

use crate::errors::internal::{CredentialError, InternalError};
use crate::services::TokenService;
use crate::stores::AdminStore;
use crate::types::internal::{AdminActor, AdminRole, Claims};

/// Per-request authentication and authorization checks
///
/// Three layers, each strictly stronger than the last:
/// 1. `authenticate` - signature and expiry only, no database access.
/// 2. `authenticate_admin` - additionally requires the `isAdmin` claim and a
///    live, active admin row looked up fresh for this request.
/// 3. `require_role` - membership of the stored role in a permitted set;
///    only callable with the actor produced by `authenticate_admin`.
///
/// The token proves identity; the row decides authorization. Role changes
/// and deactivation take effect on the very next request even though issued
/// tokens cannot be revoked.
pub struct AuthGateway {
    token_service: Arc<TokenService>,
    admin_store: Arc<AdminStore>,
}

impl AuthGateway {
    pub fn new(token_service: Arc<TokenService>, admin_store: Arc<AdminStore>) -> Self {
        Self {
            token_service,
            admin_store,
        }
    }

    /// Citizen-level check. Admin tokens pass too; citizen routes scope their
    /// queries by the subject id, so an admin only ever sees their own data.
    pub fn authenticate(&self, token: &str) -> Result<Claims, InternalError> {
        let claims = self.token_service.validate(token)?;
        if claims.subject_id().is_none() {
            return Err(CredentialError::InvalidToken {
                reason: "non-numeric subject".to_string(),
            }
            .into());
        }
        Ok(claims)
    }

    /// Admin-level check: claim shape first (cheap, distinct error), then one
    /// fresh lookup of the admin row requiring it to exist and be active.
    pub async fn authenticate_admin(&self, token: &str) -> Result<AdminActor, InternalError> {
        let claims = self.token_service.validate(token)?;

        if !claims.is_admin {
            return Err(CredentialError::AdminAccessRequired.into());
        }

        let admin_id = claims.subject_id().ok_or_else(|| CredentialError::InvalidToken {
            reason: "non-numeric subject".to_string(),
        })?;

        let admin = self
            .admin_store
            .find_active_by_id(admin_id)
            .await?
            .ok_or(CredentialError::AdminInactive)?;

        Ok(AdminActor { claims, admin })
    }

    /// Role gate over the freshly loaded row, never the token claim.
    pub fn require_role(&self, actor: &AdminActor, allowed: &[AdminRole]) -> Result<(), InternalError> {
        match actor.role() {
            Some(role) if allowed.contains(&role) => Ok(()),
            _ => Err(CredentialError::InsufficientRole {
                role: actor.admin.role.clone(),
            }
            .into()),
        }
    }
}
