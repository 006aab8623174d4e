use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::helpers::{limit_param, page_param, page_window};
use crate::api::BearerAuth;
use crate::errors::internal::CredentialError;
use crate::errors::{AdminError, InternalError};
use crate::services::{AdminService, AuthGateway};
use crate::types::dto::admin::{
    AdminAuthData, AdminData, AdminListData, AdminListResponse, AdminLoginRequest,
    AdminLoginResponse, AdminMeData, AdminMeResponse, AdminsPagination, CreateAdminApiResponse,
    CreateAdminRequest, CreateAdminResponse, CreatedAdminData, UpdateRoleRequest,
};
use crate::types::dto::common::Acknowledgement;
use crate::types::internal::{AdminActor, AdminRole};

/// Admin authentication and account management endpoints
pub struct AdminAuthApi {
    admin_service: Arc<AdminService>,
    gateway: Arc<AuthGateway>,
    debug: bool,
}

impl AdminAuthApi {
    pub fn new(admin_service: Arc<AdminService>, gateway: Arc<AuthGateway>, debug: bool) -> Self {
        Self {
            admin_service,
            gateway,
            debug,
        }
    }

    fn shape(&self, err: InternalError) -> AdminError {
        AdminError::from_internal(err, self.debug)
    }

    /// Shared preamble of the super_admin-only endpoints.
    async fn require_super_admin(&self, auth: &BearerAuth) -> Result<AdminActor, AdminError> {
        let actor = self
            .gateway
            .authenticate_admin(&auth.0.token)
            .await
            .map_err(|e| self.shape(e))?;
        self.gateway
            .require_role(&actor, &[AdminRole::SuperAdmin])
            .map_err(|e| self.shape(e))?;
        Ok(actor)
    }
}

#[derive(Tags)]
enum AdminAuthTags {
    /// Admin login and account management
    AdminAuth,
}

#[OpenApi(prefix_path = "/api/admin-auth")]
impl AdminAuthApi {
    /// Log in with username and password
    #[oai(path = "/login", method = "post", tag = "AdminAuthTags::AdminAuth")]
    async fn login(&self, body: Json<AdminLoginRequest>) -> Result<Json<AdminLoginResponse>, AdminError> {
        let login = body.0.validate().map_err(AdminError::validation_failed)?;

        let (token, admin) = self.admin_service.login(login).await.map_err(|e| self.shape(e))?;

        Ok(Json(AdminLoginResponse {
            success: true,
            message: "Admin login successful".to_string(),
            data: AdminAuthData {
                token,
                admin: AdminData::from(&admin),
            },
        }))
    }

    /// Current admin behind the presented token
    #[oai(path = "/me", method = "get", tag = "AdminAuthTags::AdminAuth")]
    async fn me(&self, auth: BearerAuth) -> Result<Json<AdminMeResponse>, AdminError> {
        let actor = self
            .gateway
            .authenticate_admin(&auth.0.token)
            .await
            .map_err(|e| self.shape(e))?;

        Ok(Json(AdminMeResponse {
            success: true,
            data: AdminMeData {
                admin: AdminData::from(&actor.admin),
            },
        }))
    }

    /// Stateless logout acknowledgement; the client discards the token
    #[oai(path = "/logout", method = "post", tag = "AdminAuthTags::AdminAuth")]
    async fn logout(&self, auth: BearerAuth) -> Result<Json<Acknowledgement>, AdminError> {
        self.gateway
            .authenticate_admin(&auth.0.token)
            .await
            .map_err(|e| self.shape(e))?;

        Ok(Json(Acknowledgement::new(
            "Admin logout successful. Please remove the token from client-side storage.",
        )))
    }

    /// Create a new admin account (super admin only)
    #[oai(path = "/create-admin", method = "post", tag = "AdminAuthTags::AdminAuth")]
    async fn create_admin(
        &self,
        auth: BearerAuth,
        body: Json<CreateAdminRequest>,
    ) -> Result<CreateAdminApiResponse, AdminError> {
        self.require_super_admin(&auth).await?;
        let new_admin = body.0.validate().map_err(AdminError::validation_failed)?;

        let admin = self
            .admin_service
            .create_admin(new_admin)
            .await
            .map_err(|e| self.shape(e))?;

        Ok(CreateAdminApiResponse::Created(Json(CreateAdminResponse {
            success: true,
            message: "Admin created successfully".to_string(),
            data: CreatedAdminData {
                admin: AdminData::from(&admin),
            },
        })))
    }

    /// List admin accounts, newest first (super admin only)
    #[oai(path = "/admins", method = "get", tag = "AdminAuthTags::AdminAuth")]
    async fn list_admins(
        &self,
        auth: BearerAuth,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<AdminListResponse>, AdminError> {
        self.require_super_admin(&auth).await?;

        let page = page_param(page.0);
        let per_page = limit_param(limit.0, 10);
        let (admins, total) = self
            .admin_service
            .list_admins(page, per_page)
            .await
            .map_err(|e| self.shape(e))?;
        let (total_pages, has_next, has_prev) = page_window(total, page, per_page);

        Ok(Json(AdminListResponse {
            success: true,
            data: AdminListData {
                admins: admins.iter().map(AdminData::from).collect(),
                pagination: AdminsPagination {
                    current_page: page,
                    total_pages,
                    total_admins: total,
                    has_next,
                    has_prev,
                },
            },
        }))
    }

    /// Change another admin's role (super admin only, never one's own)
    #[oai(path = "/admin/:admin_id/role", method = "put", tag = "AdminAuthTags::AdminAuth")]
    async fn update_role(
        &self,
        auth: BearerAuth,
        admin_id: Path<i32>,
        body: Json<UpdateRoleRequest>,
    ) -> Result<Json<Acknowledgement>, AdminError> {
        let actor = self.require_super_admin(&auth).await?;
        let role = body.0.validate().map_err(AdminError::validation_failed)?;

        self.admin_service
            .update_role(&actor, admin_id.0, role)
            .await
            .map_err(|e| match e {
                InternalError::Credential(CredentialError::SelfModificationDenied) => {
                    AdminError::self_modification("You cannot change your own role")
                }
                other => self.shape(other),
            })?;

        Ok(Json(Acknowledgement::new("Admin role updated successfully")))
    }

    /// Deactivate another admin (super admin only, never one's own)
    #[oai(path = "/admin/:admin_id/deactivate", method = "put", tag = "AdminAuthTags::AdminAuth")]
    async fn deactivate(
        &self,
        auth: BearerAuth,
        admin_id: Path<i32>,
    ) -> Result<Json<Acknowledgement>, AdminError> {
        let actor = self.require_super_admin(&auth).await?;

        self.admin_service
            .deactivate(&actor, admin_id.0)
            .await
            .map_err(|e| match e {
                InternalError::Credential(CredentialError::SelfModificationDenied) => {
                    AdminError::self_modification("You cannot deactivate your own account")
                }
                other => self.shape(other),
            })?;

        Ok(Json(Acknowledgement::new("Admin deactivated successfully")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::TokenService;
    use crate::stores::AdminStore;
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::Bearer;
    use sea_orm::Database;

    async fn setup() -> (Arc<AdminService>, AdminAuthApi) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let admin_store = Arc::new(AdminStore::new(db));
        let token_service = Arc::new(TokenService::new(
            "test-secret-key-minimum-32-characters-long".to_string(),
            168,
        ));
        let admin_service = Arc::new(AdminService::new(admin_store.clone(), token_service.clone()));
        let gateway = Arc::new(AuthGateway::new(token_service, admin_store));
        admin_service.ensure_default_admin().await.unwrap();

        (admin_service.clone(), AdminAuthApi::new(admin_service, gateway, false))
    }

    fn bearer(token: &str) -> BearerAuth {
        BearerAuth(Bearer {
            token: token.to_string(),
        })
    }

    async fn super_admin_token(api: &AdminAuthApi) -> String {
        api.login(Json(AdminLoginRequest {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }))
        .await
        .unwrap()
        .0
        .data
        .token
    }

    #[tokio::test]
    async fn default_seed_logs_in_as_super_admin() {
        let (_, api) = setup().await;
        let response = api
            .login(Json(AdminLoginRequest {
                username: "admin".to_string(),
                password: "admin123".to_string(),
            }))
            .await
            .unwrap();

        assert!(response.0.success);
        assert_eq!(response.0.data.admin.role, "super_admin");
        assert!(!response.0.data.token.is_empty());
    }

    #[tokio::test]
    async fn create_admin_requires_the_super_admin_role() {
        let (admin_service, api) = setup().await;
        let token = super_admin_token(&api).await;

        // viewer created by the super admin
        api.create_admin(
            bearer(&token),
            Json(CreateAdminRequest {
                username: "viewer1".to_string(),
                password: "Sup3rSecret".to_string(),
                role: "viewer".to_string(),
            }),
        )
        .await
        .unwrap();

        // the viewer's own token is rejected by the role gate
        let (viewer_token, _) = admin_service
            .login(crate::types::dto::admin::AdminLogin {
                username: "viewer1".to_string(),
                password: "Sup3rSecret".to_string(),
            })
            .await
            .unwrap();
        let err = api
            .create_admin(
                bearer(&viewer_token),
                Json(CreateAdminRequest {
                    username: "viewer2".to_string(),
                    password: "Sup3rSecret".to_string(),
                    role: "viewer".to_string(),
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::InsufficientRole(_)));
    }

    #[tokio::test]
    async fn self_role_change_is_a_400_with_the_original_message() {
        let (_, api) = setup().await;
        let token = super_admin_token(&api).await;
        let me = api.me(bearer(&token)).await.unwrap();
        let my_id = me.0.data.admin.admin_id;

        let err = api
            .update_role(
                bearer(&token),
                Path(my_id),
                Json(UpdateRoleRequest {
                    role: "viewer".to_string(),
                }),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AdminError::SelfModification(_)));
        assert_eq!(err.message(), "You cannot change your own role");
    }

    #[tokio::test]
    async fn self_deactivation_is_a_400() {
        let (_, api) = setup().await;
        let token = super_admin_token(&api).await;
        let my_id = api.me(bearer(&token)).await.unwrap().0.data.admin.admin_id;

        let err = api.deactivate(bearer(&token), Path(my_id)).await.unwrap_err();
        assert!(matches!(err, AdminError::SelfModification(_)));
        assert_eq!(err.message(), "You cannot deactivate your own account");
    }

    #[tokio::test]
    async fn unknown_target_admin_is_a_404() {
        let (_, api) = setup().await;
        let token = super_admin_token(&api).await;

        let err = api
            .update_role(
                bearer(&token),
                Path(9999),
                Json(UpdateRoleRequest {
                    role: "viewer".to_string(),
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::AdminNotFound(_)));
    }

    #[tokio::test]
    async fn admin_list_reports_pagination_metadata() {
        let (_, api) = setup().await;
        let token = super_admin_token(&api).await;

        for i in 0..3 {
            api.create_admin(
                bearer(&token),
                Json(CreateAdminRequest {
                    username: format!("clerk{}", i),
                    password: "Sup3rSecret".to_string(),
                    role: "data_entry".to_string(),
                }),
            )
            .await
            .unwrap();
        }

        let response = api
            .list_admins(bearer(&token), Query(Some(1)), Query(Some(2)))
            .await
            .unwrap();
        let data = response.0.data;
        // 3 clerks + the default admin
        assert_eq!(data.pagination.total_admins, 4);
        assert_eq!(data.pagination.total_pages, 2);
        assert!(data.pagination.has_next);
        assert!(!data.pagination.has_prev);
        assert_eq!(data.admins.len(), 2);
    }
}
