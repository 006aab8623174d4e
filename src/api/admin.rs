use chrono::{Datelike, Utc};
use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::helpers::{limit_param, page_param, page_window};
use crate::api::BearerAuth;
use crate::errors::{AdminError, InternalError};
use crate::services::{AuthGateway, FormService};
use crate::stores::UserStore;
use crate::types::dto::admin::{
    AdminFormData, AdminFormDetailData, AdminFormDetailResponse, AdminFormListData,
    AdminFormListResponse, AdminFormQuery, AdminUserData, DashboardStatisticsResponse,
    MonthlyReportData, MonthlyReportResponse, UpdateStatusRequest, UserDetailData,
    UserDetailResponse, UserListData, UserListResponse, UsersPagination,
};
use crate::types::dto::common::Acknowledgement;
use crate::types::dto::forms::{FormData, FormsPagination};

/// Admin resource endpoints: dashboard, citizens, and submitted forms
///
/// Every endpoint re-checks the admin row through the gateway; none of them
/// are role-gated beyond that, matching the portal's admin console.
pub struct AdminApi {
    form_service: Arc<FormService>,
    user_store: Arc<UserStore>,
    gateway: Arc<AuthGateway>,
    debug: bool,
}

impl AdminApi {
    pub fn new(
        form_service: Arc<FormService>,
        user_store: Arc<UserStore>,
        gateway: Arc<AuthGateway>,
        debug: bool,
    ) -> Self {
        Self {
            form_service,
            user_store,
            gateway,
            debug,
        }
    }

    fn shape(&self, err: InternalError) -> AdminError {
        AdminError::from_internal(err, self.debug)
    }

    async fn require_admin(&self, auth: &BearerAuth) -> Result<(), AdminError> {
        self.gateway
            .authenticate_admin(&auth.0.token)
            .await
            .map(|_| ())
            .map_err(|e| self.shape(e))
    }
}

#[derive(Tags)]
enum AdminTags {
    /// Admin dashboard and citizen management
    AdminPanel,
}

#[OpenApi(prefix_path = "/api/admin")]
impl AdminApi {
    /// Dashboard headline statistics
    #[oai(path = "/dashboard/statistics", method = "get", tag = "AdminTags::AdminPanel")]
    async fn dashboard(&self, auth: BearerAuth) -> Result<Json<DashboardStatisticsResponse>, AdminError> {
        self.require_admin(&auth).await?;

        let data = self
            .form_service
            .dashboard_statistics()
            .await
            .map_err(|e| self.shape(e))?;

        Ok(Json(DashboardStatisticsResponse { success: true, data }))
    }

    /// Registered citizens, newest first
    #[oai(path = "/users", method = "get", tag = "AdminTags::AdminPanel")]
    async fn list_users(
        &self,
        auth: BearerAuth,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<UserListResponse>, AdminError> {
        self.require_admin(&auth).await?;

        let page = page_param(page.0);
        let per_page = limit_param(limit.0, 10);
        let (users, total) = self
            .user_store
            .list(page, per_page)
            .await
            .map_err(|e| self.shape(e))?;
        let (total_pages, has_next, has_prev) = page_window(total, page, per_page);

        Ok(Json(UserListResponse {
            success: true,
            data: UserListData {
                users: users.iter().map(AdminUserData::from).collect(),
                pagination: UsersPagination {
                    current_page: page,
                    total_pages,
                    total_users: total,
                    has_next,
                    has_prev,
                },
            },
        }))
    }

    /// One citizen plus every form they submitted
    #[oai(path = "/users/:user_id", method = "get", tag = "AdminTags::AdminPanel")]
    async fn user_detail(
        &self,
        auth: BearerAuth,
        user_id: Path<i32>,
    ) -> Result<Json<UserDetailResponse>, AdminError> {
        self.require_admin(&auth).await?;

        let user = self
            .user_store
            .find_by_id(user_id.0)
            .await
            .map_err(|e| self.shape(e))?
            .ok_or_else(AdminError::user_not_found)?;
        let forms = self
            .form_service
            .all_for_user(user.id)
            .await
            .map_err(|e| self.shape(e))?;

        Ok(Json(UserDetailResponse {
            success: true,
            data: UserDetailData {
                user: AdminUserData::from(&user),
                health_forms: forms.iter().map(FormData::from).collect(),
            },
        }))
    }

    /// Deactivate a citizen account
    #[oai(path = "/users/:user_id/deactivate", method = "put", tag = "AdminTags::AdminPanel")]
    async fn deactivate_user(
        &self,
        auth: BearerAuth,
        user_id: Path<i32>,
    ) -> Result<Json<Acknowledgement>, AdminError> {
        self.require_admin(&auth).await?;

        let hit = self
            .user_store
            .deactivate(user_id.0)
            .await
            .map_err(|e| self.shape(e))?;
        if !hit {
            return Err(AdminError::user_not_found());
        }

        Ok(Json(Acknowledgement::new("User deactivated successfully")))
    }

    /// All submitted forms, filterable and paginated
    #[oai(path = "/health-forms", method = "get", tag = "AdminTags::AdminPanel")]
    #[allow(clippy::too_many_arguments)]
    async fn list_forms(
        &self,
        auth: BearerAuth,
        #[oai(name = "medicalSystem")] medical_system: Query<Option<String>>,
        status: Query<Option<String>>,
        month: Query<Option<String>>,
        year: Query<Option<String>>,
        #[oai(name = "fromDate")] from_date: Query<Option<String>>,
        #[oai(name = "toDate")] to_date: Query<Option<String>>,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<AdminFormListResponse>, AdminError> {
        self.require_admin(&auth).await?;

        let (filter, applied) = AdminFormQuery {
            medical_system: medical_system.0,
            status: status.0,
            month: month.0,
            year: year.0,
            from_date: from_date.0,
            to_date: to_date.0,
        }
        .resolve()
        .map_err(AdminError::validation_failed)?;

        let page = page_param(page.0);
        let per_page = limit_param(limit.0, 50);
        let (rows, total) = self
            .form_service
            .admin_list(&filter, page, per_page)
            .await
            .map_err(|e| self.shape(e))?;
        let (total_pages, has_next, has_prev) = page_window(total, page, per_page);

        Ok(Json(AdminFormListResponse {
            success: true,
            data: AdminFormListData {
                forms: rows
                    .iter()
                    .map(|(form, user)| AdminFormData::from((form, user.as_ref())))
                    .collect(),
                pagination: FormsPagination {
                    current_page: page,
                    total_pages,
                    total_forms: total,
                    has_next,
                    has_prev,
                },
                filters_applied: applied,
            },
        }))
    }

    /// One form by primary key, joined with its submitter
    #[oai(path = "/health-forms/:form_id", method = "get", tag = "AdminTags::AdminPanel")]
    async fn form_detail(
        &self,
        auth: BearerAuth,
        form_id: Path<i32>,
    ) -> Result<Json<AdminFormDetailResponse>, AdminError> {
        self.require_admin(&auth).await?;

        let (form, user) = self
            .form_service
            .admin_get(form_id.0)
            .await
            .map_err(|e| self.shape(e))?;

        Ok(Json(AdminFormDetailResponse {
            success: true,
            data: AdminFormDetailData {
                form: AdminFormData::from((&form, user.as_ref())),
            },
        }))
    }

    /// Update a form's review status
    #[oai(path = "/health-forms/:form_id/status", method = "put", tag = "AdminTags::AdminPanel")]
    async fn update_status(
        &self,
        auth: BearerAuth,
        form_id: Path<i32>,
        body: Json<UpdateStatusRequest>,
    ) -> Result<Json<Acknowledgement>, AdminError> {
        self.require_admin(&auth).await?;
        let update = body.0.validate().map_err(AdminError::validation_failed)?;

        self.form_service
            .update_status(form_id.0, update)
            .await
            .map_err(|e| self.shape(e))?;

        Ok(Json(Acknowledgement::new("Form status updated successfully")))
    }

    /// Delete a form
    #[oai(path = "/health-forms/:form_id", method = "delete", tag = "AdminTags::AdminPanel")]
    async fn delete_form(
        &self,
        auth: BearerAuth,
        form_id: Path<i32>,
    ) -> Result<Json<Acknowledgement>, AdminError> {
        self.require_admin(&auth).await?;

        self.form_service
            .delete(form_id.0)
            .await
            .map_err(|e| self.shape(e))?;

        Ok(Json(Acknowledgement::new(
            "Health assessment form deleted successfully",
        )))
    }

    /// Monthly submission counts for the reporting charts
    #[oai(path = "/reports/monthly-data", method = "get", tag = "AdminTags::AdminPanel")]
    async fn monthly_report(
        &self,
        auth: BearerAuth,
        year: Query<Option<i32>>,
    ) -> Result<Json<MonthlyReportResponse>, AdminError> {
        self.require_admin(&auth).await?;

        let year = year.0.unwrap_or_else(|| Utc::now().year());
        let monthly_data = self
            .form_service
            .monthly_report(year)
            .await
            .map_err(|e| self.shape(e))?;

        Ok(Json(MonthlyReportResponse {
            success: true,
            data: MonthlyReportData { year, monthly_data },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{AdminService, AuthService, TokenService};
    use crate::stores::{AdminStore, FormStore};
    use crate::types::dto::admin::AdminLogin;
    use crate::types::dto::auth::NewRegistration;
    use crate::types::dto::forms::NewFormSubmission;
    use crate::types::internal::{Gender, MedicalSystem};
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::Bearer;
    use sea_orm::Database;

    struct Fixture {
        api: AdminApi,
        auth_service: Arc<AuthService>,
        form_service: Arc<FormService>,
        admin_token: String,
        citizen_token: String,
    }

    async fn setup() -> Fixture {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None).await.expect("Failed to run migrations");

        let user_store = Arc::new(UserStore::new(db.clone()));
        let admin_store = Arc::new(AdminStore::new(db.clone()));
        let form_store = Arc::new(FormStore::new(db));
        let token_service = Arc::new(TokenService::new(
            "test-secret-key-minimum-32-characters-long".to_string(),
            168,
        ));
        let gateway = Arc::new(AuthGateway::new(token_service.clone(), admin_store.clone()));
        let auth_service = Arc::new(AuthService::new(user_store.clone(), token_service.clone()));
        let admin_service = Arc::new(AdminService::new(admin_store, token_service));
        let form_service = Arc::new(FormService::new(form_store, user_store.clone()));

        admin_service.ensure_default_admin().await.unwrap();
        let (admin_token, _) = admin_service
            .login(AdminLogin {
                username: "admin".to_string(),
                password: "admin123".to_string(),
            })
            .await
            .unwrap();

        let (citizen_token, _) = auth_service
            .register(NewRegistration {
                first_name: "Test".to_string(),
                last_name: "Citizen".to_string(),
                email: "citizen@example.com".to_string(),
                phone: "9876543210".to_string(),
                password: "Str0ngPass".to_string(),
                agree_to_terms: true,
                subscribe_newsletter: true,
            })
            .await
            .unwrap();

        Fixture {
            api: AdminApi::new(form_service.clone(), user_store, gateway, false),
            auth_service,
            form_service,
            admin_token,
            citizen_token,
        }
    }

    fn bearer(token: &str) -> BearerAuth {
        BearerAuth(Bearer {
            token: token.to_string(),
        })
    }

    fn submission() -> NewFormSubmission {
        NewFormSubmission {
            full_name: "Test Citizen".to_string(),
            father_mother_name: "Parent Citizen".to_string(),
            age: 40,
            gender: Gender::Male,
            contact: "9876543210".to_string(),
            complete_address: "12 Shastri Nagar, Raipur".to_string(),
            medical_system: MedicalSystem::Ayurvedic,
            primary_issue: "Recurring migraines".to_string(),
            symptoms: None,
        }
    }

    #[tokio::test]
    async fn citizen_tokens_are_forbidden_on_admin_routes() {
        let fixture = setup().await;
        let err = fixture
            .api
            .dashboard(bearer(&fixture.citizen_token))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::AdminRequired(_)));
    }

    #[tokio::test]
    async fn dashboard_counts_users_and_forms() {
        let fixture = setup().await;
        fixture
            .form_service
            .submit(1, submission())
            .await
            .unwrap();

        let response = fixture
            .api
            .dashboard(bearer(&fixture.admin_token))
            .await
            .unwrap();
        assert_eq!(response.0.data.total_users, 1);
        assert_eq!(response.0.data.total_health_forms, 1);
        assert_eq!(response.0.data.recent_submissions, 1);
        assert_eq!(response.0.data.active_users, 1);
    }

    #[tokio::test]
    async fn list_forms_applies_the_medical_system_filter() {
        let fixture = setup().await;
        fixture.form_service.submit(1, submission()).await.unwrap();
        let mut other = submission();
        other.medical_system = MedicalSystem::Allopathic;
        fixture.form_service.submit(1, other).await.unwrap();

        let response = fixture
            .api
            .list_forms(
                bearer(&fixture.admin_token),
                Query(Some("ayurvedic".to_string())),
                Query(None),
                Query(None),
                Query(None),
                Query(None),
                Query(None),
                Query(None),
                Query(None),
            )
            .await
            .unwrap();

        let data = response.0.data;
        assert_eq!(data.pagination.total_forms, 1);
        assert_eq!(data.forms[0].medical_system, "ayurvedic");
        assert_eq!(data.forms[0].email.as_deref(), Some("citizen@example.com"));
        assert_eq!(data.filters_applied.medical_system.as_deref(), Some("ayurvedic"));
    }

    #[tokio::test]
    async fn bad_filter_values_are_a_validation_failure() {
        let fixture = setup().await;
        let err = fixture
            .api
            .list_forms(
                bearer(&fixture.admin_token),
                Query(Some("crystals".to_string())),
                Query(None),
                Query(Some("13".to_string())),
                Query(None),
                Query(None),
                Query(None),
                Query(None),
                Query(None),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn status_update_then_detail_shows_the_review_fields() {
        let fixture = setup().await;
        let form = fixture.form_service.submit(1, submission()).await.unwrap();

        fixture
            .api
            .update_status(
                bearer(&fixture.admin_token),
                Path(form.id),
                Json(UpdateStatusRequest {
                    status: "reviewed".to_string(),
                    notes: Some("follow up in two weeks".to_string()),
                    assigned_doctor_id: Some(3),
                    consultation_date: None,
                }),
            )
            .await
            .unwrap();

        let detail = fixture
            .api
            .form_detail(bearer(&fixture.admin_token), Path(form.id))
            .await
            .unwrap();
        assert_eq!(detail.0.data.form.status, "reviewed");
        assert_eq!(detail.0.data.form.admin_notes.as_deref(), Some("follow up in two weeks"));
    }

    #[tokio::test]
    async fn delete_and_missing_lookups_are_404() {
        let fixture = setup().await;
        let form = fixture.form_service.submit(1, submission()).await.unwrap();

        fixture
            .api
            .delete_form(bearer(&fixture.admin_token), Path(form.id))
            .await
            .unwrap();

        let err = fixture
            .api
            .form_detail(bearer(&fixture.admin_token), Path(form.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::FormNotFound(_)));

        let err = fixture
            .api
            .user_detail(bearer(&fixture.admin_token), Path(9999))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn deactivated_citizen_cannot_log_in_afterwards() {
        let fixture = setup().await;

        fixture
            .api
            .deactivate_user(bearer(&fixture.admin_token), Path(1))
            .await
            .unwrap();

        let err = fixture
            .auth_service
            .login(crate::types::dto::auth::CitizenLogin {
                email: "citizen@example.com".to_string(),
                password: "Str0ngPass".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InternalError::Credential(crate::errors::internal::CredentialError::AccountInactive)
        ));
    }
}
