use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::helpers::{limit_param, page_param, page_window};
use crate::api::BearerAuth;
use crate::errors::internal::CredentialError;
use crate::errors::{FormsError, InternalError};
use crate::services::{AuthGateway, FormService};
use crate::types::dto::forms::{
    FormData, FormDetailData, FormDetailResponse, FormListData, FormListResponse, FormsPagination,
    SubmitFormApiResponse, SubmitFormData, SubmitFormRequest, SubmitFormResponse,
    UserStatisticsResponse,
};
use crate::types::internal::Claims;

/// Citizen-facing health assessment form endpoints
pub struct HealthFormsApi {
    form_service: Arc<FormService>,
    gateway: Arc<AuthGateway>,
    debug: bool,
}

impl HealthFormsApi {
    pub fn new(form_service: Arc<FormService>, gateway: Arc<AuthGateway>, debug: bool) -> Self {
        Self {
            form_service,
            gateway,
            debug,
        }
    }

    fn shape(&self, err: InternalError) -> FormsError {
        FormsError::from_internal(err, self.debug)
    }

    /// Authenticate and resolve the numeric subject id.
    fn subject(&self, auth: &BearerAuth) -> Result<(Claims, i32), FormsError> {
        let claims = self.gateway.authenticate(&auth.0.token).map_err(|e| self.shape(e))?;
        let id = claims.subject_id().ok_or_else(|| {
            self.shape(
                CredentialError::InvalidToken {
                    reason: "non-numeric subject".to_string(),
                }
                .into(),
            )
        })?;
        Ok((claims, id))
    }
}

#[derive(Tags)]
enum FormTags {
    /// Health assessment forms
    HealthForms,
}

#[OpenApi(prefix_path = "/api/health-forms")]
impl HealthFormsApi {
    /// Submit a new health assessment form
    #[oai(path = "/", method = "post", tag = "FormTags::HealthForms")]
    async fn submit(
        &self,
        auth: BearerAuth,
        body: Json<SubmitFormRequest>,
    ) -> Result<SubmitFormApiResponse, FormsError> {
        let (_, user_id) = self.subject(&auth)?;
        let submission = body.0.validate().map_err(FormsError::validation_failed)?;

        let form = self
            .form_service
            .submit(user_id, submission)
            .await
            .map_err(|e| self.shape(e))?;

        Ok(SubmitFormApiResponse::Created(Json(SubmitFormResponse {
            success: true,
            message: "Health assessment form submitted successfully".to_string(),
            data: SubmitFormData {
                form_id: form.form_id,
                submitted_at: form.submitted_at,
            },
        })))
    }

    /// The requesting citizen's forms, newest first
    #[oai(path = "/", method = "get", tag = "FormTags::HealthForms")]
    async fn list(
        &self,
        auth: BearerAuth,
        page: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<FormListResponse>, FormsError> {
        let (_, user_id) = self.subject(&auth)?;

        let page = page_param(page.0);
        let per_page = limit_param(limit.0, 10);
        let (forms, total) = self
            .form_service
            .list_for_user(user_id, page, per_page)
            .await
            .map_err(|e| self.shape(e))?;
        let (total_pages, has_next, has_prev) = page_window(total, page, per_page);

        Ok(Json(FormListResponse {
            success: true,
            data: FormListData {
                forms: forms.iter().map(FormData::from).collect(),
                pagination: FormsPagination {
                    current_page: page,
                    total_pages,
                    total_forms: total,
                    has_next,
                    has_prev,
                },
            },
        }))
    }

    /// The requesting citizen's submission statistics
    #[oai(path = "/statistics/user", method = "get", tag = "FormTags::HealthForms")]
    async fn statistics(&self, auth: BearerAuth) -> Result<Json<UserStatisticsResponse>, FormsError> {
        let (_, user_id) = self.subject(&auth)?;

        let statistics = self
            .form_service
            .user_statistics(user_id)
            .await
            .map_err(|e| self.shape(e))?;

        Ok(Json(UserStatisticsResponse {
            success: true,
            data: statistics,
        }))
    }

    /// One form by its public id; only the submitter may read it
    #[oai(path = "/:form_id", method = "get", tag = "FormTags::HealthForms")]
    async fn get(
        &self,
        auth: BearerAuth,
        form_id: Path<String>,
    ) -> Result<Json<FormDetailResponse>, FormsError> {
        let (_, user_id) = self.subject(&auth)?;

        let form = self
            .form_service
            .get_owned(&form_id.0, user_id)
            .await
            .map_err(|e| self.shape(e))?;

        Ok(Json(FormDetailResponse {
            success: true,
            data: FormDetailData {
                form: FormData::from(&form),
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{AuthService, TokenService};
    use crate::stores::{AdminStore, FormStore, UserStore};
    use crate::types::dto::auth::NewRegistration;
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::Bearer;
    use sea_orm::Database;

    struct Fixture {
        api: HealthFormsApi,
        auth_service: Arc<AuthService>,
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
        let gateway = Arc::new(AuthGateway::new(token_service.clone(), admin_store));
        let auth_service = Arc::new(AuthService::new(user_store.clone(), token_service));
        let form_service = Arc::new(FormService::new(form_store, user_store));

        Fixture {
            api: HealthFormsApi::new(form_service, gateway, false),
            auth_service,
        }
    }

    async fn register(fixture: &Fixture, email: &str) -> String {
        let (token, _) = fixture
            .auth_service
            .register(NewRegistration {
                first_name: "Test".to_string(),
                last_name: "Citizen".to_string(),
                email: email.to_string(),
                phone: "9876543210".to_string(),
                password: "Str0ngPass".to_string(),
                agree_to_terms: true,
                subscribe_newsletter: true,
            })
            .await
            .unwrap();
        token
    }

    fn bearer(token: &str) -> BearerAuth {
        BearerAuth(Bearer {
            token: token.to_string(),
        })
    }

    fn submission_body() -> SubmitFormRequest {
        SubmitFormRequest {
            full_name: "Test Citizen".to_string(),
            father_mother_name: "Parent Citizen".to_string(),
            age: 40,
            gender: "male".to_string(),
            contact: "9876543210".to_string(),
            complete_address: "12 Shastri Nagar, Raipur".to_string(),
            medical_system: "any".to_string(),
            primary_issue: "Recurring migraines".to_string(),
            symptoms: None,
        }
    }

    #[tokio::test]
    async fn submit_then_fetch_round_trips_the_fields() {
        let fixture = setup().await;
        let token = register(&fixture, "citizen@example.com").await;

        let SubmitFormApiResponse::Created(Json(created)) = fixture
            .api
            .submit(bearer(&token), Json(submission_body()))
            .await
            .unwrap();
        assert!(created.success);

        let detail = fixture
            .api
            .get(bearer(&token), Path(created.data.form_id.clone()))
            .await
            .unwrap();
        assert_eq!(detail.0.data.form.form_id, created.data.form_id);
        assert_eq!(detail.0.data.form.full_name, "Test Citizen");
        assert_eq!(detail.0.data.form.status, "submitted");
    }

    #[tokio::test]
    async fn another_citizens_token_is_denied_with_403() {
        let fixture = setup().await;
        let alice = register(&fixture, "alice@example.com").await;
        let bob = register(&fixture, "bob@example.com").await;

        let SubmitFormApiResponse::Created(Json(created)) = fixture
            .api
            .submit(bearer(&alice), Json(submission_body()))
            .await
            .unwrap();

        let err = fixture
            .api
            .get(bearer(&bob), Path(created.data.form_id))
            .await
            .unwrap_err();
        assert!(matches!(err, FormsError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn unknown_form_id_is_a_404() {
        let fixture = setup().await;
        let token = register(&fixture, "citizen@example.com").await;

        let err = fixture
            .api
            .get(bearer(&token), Path("F0000000000000".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, FormsError::FormNotFound(_)));
    }

    #[tokio::test]
    async fn invalid_body_never_reaches_storage() {
        let fixture = setup().await;
        let token = register(&fixture, "citizen@example.com").await;

        let mut body = submission_body();
        body.age = 0;
        body.gender = "robot".to_string();
        let err = fixture
            .api
            .submit(bearer(&token), Json(body))
            .await
            .unwrap_err();
        assert!(matches!(err, FormsError::ValidationFailed(_)));

        let listing = fixture
            .api
            .list(bearer(&token), Query(None), Query(None))
            .await
            .unwrap();
        assert_eq!(listing.0.data.pagination.total_forms, 0);
    }

    #[tokio::test]
    async fn listing_twice_without_writes_is_identical() {
        let fixture = setup().await;
        let token = register(&fixture, "citizen@example.com").await;
        for _ in 0..3 {
            fixture
                .api
                .submit(bearer(&token), Json(submission_body()))
                .await
                .unwrap();
        }

        let first = fixture
            .api
            .list(bearer(&token), Query(Some(1)), Query(Some(10)))
            .await
            .unwrap();
        let second = fixture
            .api
            .list(bearer(&token), Query(Some(1)), Query(Some(10)))
            .await
            .unwrap();

        let ids = |resp: &FormListResponse| {
            resp.data
                .forms
                .iter()
                .map(|f| f.form_id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first.0), ids(&second.0));
        assert_eq!(first.0.data.pagination, second.0.data.pagination);
    }

    #[tokio::test]
    async fn statistics_reflect_submissions() {
        let fixture = setup().await;
        let token = register(&fixture, "citizen@example.com").await;
        for _ in 0..2 {
            fixture
                .api
                .submit(bearer(&token), Json(submission_body()))
                .await
                .unwrap();
        }

        let stats = fixture.api.statistics(bearer(&token)).await.unwrap();
        assert_eq!(stats.0.data.total_forms, 2);
        assert_eq!(stats.0.data.submitted_forms, 2);
        assert_eq!(stats.0.data.recent_forms.len(), 2);
    }
}
