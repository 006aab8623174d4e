use chrono::Utc;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::types::dto::common::{EndpointIndex, HealthResponse, WelcomeResponse};

/// Liveness probe and API index, both public
pub struct HealthApi {
    environment: String,
}

impl HealthApi {
    pub fn new(environment: String) -> Self {
        Self { environment }
    }
}

#[derive(Tags)]
enum ApiTags {
    /// Health check endpoints
    Health,
}

#[OpenApi]
impl HealthApi {
    /// Liveness probe
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        Json(HealthResponse {
            success: true,
            message: "Lifestyle Clinic API is running".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            environment: self.environment.clone(),
        })
    }

    /// API index
    #[oai(path = "/", method = "get", tag = "ApiTags::Health")]
    async fn welcome(&self) -> Json<WelcomeResponse> {
        Json(WelcomeResponse {
            success: true,
            message: "Welcome to Lifestyle Clinic API".to_string(),
            description: "Government of Chhattisgarh Health Initiative".to_string(),
            version: "1.0.0".to_string(),
            endpoints: EndpointIndex {
                health: "/health".to_string(),
                auth: "/api/auth".to_string(),
                admin_auth: "/api/admin-auth".to_string(),
                health_forms: "/api/health-forms".to_string(),
                admin: "/api/admin".to_string(),
            },
        })
    }
}
