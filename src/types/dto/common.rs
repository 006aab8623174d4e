use poem_openapi::Object;

/// Uniform error envelope: `{success: false, message, errors?, error?}`
///
/// `errors` carries per-field validation detail; `error` carries raw detail
/// and is only populated when the server runs in development mode.
#[derive(Object, Debug)]
pub struct ErrorResponse {
    pub success: bool,

    /// Human-readable error message
    pub message: String,

    /// Per-field validation failures, when the request body was rejected
    #[oai(skip_serializing_if_is_none)]
    pub errors: Option<Vec<FieldError>>,

    /// Raw error detail (development mode only)
    #[oai(skip_serializing_if_is_none)]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
            error: None,
        }
    }

    pub fn with_detail(message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
            error: detail,
        }
    }

    pub fn with_fields(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: Some(errors),
            error: None,
        }
    }
}

/// One rejected field from the validation pipeline
#[derive(Object, Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Name of the rejected field, as it appears on the wire
    pub field: String,

    /// Why the field was rejected
    pub message: String,

    /// The rejected value, when it is representable as text
    #[oai(skip_serializing_if_is_none)]
    pub value: Option<String>,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>, value: Option<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            value,
        }
    }
}

/// Generic `{success, message}` acknowledgement
#[derive(Object, Debug)]
pub struct Acknowledgement {
    pub success: bool,
    pub message: String,
}

impl Acknowledgement {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Liveness probe payload
#[derive(Object, Debug)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,

    /// Timestamp of the health check (RFC 3339)
    pub timestamp: String,
    pub environment: String,
}

/// API index served at the root path
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct WelcomeResponse {
    pub success: bool,
    pub message: String,
    pub description: String,
    pub version: String,
    pub endpoints: EndpointIndex,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct EndpointIndex {
    pub health: String,
    pub auth: String,
    pub admin_auth: String,
    pub health_forms: String,
    pub admin: String,
}
