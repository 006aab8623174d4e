use poem::http::StatusCode;
use poem::{Endpoint, IntoResponse, Request, Response};
use std::sync::Arc;

/// Reshape framework-level rejections into the uniform JSON envelope.
///
/// Handlers and middleware already produce enveloped errors; what is left is
/// what the framework rejects before a handler runs: unmatched routes,
/// missing bearer credentials, and unparseable request payloads. Wrap the
/// route with `EndpointExt::around(shape_rejections)`.
pub async fn shape_rejections<E: Endpoint>(next: Arc<E>, req: Request) -> poem::Result<Response> {
    let path = req.uri().path().to_string();

    match next.call(req).await {
        Ok(resp) => Ok(resp.into_response()),
        Err(err) if err.is::<poem::error::NotFoundError>() => Ok(envelope(
            StatusCode::NOT_FOUND,
            &format!("Route {} not found", path),
        )),
        Err(err) if err.is::<poem_openapi::error::AuthorizationError>() => Ok(envelope(
            StatusCode::UNAUTHORIZED,
            "No token provided, authorization denied",
        )),
        Err(err) if err.is::<poem_openapi::error::ParseRequestPayloadError>() => {
            Ok(envelope(StatusCode::BAD_REQUEST, &err.to_string()))
        }
        Err(err) => Err(err),
    }
}

fn envelope(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({ "success": false, "message": message });
    Response::builder()
        .status(status)
        .content_type("application/json")
        .body(body.to_string())
}
