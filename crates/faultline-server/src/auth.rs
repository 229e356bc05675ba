//! CORS allowlisting and the optional `X-ROMA-API-KEY` gate, both driven by
//! [`faultline_core::config::ServerAccessConfig`] captured once at startup.

use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use faultline_core::config::ServerAccessConfig;

use crate::SharedState;

pub const API_KEY_HEADER: &str = "x-roma-api-key";

/// Builds the CORS layer from the configured allowlist. An unconfigured
/// server (no origins, no regex) falls back to permissive `Any`, matching
/// local/dev use; operators who care about CORS set one of the two.
pub fn cors_layer(access: &ServerAccessConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if !access.allowed_origins.is_empty() {
        let origins: Vec<HeaderValue> = access
            .allowed_origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();
        return layer.allow_origin(origins);
    }

    if let Some(pattern) = &access.allowed_origin_regex {
        if let Ok(re) = regex::Regex::new(pattern) {
            return layer.allow_origin(AllowOrigin::predicate(move |origin, _| {
                origin.to_str().map(|s| re.is_match(s)).unwrap_or(false)
            }));
        }
        tracing::warn!(pattern, "ROMA_ALLOWED_ORIGIN_REGEX did not compile; falling back to Any");
    }

    layer.allow_origin(Any)
}

/// Rejects requests missing a matching `X-ROMA-API-KEY` header when
/// `ROMA_API_KEY` is configured. A no-op when it isn't.
pub async fn require_api_key(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = &state.config.server.required_api_key else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if provided == Some(expected.as_str()) {
        Ok(next.run(request).await)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}
