use std::sync::Arc;

use auth::AuthRejection;
use auth::Authenticator;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;

/// Extension type to store authenticated user ID in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that validates bearer tokens and adds the subject to request extensions.
///
/// Every rejection is a 401 with a `WWW-Authenticate: Bearer` challenge. The
/// precise reason is logged, never returned.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let header = match req.headers().get(http::header::AUTHORIZATION) {
        None => None,
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| reject(AuthRejection::InvalidFormat))?,
        ),
    };

    let subject = authenticator.authorize(header).map_err(reject)?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(subject),
    });

    Ok(next.run(req).await)
}

fn reject(rejection: AuthRejection) -> Response {
    match rejection.token_error() {
        Some(reason) => tracing::warn!(reason = %reason, "Bearer token rejected"),
        None => tracing::warn!(reason = %rejection, "Authorization header rejected"),
    }

    ApiError::Unauthorized(rejection.to_string()).into_response()
}
