//! Session gate middleware
//!
//! Protects routes that require authentication. A two-state gate:
//! requests either carry a verifiable token and proceed with the
//! resolved identity attached, or they are sent to the login page.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, State},
    http::{HeaderMap, Request, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use super::token::{TokenClaims, verify_token};
use crate::AppState;
use crate::error::AppError;
use crate::metrics::TOKEN_VERIFICATIONS_TOTAL;

/// Cookie that carries the signed token
pub const TOKEN_COOKIE: &str = "token";

/// Entry point browsers are sent to when unauthenticated
pub const LOGIN_PAGE: &str = "/login.html";

/// 302 Found redirect, matching classic browser-form semantics.
pub fn redirect_found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(TOKEN_COOKIE).map(|cookie| cookie.value().to_owned())
}

/// Middleware to require a valid session token
///
/// Extracts the token cookie and verifies it. An absent, expired,
/// tampered, or malformed token is handled identically: a redirect to
/// the login page, never an error surfaced to the client. On success
/// the resolved claims are added to request extensions.
///
/// # Usage
/// ```ignore
/// let protected_routes = Router::new()
///     .route("/dashboard", ...)
///     .layer(middleware::from_fn_with_state(state, require_session));
/// ```
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_token_from_headers(request.headers()) else {
        TOKEN_VERIFICATIONS_TOTAL.with_label_values(&["missing"]).inc();
        return redirect_found(LOGIN_PAGE);
    };

    match verify_token(&token, &state.config.auth.token_secret) {
        Ok(claims) => {
            TOKEN_VERIFICATIONS_TOTAL.with_label_values(&["ok"]).inc();
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(_) => {
            TOKEN_VERIFICATIONS_TOTAL.with_label_values(&["rejected"]).inc();
            redirect_found(LOGIN_PAGE)
        }
    }
}

/// Extractor for the current authenticated session
///
/// Use in handlers behind [`require_session`] to get the verified claims.
///
/// # Usage
/// ```ignore
/// async fn handler(
///     SessionUser(claims): SessionUser,
/// ) -> impl IntoResponse {
///     format!("user id: {}", claims.id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionUser(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    /// Extract verified claims from the request
    ///
    /// Falls back to verifying the cookie directly when the route was
    /// not wrapped by the gate middleware.
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<TokenClaims>().cloned() {
            return Ok(SessionUser(claims));
        }

        let state = AppState::from_ref(state);
        let token = extract_token_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        let claims = verify_token(&token, &state.config.auth.token_secret)?;
        parts.extensions.insert(claims.clone());

        Ok(SessionUser(claims))
    }
}
