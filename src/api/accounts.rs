//! Account endpoints
//!
//! Signup, login, and logout. Successful signup or login issues a
//! signed token and hands it to the client as the `token` cookie; the
//! server keeps no session record.

use axum::{
    Router,
    async_trait,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    routing::post,
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Deserialize;

use crate::AppState;
use crate::auth;
use crate::data::{EntityId, User};
use crate::error::AppError;
use crate::metrics::{LOGIN_ATTEMPTS_TOTAL, SIGNUP_ATTEMPTS_TOTAL, USERS_REGISTERED};

/// Page authenticated clients are redirected to
const DASHBOARD_PAGE: &str = "/dashboard.html";

/// Create account router
///
/// Routes:
/// - POST /signup - Create account, set token cookie
/// - POST /login - Verify credentials, set token cookie
/// - POST /logout - Clear token cookie
pub fn accounts_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

// =============================================================================
// Request bodies
// =============================================================================

/// Submitted credentials
///
/// Accepted as an HTML form or as JSON; both carry the same two fields.
/// Missing fields deserialize to empty strings and fail validation in
/// the handlers.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[async_trait]
impl<S> FromRequest<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            let axum::Json(credentials) = axum::Json::<Credentials>::from_request(req, state)
                .await
                .map_err(|_| AppError::Validation("All fields are required".to_string()))?;
            Ok(credentials)
        } else {
            let axum::Form(credentials) = axum::Form::<Credentials>::from_request(req, state)
                .await
                .map_err(|_| AppError::Validation("All fields are required".to_string()))?;
            Ok(credentials)
        }
    }
}

// =============================================================================
// Signup
// =============================================================================

/// POST /signup
///
/// # Steps
/// 1. Validate both fields are present
/// 2. Reject usernames that already exist
/// 3. Hash the password and create the user
/// 4. Issue a token, set it as a cookie, redirect to the dashboard
async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    credentials: Credentials,
) -> Result<Response, AppError> {
    if credentials.username.is_empty() || credentials.password.is_empty() {
        SIGNUP_ATTEMPTS_TOTAL.with_label_values(&["invalid"]).inc();
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    if state
        .db
        .find_user_by_username(&credentials.username)
        .await?
        .is_some()
    {
        SIGNUP_ATTEMPTS_TOTAL.with_label_values(&["conflict"]).inc();
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let user = User {
        id: EntityId::new().0,
        username: credentials.username,
        password_hash: auth::hash_password(&credentials.password)?,
        created_at: chrono::Utc::now(),
    };

    // The store enforces uniqueness atomically; a concurrent signup that
    // slipped past the check above still loses here.
    if !state.db.insert_user_if_username_free(&user).await? {
        SIGNUP_ATTEMPTS_TOTAL.with_label_values(&["conflict"]).inc();
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    SIGNUP_ATTEMPTS_TOTAL.with_label_values(&["created"]).inc();
    USERS_REGISTERED.inc();
    tracing::info!(username = %user.username, "User created");

    issue_session(&state, jar, &user.id)
}

// =============================================================================
// Login
// =============================================================================

/// POST /login
///
/// Unknown usernames and wrong passwords produce the identical 401
/// response; the failure does not reveal which field was wrong.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    credentials: Credentials,
) -> Result<Response, AppError> {
    let Some(user) = state
        .db
        .find_user_by_username(&credentials.username)
        .await?
    else {
        LOGIN_ATTEMPTS_TOTAL.with_label_values(&["rejected"]).inc();
        return Err(AppError::Unauthorized);
    };

    if !auth::verify_password(&user.password_hash, &credentials.password) {
        LOGIN_ATTEMPTS_TOTAL.with_label_values(&["rejected"]).inc();
        return Err(AppError::Unauthorized);
    }

    LOGIN_ATTEMPTS_TOTAL.with_label_values(&["accepted"]).inc();
    tracing::debug!(username = %user.username, "Login accepted");

    issue_session(&state, jar, &user.id)
}

// =============================================================================
// Logout
// =============================================================================

/// POST /logout
///
/// Removes the token cookie and redirects to the login page. The token
/// itself stays valid until expiry; stateless tokens cannot be revoked.
async fn logout(jar: CookieJar) -> impl IntoResponse {
    let mut removal = Cookie::from(auth::TOKEN_COOKIE);
    removal.set_path("/");
    let jar = jar.remove(removal);

    (jar, auth::redirect_found(auth::LOGIN_PAGE))
}

// =============================================================================
// Helpers
// =============================================================================

/// Issue a token for the user and attach it as a cookie on a redirect
/// to the dashboard.
fn issue_session(state: &AppState, jar: CookieJar, user_id: &str) -> Result<Response, AppError> {
    let token = auth::issue_token(
        user_id,
        &state.config.auth.token_secret,
        state.config.auth.token_ttl_seconds,
    )?;

    let jar = jar.add(session_cookie(state, token));
    Ok((jar, auth::redirect_found(DASHBOARD_PAGE)).into_response())
}

/// Build the `token` cookie.
///
/// `HttpOnly` and `SameSite=Lax` always; `Secure` when the configured
/// domain is non-local or the protocol is https.
fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(auth::TOKEN_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(state.config.should_use_secure_cookies());
    cookie
}
