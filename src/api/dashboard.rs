//! Protected dashboard endpoint

use axum::{
    Router,
    extract::State,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::AppState;
use crate::auth::{self, SessionUser};
use crate::error::AppError;

/// Create dashboard router
///
/// The protected area. Every request passes the session gate before
/// reaching a handler.
pub fn dashboard_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .layer(middleware::from_fn_with_state(
            state,
            auth::require_session,
        ))
}

/// GET /dashboard
///
/// Re-fetches the user record by the token's identifier; the token
/// payload is not trusted for display data.
async fn dashboard(
    State(state): State<AppState>,
    SessionUser(claims): SessionUser,
) -> Result<Response, AppError> {
    let Some(user) = state.db.find_user_by_id(&claims.id).await? else {
        // A verifiable token for a user the store no longer knows.
        // Treated the same as any other unauthenticated request.
        return Ok(auth::redirect_found(auth::LOGIN_PAGE));
    };

    Ok(format!("Welcome, {}!", user.username).into_response())
}
