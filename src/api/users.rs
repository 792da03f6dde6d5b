//! `/users/*` handlers.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use super::auth::{Authenticated, Unauthenticated, cleared_session_cookie, session_cookie};
use super::dto::CredentialsRequest;
use super::{ApiErrorResponse, ApiSuccess, AppState, ValidJson};
use crate::domain::{CurrentUser, RecordId};

/// `POST /users/register`: creates an account and returns its id.
///
/// # Errors
///
/// - 403 if a live session is present.
/// - 400 for a bad body or a taken email.
pub async fn register(
    _: Unauthenticated,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CredentialsRequest>,
) -> Result<ApiSuccess<RecordId>, ApiErrorResponse> {
    let id = state
        .users
        .register(&request.email, &request.password)
        .await?;
    Ok(ApiSuccess(id))
}

/// `POST /users/login`: checks credentials, opens a session and sets the
/// `sessionID` cookie.
///
/// # Errors
///
/// - 403 if a live session is present.
/// - 400 for a bad body or wrong credentials.
pub async fn login(
    _: Unauthenticated,
    State(state): State<AppState>,
    jar: CookieJar,
    ValidJson(request): ValidJson<CredentialsRequest>,
) -> Result<Response, ApiErrorResponse> {
    let user = state
        .users
        .authenticate(&request.email, &request.password)
        .await?;
    let token = state.sessions.issue(&user).await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok((jar.add(session_cookie(token)), ApiSuccess(user)).into_response())
}

/// `GET /users/current`: returns the identity behind the session.
pub async fn current(Authenticated { user, .. }: Authenticated) -> ApiSuccess<CurrentUser> {
    ApiSuccess(user)
}

/// `POST /users/logout`: deletes the session and expires the cookie.
///
/// # Errors
///
/// 401 without a live session.
pub async fn logout(
    session: Authenticated,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiErrorResponse> {
    state.sessions.revoke(&session.token).await?;

    tracing::info!(user_id = %session.user.id, "User logged out");
    Ok((jar.add(cleared_session_cookie()), ApiSuccess("")).into_response())
}
