//! Authorization gate.
//!
//! Two extractors read the `sessionID` cookie and resolve it once per
//! request:
//!
//! - [`Authenticated`] requires a live session and hands the identity to
//!   the handler. A token that no longer resolves is expired on the client.
//! - [`Unauthenticated`] requires that no live session exists.
//!
//! Extractors run in argument order, so a rejected gate short-circuits the
//! body extractor and the handler.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use time::{Duration, OffsetDateTime};

use super::{ApiErrorResponse, AppState};
use crate::domain::CurrentUser;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sessionID";

/// Client-side lifetime of the session cookie.
const SESSION_COOKIE_LIFETIME: Duration = Duration::days(365);

fn session_cookie_with(value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .expires(OffsetDateTime::now_utc() + SESSION_COOKIE_LIFETIME)
        .build()
}

/// Cookie carrying a freshly issued session token.
#[must_use]
pub fn session_cookie(token: String) -> Cookie<'static> {
    session_cookie_with(token)
}

/// Empty session cookie that overwrites whatever the client holds.
#[must_use]
pub fn cleared_session_cookie() -> Cookie<'static> {
    session_cookie_with(String::new())
}

fn session_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

// =============================================================================
// Authenticated
// =============================================================================

/// Identity of a request that carries a live session.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: CurrentUser,
    /// The session token, kept for logout.
    pub token: String,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts) else {
            tracing::debug!("Rejected: no session cookie");
            return Err(ApiErrorResponse::unauthorized());
        };

        match state.sessions.resolve(&token).await? {
            Some(user) => Ok(Self { user, token }),
            None => {
                tracing::debug!("Rejected: stale session cookie");
                Err(ApiErrorResponse::unauthorized().clearing_session())
            }
        }
    }
}

// =============================================================================
// Unauthenticated
// =============================================================================

/// Marker for a request that carries no live session.
#[derive(Debug, Clone, Copy)]
pub struct Unauthenticated;

impl FromRequestParts<AppState> for Unauthenticated {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts) else {
            return Ok(Self);
        };

        match state.sessions.resolve(&token).await? {
            Some(user) => {
                tracing::debug!(user_id = %user.id, "Rejected: already authenticated");
                Err(ApiErrorResponse::already_authenticated())
            }
            None => Ok(Self),
        }
    }
}
