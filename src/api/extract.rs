//! Strict JSON body extractor.
//!
//! Bodies are decoded straight from bytes so that any failure, including an
//! unknown field or a missing `Content-Type`, becomes a 400 envelope rather
//! than axum's plain-text rejection. Structural validation runs right after
//! decoding.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiErrorResponse;

/// A decoded and validated JSON body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(|rejection| ApiErrorResponse::bad_request(format!("bad request: {rejection}")))?;

        let value = decode::<T>(&bytes)?;
        value.validate()?;

        Ok(Self(value))
    }
}

/// Decodes `bytes` as `T`, mapping failures to a 400 response.
///
/// # Errors
///
/// Returns a Bad Request response naming the decode failure.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiErrorResponse> {
    serde_json::from_slice(bytes)
        .map_err(|error| ApiErrorResponse::bad_request(format!("bad request: {error}")))
}
