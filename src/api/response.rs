//! Success envelope.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// JSON body of a successful response: `{"success": true, "result": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    pub result: T,
}

/// A 200 response wrapping `T` in the success envelope.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T>(pub T);

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        Json(SuccessEnvelope {
            success: true,
            result: self.0,
        })
        .into_response()
    }
}
