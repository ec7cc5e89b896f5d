/// Request extractors
///
/// `ApiJson` behaves like `axum::Json` but rejects malformed bodies with the
/// API's `{error, message}` body instead of axum's plain-text response.

use crate::error::ApiError;
use axum::extract::FromRequest;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
