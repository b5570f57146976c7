//! JSON body extractor whose rejections render as `{"error": "..."}` with
//! status 400, like every other API error.

use axum::extract::FromRequest;
use wellmind_common::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
