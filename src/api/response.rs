//! Response envelope and error code mapping for the admin API

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::GotolinkError;

/// Uniform response envelope: `code` is `0` exactly when the request
/// succeeded, `message` is human-readable, `data` carries the payload.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

/// API error codes, serialized as numbers.
///
/// Grouped by thousand:
/// - 0: success
/// - 1000-1099: generic errors
/// - 3000-3099: short URL errors
/// - 5000-5099: configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // Generic 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // Short URLs 3000-3099
    UrlNotFound = 3000,
    UidConflict = 3001,
    InvalidPath = 3002,
    AbsolutePath = 3003,
    DatabaseError = 3005,

    // Configuration 5000-5099
    ConfigError = 5000,
}

impl From<&GotolinkError> for ErrorCode {
    fn from(err: &GotolinkError) -> Self {
        match err {
            GotolinkError::NotFound(_) => ErrorCode::UrlNotFound,
            GotolinkError::Conflict(_) => ErrorCode::UidConflict,
            GotolinkError::InvalidPath(_) => ErrorCode::InvalidPath,
            GotolinkError::AbsolutePath(_) => ErrorCode::AbsolutePath,
            GotolinkError::Validation(_) => ErrorCode::BadRequest,
            GotolinkError::DatabaseConfig(_) => ErrorCode::ConfigError,
            GotolinkError::DatabaseConnection(_) | GotolinkError::DatabaseOperation(_) => {
                ErrorCode::DatabaseError
            }
            GotolinkError::CacheInit(_)
            | GotolinkError::FileOperation(_)
            | GotolinkError::Serialization(_)
            | GotolinkError::DateParse(_) => ErrorCode::InternalServerError,
        }
    }
}

/// HTTP status a `GotolinkError` maps to
fn http_status(err: &GotolinkError) -> StatusCode {
    match err {
        GotolinkError::NotFound(_) => StatusCode::NOT_FOUND,
        GotolinkError::Conflict(_) => StatusCode::CONFLICT,
        GotolinkError::AbsolutePath(_)
        | GotolinkError::InvalidPath(_)
        | GotolinkError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build a JSON response in the uniform envelope
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 200 OK with a payload
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// Error response without a payload
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// Error response derived from a `GotolinkError` (status and code mapped
/// automatically)
pub fn error_from_gotolink(err: &GotolinkError) -> HttpResponse {
    error_response(http_status(err), ErrorCode::from(err), err.message())
}

/// Uniform Result -> HttpResponse conversion.
///
/// Success becomes 200 OK with the payload, failure is mapped through
/// `error_from_gotolink`.
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<GotolinkError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: GotolinkError = e.into();
            error_from_gotolink(&err)
        }
    }
}
