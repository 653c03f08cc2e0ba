use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

// Custom Errors used in handlers
#[derive(Debug, PartialEq)]
pub enum CustomError {
    BadRequest,
    ServerNotFound,
    UserNotFound,
    WrongPassword,
    InternalServerError,
    InvalidToken,
}

//implementation of custom errors that are used in handlers
impl IntoResponse for CustomError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Self::InternalServerError => (StatusCode::INTERNAL_SERVER_ERROR,"Internal Server Error"),
            Self::BadRequest => (StatusCode::BAD_REQUEST, "Bad Request"),
            Self::ServerNotFound => (StatusCode::NOT_FOUND, "Server not configured"),
            Self::UserNotFound => (StatusCode::NOT_FOUND, "User not Found"),
            Self::WrongPassword => (StatusCode::UNAUTHORIZED, "Wrong Password"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "Token is not valid"),
        };
        (status, Json(json!({"error": error_message}))).into_response()
    }
}
