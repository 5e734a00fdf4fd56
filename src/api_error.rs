use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::{self, json, Json};
use rocket_multipart_form_data::MultipartFormDataError;
use thiserror::Error;

use std::io;
use std::sync::PoisonError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Access denied")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Task not found")]
    NotFound,

    #[error("Username already taken")]
    DuplicateUsername,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::Validation(_) => Status::BadRequest,
            ApiError::InvalidCredentials | ApiError::MissingToken | ApiError::InvalidToken => {
                Status::Unauthorized
            }
            ApiError::NotFound => Status::NotFound,
            ApiError::DuplicateUsername => Status::Conflict,
            ApiError::Storage(_) | ApiError::Internal(_) => Status::InternalServerError,
        }
    }

    /// Message shown to the client. Server-side failures are reported generically and
    /// logged in full instead.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Storage(_) | ApiError::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();

        if status == Status::InternalServerError {
            tracing::error!(error = %self, path = %request.uri(), "request failed");
        } else {
            tracing::debug!(error = %self, path = %request.uri(), "request rejected");
        }

        (status, Json(json!({ "error": self.public_message() }))).respond_to(request)
    }
}

impl<T> From<PoisonError<T>> for ApiError {
    fn from(e: PoisonError<T>) -> ApiError {
        ApiError::Storage(e.to_string())
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(e: rusqlite::Error) -> ApiError {
        ApiError::Storage(e.to_string())
    }
}

impl From<MultipartFormDataError> for ApiError {
    fn from(e: MultipartFormDataError) -> ApiError {
        ApiError::Validation(e.to_string())
    }
}

impl From<io::Error> for ApiError {
    fn from(e: io::Error) -> ApiError {
        ApiError::Storage(e.to_string())
    }
}

impl<'r> From<json::Error<'r>> for ApiError {
    fn from(e: json::Error<'r>) -> ApiError {
        match e {
            json::Error::Io(e) => ApiError::Validation(format!("Could not read request body: {}", e)),
            json::Error::Parse(_, e) => ApiError::Validation(format!("Invalid request body: {}", e)),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(_: jsonwebtoken::errors::Error) -> ApiError {
        ApiError::InvalidToken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(ApiError::Validation("x".into()).status(), Status::BadRequest);
        assert_eq!(ApiError::InvalidCredentials.status(), Status::Unauthorized);
        assert_eq!(ApiError::MissingToken.status(), Status::Unauthorized);
        assert_eq!(ApiError::InvalidToken.status(), Status::Unauthorized);
        assert_eq!(ApiError::NotFound.status(), Status::NotFound);
        assert_eq!(ApiError::DuplicateUsername.status(), Status::Conflict);
        assert_eq!(
            ApiError::Storage("disk full".into()).status(),
            Status::InternalServerError
        );
    }

    #[test]
    fn malformed_json_bodies_are_validation_errors() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = ApiError::from(json::Error::Parse("{", parse_error));

        assert_eq!(e.status(), Status::BadRequest);
        assert!(e.public_message().starts_with("Invalid request body"));
    }

    #[test]
    fn storage_details_are_not_exposed() {
        let e = ApiError::Storage("no such table: tasks".into());
        assert_eq!(e.public_message(), "Internal server error");

        let e = ApiError::Validation("Description cannot be empty".into());
        assert_eq!(e.public_message(), "Description cannot be empty");
    }
}
