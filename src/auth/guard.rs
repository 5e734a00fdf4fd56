use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};

use super::data::UserID;
use super::token::TokenKeys;
use crate::api_error::ApiError;

/// The caller resolved from the `Authorization` header. The header carries the
/// bare token; a `Bearer ` prefix is tolerated.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: UserID,
}

fn token_from_header(value: &str) -> &str {
    let value = value.trim();
    value.strip_prefix("Bearer ").unwrap_or(value).trim()
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ApiError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token_keys = match request.rocket().state::<TokenKeys>() {
            Some(token_keys) => token_keys,
            None => {
                return Outcome::Error((
                    Status::InternalServerError,
                    ApiError::Internal("token keys are not managed".to_string()),
                ))
            }
        };

        let token = match request.headers().get_one("Authorization") {
            Some(value) if !token_from_header(value).is_empty() => token_from_header(value),
            _ => return Outcome::Error((Status::Unauthorized, ApiError::MissingToken)),
        };

        match token_keys.verify(token) {
            Ok(user_id) => Outcome::Success(AuthenticatedUser { user_id }),
            Err(e) => Outcome::Error((Status::Unauthorized, e)),
        }
    }
}
