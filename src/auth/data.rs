use serde::{Deserialize, Serialize};

pub type UserID = i64;

pub const DEFAULT_PHOTO_URL: &str = "/uploads/default-profile.png";

/// A stored credential record. The hash is never serialized.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserID,
    pub username: String,
    pub password_hash: String,
    pub photo_url: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub photo_url: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            username: user.username.clone(),
            photo_url: user
                .photo_url
                .clone()
                .unwrap_or_else(|| DEFAULT_PHOTO_URL.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}
