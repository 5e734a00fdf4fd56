use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use super::data::*;
use super::password::{hash_password, verify_against_dummy, verify_password};
use super::token::TokenKeys;
use crate::api_error::{ApiError, ApiResult};

fn get_user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        photo_url: row.get(3)?,
    })
}

pub fn add_user_to_db(
    username: &str,
    password_hash: &str,
    photo_url: Option<&str>,
    db_connection: &Connection,
) -> ApiResult<UserID> {
    let inserted = db_connection.execute(
        "INSERT INTO users (username, password_hash, photo_url) VALUES (?1, ?2, ?3)",
        params![username, password_hash, photo_url],
    );

    match inserted {
        Ok(_) => Ok(db_connection.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(ApiError::DuplicateUsername)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn get_user_by_username_from_db(
    username: &str,
    db_connection: &Connection,
) -> ApiResult<Option<User>> {
    let user = db_connection
        .query_row(
            "SELECT id, username, password_hash, photo_url FROM users WHERE username = (?1)",
            params![username],
            get_user_from_row,
        )
        .optional()?;

    Ok(user)
}

pub fn register_user(
    username: &str,
    password: &str,
    photo_url: Option<&str>,
    db_connection: &Connection,
) -> ApiResult<UserID> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ApiError::Validation("Username is required".to_string()));
    }
    if password.is_empty() {
        return Err(ApiError::Validation("Password is required".to_string()));
    }

    let password_hash = hash_password(password)?;
    add_user_to_db(username, &password_hash, photo_url, db_connection)
}

pub fn login_user(
    username: &str,
    password: &str,
    token_keys: &TokenKeys,
    db_connection: &Connection,
) -> ApiResult<LoginResponse> {
    let user = match get_user_by_username_from_db(username.trim(), db_connection)? {
        Some(user) => user,
        None => {
            verify_against_dummy(password);
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    Ok(LoginResponse {
        token: token_keys.issue(user.id)?,
        user: UserProfile::from(&user),
    })
}
