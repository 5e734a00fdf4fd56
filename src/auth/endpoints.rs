use rocket::data::Data;
use rocket::http::{ContentType, Status};
use rocket::response::status;
use rocket::serde::json::{self, Json};
use rocket::{post, State};
use rocket_multipart_form_data::{
    mime, MultipartFormData, MultipartFormDataField, MultipartFormDataOptions,
};

use super::data::*;
use super::helpers::*;
use super::token::TokenKeys;
use crate::api_error::{ApiError, ApiResult};
use crate::config::AppConfig;
use crate::data::DBConnection;
use crate::uploads::store_photo;

type Created = status::Custom<Json<MessageResponse>>;

fn created(user_id: UserID, username: &str) -> Created {
    tracing::info!(user_id, username, "registered user");

    status::Custom(
        Status::Created,
        Json(MessageResponse {
            message: "User created successfully".to_string(),
        }),
    )
}

fn take_text(form: &mut MultipartFormData, name: &str) -> ApiResult<String> {
    form.texts
        .remove(name)
        .and_then(|fields| fields.into_iter().next())
        .map(|field| field.text)
        .ok_or_else(|| ApiError::Validation(format!("{} is required", name)))
}

#[post("/register", format = "multipart/form-data", data = "<data>")]
pub async fn register(
    content_type: &ContentType,
    data: Data<'_>,
    db_connection: &State<DBConnection>,
    config: &State<AppConfig>,
) -> ApiResult<Created> {
    let options = MultipartFormDataOptions::with_multipart_form_data_fields(vec![
        MultipartFormDataField::text("username"),
        MultipartFormDataField::text("password"),
        MultipartFormDataField::file("photo")
            .content_type(Some(mime::IMAGE_STAR))
            .size_limit(config.max_photo_kib * 1024),
    ]);

    let mut form = MultipartFormData::parse(content_type, data, options).await?;
    let username = take_text(&mut form, "username")?;
    let password = take_text(&mut form, "password")?;

    let photo_url = match form.files.get("photo").and_then(|files| files.first()) {
        Some(photo) => {
            Some(store_photo(&config.upload_dir, &photo.path, photo.file_name.as_deref()).await?)
        }
        None => None,
    };

    let registered = {
        let db_connection = db_connection.lock()?;
        register_user(&username, &password, photo_url.as_deref(), &db_connection)
    };

    match registered {
        Ok(user_id) => Ok(created(user_id, username.trim())),
        Err(e) => {
            if let Some(url) = &photo_url {
                let stored = config.upload_dir.join(url.trim_start_matches("/uploads/"));
                let _ = rocket::tokio::fs::remove_file(stored).await;
            }
            Err(e)
        }
    }
}

#[post("/register", format = "json", data = "<register_request>", rank = 2)]
pub fn register_json(
    register_request: Result<Json<RegisterRequest>, json::Error<'_>>,
    db_connection: &State<DBConnection>,
) -> ApiResult<Created> {
    let register_request = register_request?;
    let db_connection = db_connection.lock()?;

    let user_id = register_user(
        &register_request.username,
        &register_request.password,
        None,
        &db_connection,
    )?;

    Ok(created(user_id, register_request.username.trim()))
}

#[post("/login", format = "json", data = "<login_request>")]
pub fn login(
    login_request: Result<Json<LoginRequest>, json::Error<'_>>,
    db_connection: &State<DBConnection>,
    token_keys: &State<TokenKeys>,
) -> ApiResult<Json<LoginResponse>> {
    let login_request = login_request?;
    let db_connection = db_connection.lock()?;

    match login_user(
        &login_request.username,
        &login_request.password,
        token_keys,
        &db_connection,
    ) {
        Ok(response) => {
            tracing::info!(username = %response.user.username, "login succeeded");
            Ok(Json(response))
        }
        Err(e) => {
            tracing::info!(username = %login_request.username, "login failed");
            Err(e)
        }
    }
}
