use chrono::Utc;
use rocket::tokio::fs::{self, File, OpenOptions};
use rocket::tokio::io::{self, AsyncWriteExt};

use std::path::Path;

use crate::api_error::ApiResult;

pub const DEFAULT_PHOTO_NAME: &str = "default-profile.png";
const DEFAULT_PHOTO: &[u8] = include_bytes!("../assets/default-profile.png");

/// Creates the upload directory and seeds it with the default profile photo.
pub fn prepare_upload_dir(upload_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(upload_dir)?;

    let default_photo = upload_dir.join(DEFAULT_PHOTO_NAME);
    if !default_photo.exists() {
        std::fs::write(default_photo, DEFAULT_PHOTO)?;
    }

    Ok(())
}

/// Only short alphanumeric extensions survive; anything else is dropped.
pub fn sanitized_extension(original_name: Option<&str>) -> Option<String> {
    let extension = Path::new(original_name?).extension()?.to_str()?;

    if extension.is_empty()
        || extension.len() > 8
        || !extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }

    Some(extension.to_ascii_lowercase())
}

fn photo_file_name(stamp: i64, extension: Option<&str>) -> String {
    match extension {
        Some(extension) => format!("{}.{}", stamp, extension),
        None => stamp.to_string(),
    }
}

/// Copies an uploaded file into the upload directory under a timestamped name and
/// returns the URL it is served from.
pub async fn store_photo(
    upload_dir: &Path,
    source: &Path,
    original_name: Option<&str>,
) -> ApiResult<String> {
    let extension = sanitized_extension(original_name);
    let mut stamp = Utc::now().timestamp_millis();

    let (file_name, mut destination) = loop {
        let file_name = photo_file_name(stamp, extension.as_deref());
        let opened = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(upload_dir.join(&file_name))
            .await;

        match opened {
            Ok(file) => break (file_name, file),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => stamp += 1,
            Err(e) => return Err(e.into()),
        }
    };

    let mut uploaded = File::open(source).await?;
    let copied = match io::copy(&mut uploaded, &mut destination).await {
        Ok(_) => destination.flush().await,
        Err(e) => Err(e),
    };
    if let Err(e) = copied {
        let _ = fs::remove_file(upload_dir.join(&file_name)).await;
        return Err(e.into());
    }

    tracing::info!(file = %file_name, "stored profile photo");
    Ok(format!("/uploads/{}", file_name))
}
