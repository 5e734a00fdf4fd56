use serde::Deserialize;

use std::fmt;
use std::path::PathBuf;

/// Application settings, read from the same figment Rocket uses (`Rocket.toml` and
/// `ROCKET_*` environment variables).
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub upload_dir: PathBuf,
    pub token_secret: Option<String>,
    pub token_ttl_hours: i64,
    pub max_photo_kib: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("taskgarden.db"),
            upload_dir: PathBuf::from("uploads"),
            token_secret: None,
            token_ttl_hours: 24,
            max_photo_kib: 2048,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_path", &self.database_path)
            .field("upload_dir", &self.upload_dir)
            .field(
                "token_secret",
                &self.token_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("max_photo_kib", &self.max_photo_kib)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::figment::Figment;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: AppConfig = Figment::new()
            .merge(("upload_dir", "/tmp/photos"))
            .extract()
            .unwrap();

        assert_eq!(config.database_path, PathBuf::from("taskgarden.db"));
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/photos"));
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.max_photo_kib, 2048);
        assert!(config.token_secret.is_none());
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = AppConfig {
            token_secret: Some("hunter2".to_string()),
            ..AppConfig::default()
        };

        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }
}
