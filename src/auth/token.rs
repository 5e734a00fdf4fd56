use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;

use super::data::{Claims, UserID};
use crate::api_error::{ApiError, ApiResult};
use crate::config::AppConfig;

/// Signs and checks session tokens. Tokens carry the user id and an expiry, so
/// no session table is needed to resolve them.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        TokenKeys {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let ttl = Duration::hours(config.token_ttl_hours);

        match &config.token_secret {
            Some(secret) => TokenKeys::new(secret.as_bytes(), ttl),
            None => {
                tracing::warn!(
                    "no token_secret configured, using a random secret; tokens will not survive a restart"
                );
                let mut secret = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut secret);
                TokenKeys::new(&secret, ttl)
            }
        }
    }

    pub fn issue(&self, user_id: UserID) -> ApiResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("token signing failed: {}", e)))
    }

    pub fn verify(&self, token: &str) -> ApiResult<UserID> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;

        data.claims
            .sub
            .parse::<UserID>()
            .map_err(|_| ApiError::InvalidToken)
    }
}
