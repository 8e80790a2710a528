use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),

    #[error("token has no subject")]
    MissingSubject,

    #[cfg(test)]
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

/// Session claims minted by the identity provider. `sub` is the user id.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) exp: i64,
}

/// Verifies session tokens signed with the secret shared with the identity provider.
pub(crate) struct JwtService {
    secret: String,
}

impl JwtService {
    pub(crate) fn new(secret: &str) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub(crate) fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 10;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(JwtError::Decode)?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(JwtError::MissingSubject);
        }
        Ok(token_data.claims)
    }

    #[cfg(test)]
    pub(crate) fn issue_token(&self, user_id: &str, ttl_seconds: i64) -> Result<String, JwtError> {
        use jsonwebtoken::{EncodingKey, Header, encode};

        let claims = Claims {
            sub: user_id.to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::seconds(ttl_seconds)).timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(JwtError::Encode)
    }
}
