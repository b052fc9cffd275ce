use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppResult;

pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// JWT claims payload. `sid` ties the token to a row in `sessions` so that
/// sign-out can revoke it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: Uuid,
    pub sid: Uuid,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

pub fn issue_token(
    config: &Config,
    user_id: Uuid,
    session_id: Uuid,
    role: &str,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> AppResult<AccessToken> {
    let claims = Claims {
        sub: user_id,
        sid: session_id,
        role: role.to_string(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(AccessToken {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: (expires_at - issued_at).num_seconds(),
    })
}

pub fn verify_token(config: &Config, token: &str) -> AppResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use chrono::Duration;

    #[test]
    fn test_issued_token_verifies() {
        let config = Config::for_tests();
        let (user, session) = (Uuid::new_v4(), Uuid::new_v4());
        let now = Utc::now();
        let token = issue_token(&config, user, session, "employer", now, now + Duration::hours(1))
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);

        let claims = verify_token(&config, &token.access_token).unwrap();
        assert_eq!(claims.sub, user);
        assert_eq!(claims.sid, session);
        assert_eq!(claims.role, "employer");
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = Config::for_tests();
        let issued = Utc::now() - Duration::hours(3);
        let token = issue_token(
            &config,
            Uuid::new_v4(),
            Uuid::new_v4(),
            "candidate",
            issued,
            issued + Duration::hours(1),
        )
        .unwrap();

        assert!(matches!(
            verify_token(&config, &token.access_token),
            Err(AppError::Token(_))
        ));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let config = Config::for_tests();
        let mut other = Config::for_tests();
        other.jwt_secret = "another-secret-key-that-is-32-bytes!!".to_string();
        let now = Utc::now();
        let token = issue_token(
            &other,
            Uuid::new_v4(),
            Uuid::new_v4(),
            "candidate",
            now,
            now + Duration::hours(1),
        )
        .unwrap();

        assert!(verify_token(&config, &token.access_token).is_err());
    }
}
