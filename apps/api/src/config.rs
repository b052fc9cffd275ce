use anyhow::{bail, Context, Result};

/// Shortest HS256 secret accepted at startup.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Upper bound for token lifetimes and invitation TTLs (one year).
pub const MAX_LIFETIME_HOURS: i64 = 24 * 365;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub invitation_ttl_hours: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let jwt_secret = require_env("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            bail!("JWT_SECRET must be at least {MIN_JWT_SECRET_LENGTH} bytes long");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret,
            jwt_expiration_hours: lifetime_hours(
                "JWT_EXPIRATION_HOURS",
                parse_env("JWT_EXPIRATION_HOURS", 24)?,
            )?,
            invitation_ttl_hours: lifetime_hours(
                "INVITATION_TTL_HOURS",
                parse_env("INVITATION_TTL_HOURS", 168)?,
            )?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Lifetimes must be positive and at most `MAX_LIFETIME_HOURS`.
fn lifetime_hours(key: &str, hours: i64) -> Result<i64> {
    if hours <= 0 || hours > MAX_LIFETIME_HOURS {
        bail!("{key} must be between 1 and {MAX_LIFETIME_HOURS} hours, got {hours}");
    }
    Ok(hours)
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/sos_jobs_test".to_string(),
            jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
            jwt_expiration_hours: 24,
            invitation_ttl_hours: 168,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
