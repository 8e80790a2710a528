use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::infrastructure::logging::LogFormat;
use crate::infrastructure::rate_limit::RateLimitConfig;

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) database_url: String,
    pub(crate) database_max_connections: u32,
    pub(crate) jwt_secret: String,
    pub(crate) http_addr: String,
    pub(crate) grpc_addr: String,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) log_level: String,
    pub(crate) log_format: LogFormat,
    pub(crate) http_request_body_limit_bytes: usize,
    pub(crate) http_concurrency_limit: usize,
    pub(crate) http_request_timeout_secs: u64,
    pub(crate) grpc_concurrency_limit: usize,
    pub(crate) grpc_request_timeout_secs: u64,
    pub(crate) grpc_max_decoding_message_size_bytes: usize,
    pub(crate) grpc_max_encoding_message_size_bytes: usize,
    pub(crate) post_rate_limit: RateLimitConfig,
    pub(crate) redis_url: Option<String>,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env { lookup };

        let database_url = env.required("DATABASE_URL")?;
        let jwt_secret = env.required("JWT_SECRET")?;
        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }

        let http_addr = env.or("HTTP_ADDR", "0.0.0.0:8080");
        let grpc_addr = env.or("GRPC_ADDR", "0.0.0.0:50051");
        let cors_origins =
            parse_cors_origins(&env.or("CORS_ORIGINS", "http://localhost:3000,http://127.0.0.1:3000"));
        let log_level = env
            .get("LOG_LEVEL")
            .or_else(|| env.get("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());
        let log_format = LogFormat::parse(&env.or("LOG_FORMAT", "compact"))?;

        let post_rate_limit = RateLimitConfig {
            max_requests: env.positive("POST_RATE_LIMIT_MAX", 3)?,
            window: Duration::from_secs(env.positive("POST_RATE_LIMIT_WINDOW_SECS", 60)?),
        };
        let redis_url = env.get("REDIS_URL");

        Ok(Self {
            database_url,
            database_max_connections: env.positive("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret,
            http_addr,
            grpc_addr,
            cors_origins,
            log_level,
            log_format,
            http_request_body_limit_bytes: env
                .positive("HTTP_REQUEST_BODY_LIMIT_BYTES", 64 * 1024)?,
            http_concurrency_limit: env.positive("HTTP_CONCURRENCY_LIMIT", 256)?,
            http_request_timeout_secs: env.positive("HTTP_REQUEST_TIMEOUT_SECS", 10)?,
            grpc_concurrency_limit: env.positive("GRPC_CONCURRENCY_LIMIT", 256)?,
            grpc_request_timeout_secs: env.positive("GRPC_REQUEST_TIMEOUT_SECS", 10)?,
            grpc_max_decoding_message_size_bytes: env
                .positive("GRPC_MAX_DECODING_MESSAGE_SIZE_BYTES", 4 * 1024 * 1024)?,
            grpc_max_encoding_message_size_bytes: env
                .positive("GRPC_MAX_ENCODING_MESSAGE_SIZE_BYTES", 4 * 1024 * 1024)?,
            post_rate_limit,
            redis_url,
        })
    }
}

struct Env<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Trimmed value; blank counts as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.get(key)
            .ok_or_else(|| anyhow!("{key} is required and must not be empty"))
    }

    fn positive<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + PartialEq + Default + Copy,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let value = match self.get(key) {
            Some(raw) => raw
                .parse::<T>()
                .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?,
            None => default,
        };

        if value == T::default() {
            return Err(anyhow!("{key} must be > 0"));
        }
        Ok(value)
    }
}

fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::{Settings, parse_cors_origins};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn settings_from(pairs: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let settings = settings_from(&[
            ("DATABASE_URL", "postgres://localhost/chirp"),
            ("JWT_SECRET", SECRET),
        ])
        .expect("settings must load");

        assert_eq!(settings.http_addr, "0.0.0.0:8080");
        assert_eq!(settings.post_rate_limit.max_requests, 3);
        assert_eq!(settings.post_rate_limit.window, Duration::from_secs(60));
        assert!(settings.redis_url.is_none());
    }

    #[test]
    fn database_url_is_required() {
        let err = settings_from(&[("JWT_SECRET", SECRET)]).expect_err("must fail");
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        let err = settings_from(&[("DATABASE_URL", "postgres://x"), ("JWT_SECRET", "short")])
            .expect_err("must fail");
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn zero_rate_limit_is_rejected() {
        let err = settings_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", SECRET),
            ("POST_RATE_LIMIT_MAX", "0"),
        ])
        .expect_err("must fail");
        assert!(err.to_string().contains("POST_RATE_LIMIT_MAX"));
    }

    #[test]
    fn rate_limit_and_redis_can_be_overridden() {
        let settings = settings_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", SECRET),
            ("POST_RATE_LIMIT_MAX", "10"),
            ("POST_RATE_LIMIT_WINDOW_SECS", "5"),
            ("REDIS_URL", "redis://127.0.0.1/"),
        ])
        .expect("settings must load");

        assert_eq!(settings.post_rate_limit.max_requests, 10);
        assert_eq!(settings.post_rate_limit.window, Duration::from_secs(5));
        assert_eq!(settings.redis_url.as_deref(), Some("redis://127.0.0.1/"));
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        assert_eq!(
            parse_cors_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
