use axum::http::HeaderValue;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub cors_origin: HeaderValue,
    pub db_max_connections: u32,
    pub db_idle_timeout: Duration,
    pub db_acquire_timeout: Duration,
    pub wizard_session_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let cors_origin = env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .parse::<HeaderValue>()
            .map_err(|e| format!("CORS_ORIGIN is not a valid header value: {}", e))?;

        // Pool sizing
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", 20)?;
        let db_idle_timeout = Duration::from_secs(parse_or("DB_IDLE_TIMEOUT_SECS", 30)?);
        let db_acquire_timeout = Duration::from_secs(parse_or("DB_ACQUIRE_TIMEOUT_SECS", 2)?);
        let wizard_session_ttl = Duration::from_secs(parse_or("WIZARD_SESSION_TTL_SECS", 1800)?);

        Ok(Self {
            database_url,
            bind_addr,
            cors_origin,
            db_max_connections,
            db_idle_timeout,
            db_acquire_timeout,
            wizard_session_ttl,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("{} is invalid: {}", key, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_when_unset() {
        let value: u32 = parse_or("ROUTEBOARD_TEST_SURELY_UNSET", 7).unwrap();
        assert_eq!(value, 7);
    }
}
