use crate::auth::jwt::JwtConfig;
use crate::payments::PaymentConfig;

/// Default anonymous generation requests per IP per UTC day.
const DEFAULT_FREE_DAILY_GENERATIONS: i32 = 1;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except
/// `JWT_SECRET`, which must be set.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds. Must cover a full batch of
    /// sequential provider calls.
    pub request_timeout_secs: u64,
    /// Anonymous generation requests allowed per client IP per UTC day.
    pub free_daily_generations: i32,
    pub jwt: JwtConfig,
    pub payment: PaymentConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`   | `300`                   |
    /// | `FREE_DAILY_GENERATIONS` | `1`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let free_daily_generations: i32 = std::env::var("FREE_DAILY_GENERATIONS")
            .unwrap_or_else(|_| DEFAULT_FREE_DAILY_GENERATIONS.to_string())
            .parse()
            .expect("FREE_DAILY_GENERATIONS must be a valid i32");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            free_daily_generations,
            jwt: JwtConfig::from_env(),
            payment: PaymentConfig::from_env(),
        }
    }
}
