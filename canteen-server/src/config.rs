//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canteen server configuration
///
/// | Env var | Default | Meaning |
/// |---------|---------|---------|
/// | DATABASE_URL | sqlite:canteen.db | SQLite database |
/// | HTTP_PORT | 3000 | HTTP + WebSocket port |
/// | JWT_SECRET | (dev placeholder) | token signing secret, required outside development |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | PAYMENT_GATEWAY_URL | (unset) | gateway base URL; unset = local simulation |
/// | PAYMENT_TIMEOUT_MS | 10000 | outbound gateway call timeout |
/// | NOTIFICATION_SWEEP_SECS | 300 | expired-notification sweep interval |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub http_port: u16,
    pub jwt_secret: String,
    pub environment: String,
    pub payment_gateway_url: Option<String>,
    pub payment_timeout_ms: u64,
    pub notification_sweep_secs: u64,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development
    /// environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:canteen.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            payment_gateway_url: std::env::var("PAYMENT_GATEWAY_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            payment_timeout_ms: std::env::var("PAYMENT_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10_000),
            notification_sweep_secs: std::env::var("NOTIFICATION_SWEEP_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(300),
            environment,
        })
    }
}
