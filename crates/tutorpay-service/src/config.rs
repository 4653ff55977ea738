//! Service configuration.

use serde::Deserialize;
use std::path::Path;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to the RocksDB data directory (default: "/data/tutorpay").
    pub data_dir: String,

    /// HS256 secret shared with the identity provider for JWT
    /// validation.
    pub auth_secret: String,

    /// Expected JWT audience (default: "tutorpay").
    pub auth_audience: String,

    /// Settlement gateway base URL (optional).
    pub gateway_url: Option<String>,

    /// Settlement gateway API key (optional).
    pub gateway_api_key: Option<String>,

    /// Deadline for a settlement call, in seconds. A call that exceeds
    /// it is treated as settlement failure.
    pub settlement_timeout_seconds: u64,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Gateway secrets file structure.
#[derive(Debug, Deserialize)]
struct GatewaySecrets {
    url: String,
    api_key: String,
}

/// Fallback auth secret for local development.
const DEV_AUTH_SECRET: &str = "insecure-dev-secret";

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        // Try to load gateway secrets from file first, then fall back to
        // env vars.
        let (gateway_url, gateway_api_key) = load_gateway_secrets();

        let auth_secret = std::env::var("AUTH_SECRET").unwrap_or_else(|_| {
            tracing::warn!("AUTH_SECRET not set, using the insecure development secret");
            DEV_AUTH_SECRET.into()
        });

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/tutorpay".into()),
            auth_secret,
            auth_audience: std::env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "tutorpay".into()),
            gateway_url,
            gateway_api_key,
            settlement_timeout_seconds: std::env::var("SETTLEMENT_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

/// Load settlement gateway secrets from file or environment.
fn load_gateway_secrets() -> (Option<String>, Option<String>) {
    let secret_paths = [
        ".secrets/gateway.json",
        "tutorpay/.secrets/gateway.json",
        "../.secrets/gateway.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<GatewaySecrets>(path) {
            tracing::info!(path = %path, "Loaded gateway secrets from file");
            return (Some(secrets.url), Some(secrets.api_key));
        }
    }

    tracing::debug!("Gateway secrets file not found, using environment variables");
    (
        std::env::var("GATEWAY_URL").ok(),
        std::env::var("GATEWAY_API_KEY").ok(),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/tutorpay".into(),
            auth_secret: DEV_AUTH_SECRET.into(),
            auth_audience: "tutorpay".into(),
            gateway_url: None,
            gateway_api_key: None,
            settlement_timeout_seconds: 30,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
