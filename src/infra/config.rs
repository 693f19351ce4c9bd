use std::{net::SocketAddr, path::PathBuf};

use axum::http::{HeaderValue, header::InvalidHeaderValue};
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use url::Url;

pub const DEFAULT_ALLOWED_ORIGINS: &str = "https://trysavoy.com,http://localhost:3000";

/// Where waitlist rows live.
pub enum StoreConfig {
    /// Direct connection to the Postgres database.
    Postgres {
        database_url: SecretString,
        max_connections: u32,
    },
    /// Supabase REST gateway (PostgREST) in front of the same table.
    Supabase { url: Url, service_key: SecretString },
}

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Origins granted credentialed cross-origin access. Matched exactly.
    pub allowed_origins: Vec<HeaderValue>,
    pub store: StoreConfig,
    pub leaderboard_default_limit: i64,
    /// Upper bound for `?limit=`; larger requests are clamped.
    pub leaderboard_max_limit: i64,
    /// Optional path for structured JSON logs in addition to the console.
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());

        let allowed_origins = parse_origins(&get_env_default(
            "CORS_ALLOWED_ORIGINS",
            DEFAULT_ALLOWED_ORIGINS.to_string(),
        ))
        .expect("CORS_ALLOWED_ORIGINS must be a comma-separated list of valid origins");

        let backend: String = get_env_default("STORE_BACKEND", "postgres".to_string());
        let store = match backend.trim().to_ascii_lowercase().as_str() {
            "postgres" => StoreConfig::Postgres {
                database_url: SecretString::new(get_env::<String>("DATABASE_URL").into()),
                max_connections: get_env_default("DATABASE_MAX_CONNECTIONS", 5),
            },
            "supabase" => StoreConfig::Supabase {
                url: get_env("SUPABASE_URL"),
                service_key: SecretString::new(get_env::<String>("SUPABASE_SERVICE_KEY").into()),
            },
            other => panic!("STORE_BACKEND must be 'postgres' or 'supabase', got '{other}'"),
        };

        let leaderboard_default_limit = require_positive(
            "LEADERBOARD_DEFAULT_LIMIT",
            get_env_default("LEADERBOARD_DEFAULT_LIMIT", 10),
        );
        let leaderboard_max_limit = require_positive(
            "LEADERBOARD_MAX_LIMIT",
            get_env_default("LEADERBOARD_MAX_LIMIT", 100),
        );
        let log_file: Option<PathBuf> = std::env::var("LOG_FILE").ok().map(PathBuf::from);

        Self {
            bind_addr,
            allowed_origins,
            store,
            leaderboard_default_limit,
            leaderboard_max_limit,
            log_file,
        }
    }
}

/// Count settings must be at least 1.
fn require_positive(var: &str, value: i64) -> i64 {
    if value < 1 {
        panic!("{var} must be at least 1, got {value}");
    }
    value
}

/// Splits a comma-separated origin list, skipping blank items.
pub fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(HeaderValue::from_str)
        .collect()
}
