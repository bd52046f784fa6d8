use std::str::FromStr;

use serde::{Deserialize, Serialize};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DB_PATH: &str = "summaries.db";
const DEFAULT_MAP_CONCURRENCY: usize = 4;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub db_path: String,
    /// Section summaries requested at once during the map phase
    pub map_concurrency: usize,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: DEFAULT_DB_PATH.to_string(),
            map_concurrency: DEFAULT_MAP_CONCURRENCY,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let lookup = |name: &str| std::env::var(name).ok();
        Self::from_lookup(lookup)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            port: parse_or("CLAUSEWISE_PORT", lookup("CLAUSEWISE_PORT"), defaults.port),
            db_path: lookup("CLAUSEWISE_DB")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.db_path),
            map_concurrency: parse_or(
                "CLAUSEWISE_MAP_CONCURRENCY",
                lookup("CLAUSEWISE_MAP_CONCURRENCY"),
                defaults.map_concurrency,
            )
            .max(1),
            max_upload_bytes: parse_or(
                "CLAUSEWISE_MAX_UPLOAD_BYTES",
                lookup("CLAUSEWISE_MAX_UPLOAD_BYTES"),
                defaults.max_upload_bytes,
            ),
        }
    }
}

fn parse_or<T: FromStr + Copy>(name: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };

    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(var = name, value = %raw, "Ignoring unparseable setting");
        default
    })
}
