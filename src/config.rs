//! Runtime configuration, read from the environment (`.env` supported by the binaries).
use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_ADDR: &str = "0.0.0.0:3146";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub image_base: String,
    pub debounce: Duration,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .context("TMDB_API_KEY not set")?;
        let api_base = env_or("TMDB_API_BASE", DEFAULT_API_BASE);
        let image_base = env_or("TMDB_IMAGE_BASE", DEFAULT_IMAGE_BASE);

        let debounce_ms = match env::var("CINEGRID_DEBOUNCE_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("CINEGRID_DEBOUNCE_MS is not a number: {raw:?}"))?,
            Err(_) => DEFAULT_DEBOUNCE_MS,
        };

        let addr_raw = env_or("CINEGRID_ADDR", DEFAULT_ADDR);
        let addr = addr_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("CINEGRID_ADDR is not a socket address: {addr_raw:?}"))?;

        Ok(Self {
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            image_base,
            debounce: Duration::from_millis(debounce_ms),
            addr,
        })
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            addr: DEFAULT_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 3146))),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
