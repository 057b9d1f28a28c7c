use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::sheet::DEFAULT_PREVIEW_ROWS;

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_file_size: usize,
    /// Cosmetic pause before answering a question. Zero disables it.
    pub simulated_latency: Duration,
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_file_size: default_max_file_size(),
            simulated_latency: Duration::ZERO,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Config {
            bind_addr: parse_var(&lookup, "SHEET_BIND_ADDR")?.unwrap_or(defaults.bind_addr),
            max_file_size: parse_var(&lookup, "SHEET_MAX_FILE_SIZE")?
                .unwrap_or(defaults.max_file_size),
            simulated_latency: parse_var(&lookup, "SHEET_SIMULATED_LATENCY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.simulated_latency),
            preview_rows: parse_var(&lookup, "SHEET_PREVIEW_ROWS")?
                .unwrap_or(defaults.preview_rows),
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        _ => Ok(None),
    }
}

pub fn load_config() -> Result<Config> {
    let config = Config::new()?;
    tracing::info!(
        "Loaded config: bind={}, max_file_size={}, latency={:?}",
        config.bind_addr,
        config.max_file_size,
        config.simulated_latency
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, default_bind_addr());
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.simulated_latency, Duration::ZERO);
        assert_eq!(config.preview_rows, 100);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SHEET_BIND_ADDR", "0.0.0.0:8080"),
            ("SHEET_SIMULATED_LATENCY_MS", "1000"),
            ("SHEET_PREVIEW_ROWS", " 25 "),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.simulated_latency, Duration::from_millis(1000));
        assert_eq!(config.preview_rows, 25);
    }

    #[test]
    fn rejects_garbage() {
        let err = Config::from_lookup(lookup(&[("SHEET_MAX_FILE_SIZE", "lots")])).unwrap_err();
        assert!(err.to_string().contains("SHEET_MAX_FILE_SIZE"));
    }
}
