//! # Service Configuration
//!
//! Built from environment variables at startup. Invalid values are
//! configuration errors; absent values fall back to defaults.

use std::net::IpAddr;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-line friendly output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Runtime configuration for the API service.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Address to bind the HTTP server to.
    pub host: IpAddr,
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Log output format.
    pub log_format: LogFormat,
    /// Seed for the shared random generator. `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
    /// Mount the agent pipeline and remediation bot routes.
    pub enable_agentic: bool,
    /// Mount the marketplace and blockchain verification routes.
    pub enable_blockchain: bool,
    /// Guardrail checks slower than this report `within_latency_target: false`.
    pub guardrail_latency_target_ms: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            log_format: LogFormat::Pretty,
            rng_seed: None,
            enable_agentic: true,
            enable_blockchain: true,
            guardrail_latency_target_ms: 200.0,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8000)
    /// - `SARO_HOST` (default: `0.0.0.0`)
    /// - `SARO_LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
    /// - `SARO_RNG_SEED`: u64 for reproducible output (default: unset)
    /// - `SARO_ENABLE_AGENTIC` (default: true)
    /// - `SARO_ENABLE_BLOCKCHAIN` (default: true)
    /// - `SARO_GUARDRAIL_LATENCY_TARGET_MS` (default: 200)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let parse = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match parse("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::invalid("PORT", &v))?,
            None => defaults.port,
        };
        let host = match parse("SARO_HOST") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::invalid("SARO_HOST", &v))?,
            None => defaults.host,
        };
        let log_format = match parse("SARO_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(ConfigError::invalid("SARO_LOG_FORMAT", other)),
        };
        let rng_seed = match parse("SARO_RNG_SEED") {
            Some(v) => Some(
                v.trim()
                    .parse()
                    .map_err(|_| ConfigError::invalid("SARO_RNG_SEED", &v))?,
            ),
            None => None,
        };
        let enable_agentic = match parse("SARO_ENABLE_AGENTIC") {
            Some(v) => parse_bool("SARO_ENABLE_AGENTIC", &v)?,
            None => defaults.enable_agentic,
        };
        let enable_blockchain = match parse("SARO_ENABLE_BLOCKCHAIN") {
            Some(v) => parse_bool("SARO_ENABLE_BLOCKCHAIN", &v)?,
            None => defaults.enable_blockchain,
        };
        let guardrail_latency_target_ms = match parse("SARO_GUARDRAIL_LATENCY_TARGET_MS") {
            Some(v) => {
                let ms: f64 = v
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::invalid("SARO_GUARDRAIL_LATENCY_TARGET_MS", &v))?;
                if !ms.is_finite() || ms <= 0.0 {
                    return Err(ConfigError::invalid("SARO_GUARDRAIL_LATENCY_TARGET_MS", &v));
                }
                ms
            }
            None => defaults.guardrail_latency_target_ms,
        };

        Ok(Self {
            host,
            port,
            log_format,
            rng_seed,
            enable_agentic,
            enable_blockchain,
            guardrail_latency_target_ms,
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::new(self.host, self.port)
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(key, raw)),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn reads_every_variable() {
        let cfg = load(&[
            ("PORT", "9100"),
            ("SARO_HOST", "127.0.0.1"),
            ("SARO_LOG_FORMAT", "json"),
            ("SARO_RNG_SEED", "42"),
            ("SARO_ENABLE_AGENTIC", "false"),
            ("SARO_ENABLE_BLOCKCHAIN", "0"),
            ("SARO_GUARDRAIL_LATENCY_TARGET_MS", "50"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 9100);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.rng_seed, Some(42));
        assert!(!cfg.enable_agentic);
        assert!(!cfg.enable_blockchain);
        assert_eq!(cfg.guardrail_latency_target_ms, 50.0);
        assert_eq!(cfg.bind_addr().to_string(), "127.0.0.1:9100");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
        assert!(load(&[("SARO_LOG_FORMAT", "xml")]).is_err());
        assert!(load(&[("SARO_ENABLE_AGENTIC", "maybe")]).is_err());
        assert!(load(&[("SARO_GUARDRAIL_LATENCY_TARGET_MS", "-1")]).is_err());
    }

    #[test]
    fn blank_values_use_defaults() {
        let cfg = load(&[("PORT", "  ")]).unwrap();
        assert_eq!(cfg.port, 8000);
    }
}
