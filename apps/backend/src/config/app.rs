use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::services::session_actor::Timings;

/// Runtime configuration read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` keeps sessions in process memory.
    pub redis_url: Option<String>,
    /// `None` uses the catalog compiled into the binary.
    pub catalog_path: Option<PathBuf>,
    pub session_ttl: Duration,
    pub store_timeout: Duration,
    pub timings: Timings,
    /// Comma-separated, validated by the CORS middleware.
    pub cors_allowed_origins: Option<String>,
    /// Fixed RNG seed for reproducible sessions.
    pub rng_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            redis_url: None,
            catalog_path: None,
            session_ttl: Duration::from_secs(86_400),
            store_timeout: Duration::from_millis(2000),
            timings: Timings::default(),
            cors_allowed_origins: None,
            rng_seed: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unset and empty values fall
    /// back to defaults; unparsable values are configuration errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            host: var("BACKEND_HOST").unwrap_or(defaults.host),
            port: parse(&var, "BACKEND_PORT")?.unwrap_or(defaults.port),
            redis_url: var("REDIS_URL"),
            catalog_path: var("CATALOG_PATH").map(PathBuf::from),
            session_ttl: parse(&var, "SESSION_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_ttl),
            store_timeout: parse(&var, "STORE_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.store_timeout),
            timings: Timings {
                bet_close_delay: parse(&var, "BET_CLOSE_DELAY_MS")?
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.timings.bet_close_delay),
                quiz_next_delay: parse(&var, "QUIZ_NEXT_DELAY_MS")?
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.timings.quiz_next_delay),
                idle_timeout: parse(&var, "SESSION_IDLE_TIMEOUT_SECS")?
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timings.idle_timeout),
            },
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS"),
            rng_seed: parse(&var, "GAME_RNG_SEED")?,
        })
    }
}

fn parse<T, F>(var: &F, name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    var(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| AppError::config(format!("{name} must be a valid number ('{raw}'): {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.port, 3001);
        assert_eq!(cfg.session_ttl, Duration::from_secs(86_400));
    }

    #[test]
    fn values_are_parsed() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("BACKEND_PORT", "8080"),
            ("REDIS_URL", "redis://cache:6379"),
            ("BET_CLOSE_DELAY_MS", "0"),
            ("QUIZ_NEXT_DELAY_MS", "250"),
            ("GAME_RNG_SEED", "7"),
            ("CATALOG_PATH", "/srv/catalog.json"),
            ("SESSION_IDLE_TIMEOUT_SECS", "90"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(cfg.timings.bet_close_delay, Duration::ZERO);
        assert_eq!(cfg.timings.quiz_next_delay, Duration::from_millis(250));
        assert_eq!(cfg.rng_seed, Some(7));
        assert_eq!(cfg.timings.idle_timeout, Duration::from_secs(90));
        assert_eq!(cfg.catalog_path, Some(PathBuf::from("/srv/catalog.json")));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[("REDIS_URL", "  "), ("BACKEND_PORT", "")]))
            .unwrap();
        assert!(cfg.redis_url.is_none());
        assert_eq!(cfg.port, 3001);
    }

    #[test]
    fn invalid_number_is_a_config_error() {
        let err = AppConfig::from_lookup(lookup(&[("STORE_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
        assert!(err.to_string().contains("STORE_TIMEOUT_MS"));
    }
}
