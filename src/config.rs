use std::env;

use crate::blockchain::{CancelToken, SearchBounds};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

const HOST_KEY: &str = "HOST";
const PORT_KEY: &str = "PORT";
const POW_MAX_ATTEMPTS_KEY: &str = "POW_MAX_ATTEMPTS";

/// Process settings, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Cap on proof candidates per mint. `None` searches until a solution.
    pub pow_max_attempts: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            pow_max_attempts: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup(HOST_KEY)
                .filter(|h| !h.trim().is_empty())
                .unwrap_or(defaults.host),
            port: lookup(PORT_KEY)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
            pow_max_attempts: lookup(POW_MAX_ATTEMPTS_KEY)
                .and_then(|v| v.trim().parse().ok())
                .filter(|n: &u64| *n > 0),
        }
    }

    pub fn search_bounds(&self, cancel: CancelToken) -> SearchBounds {
        let bounds = SearchBounds::unbounded().with_cancel(cancel);
        match self.pow_max_attempts {
            Some(max) => bounds.with_max_attempts(max),
            None => bounds,
        }
    }
}
