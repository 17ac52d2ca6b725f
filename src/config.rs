use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::debug;
use ureq::{Agent, AgentBuilder};

use crate::{
    error::{DiscoveryError, Result},
    rank::RESULT_CAP,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub nominatim_url: String,
    pub overpass_url: String,
    /// Nominatim's usage policy requires an identifying user agent.
    pub user_agent: String,
    pub default_query: String,
    pub default_radius_km: f64,
    pub search_zoom: u8,
    pub focus_zoom: u8,
    pub result_cap: usize,
    /// Passed to Overpass in the `out` statement.
    pub element_limit: u32,
    /// Passed to Overpass as `[timeout:N]`.
    pub query_timeout_secs: u32,
    pub debounce_ms: u64,
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            overpass_url: "https://overpass-api.de/api/interpreter".to_string(),
            user_agent: concat!("placefinder/", env!("CARGO_PKG_VERSION")).to_string(),
            default_query: "Paris, Ile-de-France, France".to_string(),
            default_radius_km: 2.0,
            search_zoom: 14,
            focus_zoom: 16,
            result_cap: RESULT_CAP,
            element_limit: 80,
            query_timeout_secs: 25,
            debounce_ms: 350,
            http_timeout_secs: 60,
        }
    }
}

impl Config {
    /// Reads a YAML config file if given, then applies `PLACEFINDER_*`
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading config");
                serde_yaml::from_str(&fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(x) = lookup("PLACEFINDER_NOMINATIM_URL") {
            self.nominatim_url = x;
        }
        if let Some(x) = lookup("PLACEFINDER_OVERPASS_URL") {
            self.overpass_url = x;
        }
        if let Some(x) = lookup("PLACEFINDER_USER_AGENT") {
            self.user_agent = x;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.nominatim_url.is_empty() || self.overpass_url.is_empty() {
            return Err(DiscoveryError::Config("service URLs must not be empty".into()));
        }
        if !(self.default_radius_km > 0.0) {
            return Err(DiscoveryError::Config(format!(
                "default_radius_km must be positive, got {}",
                self.default_radius_km
            )));
        }
        if !(1..=RESULT_CAP).contains(&self.result_cap) {
            return Err(DiscoveryError::Config(format!(
                "result_cap must be between 1 and {RESULT_CAP}, got {}",
                self.result_cap
            )));
        }
        Ok(())
    }

    pub fn agent(&self) -> Agent {
        AgentBuilder::new()
            .user_agent(&self.user_agent)
            .timeout(Duration::from_secs(self.http_timeout_secs))
            .build()
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
