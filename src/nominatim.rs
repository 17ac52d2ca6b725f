use _model::Coordinate;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use tracing::{debug, instrument};
use ureq::Agent;

use crate::{
    config::Config,
    error::{DiscoveryError, Result},
};

/// Resolves free text to a single coordinate.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, query: &str) -> Result<Coordinate>;
}

pub struct NominatimClient {
    agent: Agent,
    base_url: String,
}

impl NominatimClient {
    pub fn new(agent: Agent, base_url: &str) -> Self {
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.agent(), &config.nominatim_url)
    }
}

impl Geocoder for NominatimClient {
    #[instrument(skip(self))]
    fn geocode(&self, query: &str) -> Result<Coordinate> {
        let response = self
            .agent
            .get(&format!("{}/search", self.base_url))
            .query("q", query)
            .query("format", "json")
            .query("addressdetails", "1")
            .query("limit", "1")
            .set("Accept-Language", "en")
            .call();

        let body = match response {
            Ok(x) => x.into_string()?,
            Err(ureq::Error::Status(status, _)) => {
                return Err(DiscoveryError::GeocodeFailed(status))
            }
            Err(ureq::Error::Transport(x)) => return Err(x.into()),
        };

        parse_search(&body)
    }
}

#[serde_as]
#[derive(Deserialize)]
struct Geocoding {
    #[serde_as(as = "DisplayFromStr")]
    lat: f64,
    #[serde_as(as = "DisplayFromStr")]
    lon: f64,
    #[serde(default)]
    display_name: Option<String>,
}

/// First hit of a `/search?format=json` response. Upstream orders by
/// importance so the first entry is the best match.
pub fn parse_search(body: &str) -> Result<Coordinate> {
    let hits: Vec<Geocoding> = serde_json::from_str(body)?;
    let first = hits.into_iter().next().ok_or(DiscoveryError::NotFound)?;
    debug!(
        display_name = first.display_name.as_deref().unwrap_or_default(),
        lat = first.lat,
        lon = first.lon,
        "Geocoded"
    );
    Ok(Coordinate::new(first.lat, first.lon))
}
