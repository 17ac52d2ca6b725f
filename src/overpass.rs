use _model::{Coordinate, RawPoiRecord};
use itertools::Itertools;
use serde::Deserialize;
use tracing::{debug, instrument};
use ureq::Agent;

use crate::{
    config::Config,
    error::{DiscoveryError, Result},
};

const EXCERPT_LEN: usize = 180;

/// Fetches raw POI elements around a point.
pub trait PoiSource: Send + Sync {
    fn query_pois(
        &self,
        center: Coordinate,
        radius_m: u32,
        selectors: &[&str],
    ) -> Result<Vec<RawPoiRecord>>;
}

pub struct OverpassClient {
    agent: Agent,
    url: String,
    timeout_secs: u32,
    element_limit: u32,
}

impl OverpassClient {
    pub fn new(agent: Agent, url: &str, timeout_secs: u32, element_limit: u32) -> Self {
        Self {
            agent,
            url: url.to_string(),
            timeout_secs,
            element_limit,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.agent(),
            &config.overpass_url,
            config.query_timeout_secs,
            config.element_limit,
        )
    }
}

impl PoiSource for OverpassClient {
    #[instrument(skip(self, selectors), fields(selectors = selectors.len()))]
    fn query_pois(
        &self,
        center: Coordinate,
        radius_m: u32,
        selectors: &[&str],
    ) -> Result<Vec<RawPoiRecord>> {
        let payload = build_query(
            center,
            radius_m,
            selectors,
            self.timeout_secs,
            self.element_limit,
        );
        debug!(%payload, "Querying Overpass");

        let response = self
            .agent
            .post(&self.url)
            .set("Content-Type", "text/plain;charset=UTF-8")
            .send_string(&payload);

        let response: OverpassResponse = match response {
            Ok(x) => serde_json::from_str(&x.into_string()?)?,
            Err(ureq::Error::Status(status, x)) => {
                let body = x.into_string().unwrap_or_default();
                return Err(DiscoveryError::QueryFailed {
                    status,
                    excerpt: excerpt(&body),
                });
            }
            Err(ureq::Error::Transport(x)) => return Err(x.into()),
        };

        debug!(elements = response.elements.len(), "Overpass responded");
        Ok(response.elements)
    }
}

#[derive(Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<RawPoiRecord>,
}

/// One union of `selector(around:r,lat,lon);` clauses. `out center` gives
/// ways and relations a usable position.
pub fn build_query(
    center: Coordinate,
    radius_m: u32,
    selectors: &[&str],
    timeout_secs: u32,
    element_limit: u32,
) -> String {
    let clauses = selectors
        .iter()
        .map(|x| format!("{x}(around:{radius_m},{},{});", center.lat, center.lng))
        .join("");
    format!("[out:json][timeout:{timeout_secs}];({clauses});out center {element_limit};")
}

fn excerpt(body: &str) -> String {
    body.chars().take(EXCERPT_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_unions_selectors() {
        let query = build_query(
            Coordinate::new(48.8566, 2.3522),
            1500,
            &[r#"node["amenity"="cafe"]"#, r#"node["shop"="bakery"]"#],
            25,
            80,
        );
        assert_eq!(
            query,
            r#"[out:json][timeout:25];(node["amenity"="cafe"](around:1500,48.8566,2.3522);node["shop"="bakery"](around:1500,48.8566,2.3522););out center 80;"#
        );
    }

    #[test]
    fn excerpt_is_char_bounded() {
        let body = "é".repeat(500);
        let x = excerpt(&body);
        assert_eq!(x.chars().count(), EXCERPT_LEN);
        assert_eq!(excerpt("short"), "short");
    }

    #[test]
    fn missing_elements_is_empty() {
        let response: OverpassResponse =
            serde_json::from_str(r#"{"version":0.6,"remark":"runtime error"}"#).unwrap();
        assert!(response.elements.is_empty());
    }
}
