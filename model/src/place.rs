use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{osm::osm_link, Coordinate};

/// A normalized point of interest, valid for a single search run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub address: String,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    pub distance_km: f64,
    pub rating: f64,
    pub tags: BTreeMap<String, String>,
}

impl Place {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    pub fn osm_link(&self) -> Option<String> {
        let (element_type, id) = self.id.split_once(':')?;
        Some(osm_link(element_type, id.parse().ok()?))
    }
}
