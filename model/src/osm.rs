use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// Element as returned by the Overpass API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawPoiRecord {
    #[serde(rename = "type")]
    pub element_type: String,
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    // ways and relations only carry a centre when asked for with `out center`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<RawPosition>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    pub lat: f64,
    pub lon: f64,
}

impl RawPoiRecord {
    pub fn node(id: u64, lat: f64, lon: f64, tags: &[(&str, &str)]) -> Self {
        Self {
            element_type: "node".to_string(),
            id,
            lat: Some(lat),
            lon: Some(lon),
            center: None,
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// `"{type}:{id}"`, unique per element across overlapping selectors.
    pub fn identity(&self) -> String {
        format!("{}:{}", self.element_type, self.id)
    }

    /// Zero and missing values are both treated as unusable.
    pub fn coordinate(&self) -> Option<Coordinate> {
        let direct = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };
        let (lat, lon) = direct.or(self.center.map(|x| (x.lat, x.lon)))?;
        if usable(lat) && usable(lon) {
            Some(Coordinate::new(lat, lon))
        } else {
            None
        }
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(|x| x.as_str())
            .filter(|x| !x.is_empty())
    }
}

pub fn osm_link(element_type: &str, id: u64) -> String {
    format!("https://www.openstreetmap.org/{element_type}/{id}")
}

fn usable(x: f64) -> bool {
    x != 0.0 && x.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_includes_type() {
        let node = RawPoiRecord::node(42, 1.0, 2.0, &[]);
        let mut way = node.clone();
        way.element_type = "way".to_string();
        assert_eq!(node.identity(), "node:42");
        assert_ne!(node.identity(), way.identity());
    }

    #[test]
    fn zero_coordinate_is_unusable() {
        assert_eq!(RawPoiRecord::node(1, 0.0, 2.0, &[]).coordinate(), None);
        assert_eq!(RawPoiRecord::node(1, 2.0, 0.0, &[]).coordinate(), None);
        assert_eq!(
            RawPoiRecord::node(1, 2.0, 3.0, &[]).coordinate(),
            Some(Coordinate::new(2.0, 3.0))
        );
    }

    #[test]
    fn deserialize_way_with_center() {
        let raw: RawPoiRecord = serde_json::from_str(
            r#"{"type":"way","id":7,"center":{"lat":48.1,"lon":11.5},"tags":{"name":"Hall"}}"#,
        )
        .unwrap();
        assert_eq!(raw.coordinate(), Some(Coordinate::new(48.1, 11.5)));
        assert_eq!(raw.tag("name"), Some("Hall"));
        assert_eq!(
            osm_link(&raw.element_type, raw.id),
            "https://www.openstreetmap.org/way/7"
        );
    }

    #[test]
    fn missing_tags_default_to_empty() {
        let raw: RawPoiRecord =
            serde_json::from_str(r#"{"type":"node","id":1,"lat":1.5,"lon":2.5}"#).unwrap();
        assert!(raw.tags.is_empty());
        assert_eq!(raw.tag("name"), None);
    }

    #[test]
    fn empty_tag_is_absent() {
        let raw = RawPoiRecord::node(1, 1.0, 1.0, &[("name", "")]);
        assert_eq!(raw.tag("name"), None);
    }
}
