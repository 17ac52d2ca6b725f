//! Turns raw Overpass elements into [`Place`]s.
//!
//! OSM tags have no fixed schema, so every displayed field is resolved through
//! a fallback chain of tag keys.

use _model::{distance, Coordinate, Place, RawPoiRecord};
use itertools::Itertools;

const NAME_KEYS: &[&str] = &[
    "name", "name:en", "brand", "amenity", "tourism", "shop", "leisure",
];
const KIND_KEYS: &[&str] = &[
    "amenity",
    "tourism",
    "shop",
    "leisure",
    "railway",
    "public_transport",
    "historic",
];
const DESCRIPTION_KEYS: &[&str] = &[
    "description",
    "tourism",
    "amenity",
    "shop",
    "leisure",
    "historic",
];
const ADDRESS_KEYS: &[&str] = &[
    "addr:housenumber",
    "addr:street",
    "addr:city",
    "addr:postcode",
    "addr:country",
];

// shown even without a name
const ESSENTIAL_AMENITIES: &[&str] = &["police", "hospital", "clinic", "pharmacy", "fire_station"];
const ESSENTIAL_KEYS: &[&str] = &["railway", "public_transport", "aeroway"];

pub const UNKNOWN_NAME: &str = "Unknown Place";
pub const DEFAULT_KIND: &str = "place";
pub const DEFAULT_DESCRIPTION: &str = "Point of interest";

pub const MIN_RATING: f64 = 3.6;
pub const MAX_RATING: f64 = 4.9;

pub fn normalize(raw: RawPoiRecord, center: Coordinate) -> Option<Place> {
    let position = raw.coordinate()?;
    if raw.tag("name").is_none() && !is_essential(&raw) {
        return None;
    }

    let distance_km = distance(position, center);
    Some(Place {
        id: raw.identity(),
        name: first_tag(&raw, NAME_KEYS).unwrap_or(UNKNOWN_NAME).to_string(),
        kind: first_tag(&raw, KIND_KEYS).unwrap_or(DEFAULT_KIND).to_string(),
        address: address(&raw),
        description: first_tag(&raw, DESCRIPTION_KEYS)
            .unwrap_or(DEFAULT_DESCRIPTION)
            .to_string(),
        lat: position.lat,
        lng: position.lng,
        distance_km,
        rating: rating(&raw, distance_km),
        tags: raw.tags,
    })
}

/// Safety and transport infrastructure is useful even when unnamed.
pub fn is_essential(raw: &RawPoiRecord) -> bool {
    raw.tag("amenity")
        .is_some_and(|x| ESSENTIAL_AMENITIES.contains(&x))
        || has_any(raw, ESSENTIAL_KEYS)
}

fn first_tag<'a>(raw: &'a RawPoiRecord, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|x| raw.tag(x))
}

fn has_any(raw: &RawPoiRecord, keys: &[&str]) -> bool {
    keys.iter().any(|x| raw.tag(x).is_some())
}

fn address(raw: &RawPoiRecord) -> String {
    let joined = ADDRESS_KEYS.iter().filter_map(|x| raw.tag(x)).join(" ");
    if !joined.is_empty() {
        return joined;
    }
    raw.tag("addr:full")
        .or(raw.tag("contact:street"))
        .unwrap_or_default()
        .to_string()
}

/// Synthetic listing score used only to order results for display.
///
/// This is not a measured quality signal and says nothing about real-world
/// reviews: it rewards elements with richer contact metadata and mildly
/// penalises distance from the search centre.
pub fn rating(raw: &RawPoiRecord, distance_km: f64) -> f64 {
    let mut score: f64 = 3.6;
    if has_any(raw, &["website", "contact:website"]) {
        score += 0.3;
    }
    if has_any(raw, &["phone", "contact:phone"]) {
        score += 0.15;
    }
    if has_any(raw, &["opening_hours"]) {
        score += 0.15;
    }
    score -= distance_km * 0.02;

    (score.clamp(MIN_RATING, MAX_RATING) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: Coordinate = Coordinate {
        lat: 48.8566,
        lng: 2.3522,
    };

    #[test]
    fn named_restaurant() {
        let raw = RawPoiRecord::node(
            1,
            48.86,
            2.35,
            &[("amenity", "restaurant"), ("name", "Le Cafe"), ("website", "x")],
        );
        let place = normalize(raw, PARIS).unwrap();
        let d = distance(Coordinate::new(48.86, 2.35), PARIS);

        assert_eq!(place.id, "node:1");
        assert_eq!(place.name, "Le Cafe");
        assert_eq!(place.kind, "restaurant");
        assert_eq!(place.description, "restaurant");
        assert_eq!(place.distance_km, d);
        let expected = ((3.6f64 + 0.3 - d * 0.02).clamp(3.6, 4.9) * 10.0).round() / 10.0;
        assert_eq!(place.rating, expected);
        assert_eq!(place.rating, 3.9);
    }

    #[test]
    fn unnamed_station_is_kept() {
        let raw = RawPoiRecord::node(2, 48.9, 2.4, &[("railway", "station")]);
        let place = normalize(raw, PARIS).unwrap();
        assert_eq!(place.name, UNKNOWN_NAME);
        assert_eq!(place.kind, "station");
        assert_eq!(place.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn unnamed_bakery_is_skipped() {
        let raw = RawPoiRecord::node(3, 48.9, 2.4, &[("shop", "bakery")]);
        assert_eq!(normalize(raw, PARIS), None);
    }

    #[test]
    fn unnamed_pharmacy_is_kept() {
        let raw = RawPoiRecord::node(4, 48.9, 2.4, &[("amenity", "pharmacy")]);
        let place = normalize(raw, PARIS).unwrap();
        // amenity is a name fallback
        assert_eq!(place.name, "pharmacy");
        assert_eq!(place.kind, "pharmacy");
    }

    #[test]
    fn english_name_does_not_pass_gate() {
        let raw = RawPoiRecord::node(5, 48.9, 2.4, &[("name:en", "Bakery"), ("shop", "bakery")]);
        assert_eq!(normalize(raw, PARIS), None);
    }

    #[test]
    fn missing_coordinate_is_skipped() {
        let mut raw = RawPoiRecord::node(6, 48.9, 2.4, &[("name", "Nowhere")]);
        raw.lat = None;
        assert_eq!(normalize(raw, PARIS), None);
    }

    #[test]
    fn name_prefers_brand_over_category() {
        let raw = RawPoiRecord::node(
            7,
            48.9,
            2.4,
            &[("brand", "Acme"), ("amenity", "police")],
        );
        assert_eq!(normalize(raw, PARIS).unwrap().name, "Acme");
    }

    #[test]
    fn kind_and_description_fallbacks() {
        let raw = RawPoiRecord::node(8, 48.9, 2.4, &[("name", "Old Gate"), ("historic", "gate")]);
        let place = normalize(raw, PARIS).unwrap();
        assert_eq!(place.kind, "gate");
        assert_eq!(place.description, "gate");

        let raw = RawPoiRecord::node(9, 48.9, 2.4, &[("name", "Thing"), ("description", "A thing")]);
        let place = normalize(raw, PARIS).unwrap();
        assert_eq!(place.kind, DEFAULT_KIND);
        assert_eq!(place.description, "A thing");
    }

    #[test]
    fn address_joins_fragments() {
        let raw = RawPoiRecord::node(
            10,
            48.9,
            2.4,
            &[
                ("name", "Shop"),
                ("addr:housenumber", "12"),
                ("addr:street", "Rue de Rivoli"),
                ("addr:postcode", "75001"),
                ("addr:country", ""),
            ],
        );
        assert_eq!(normalize(raw, PARIS).unwrap().address, "12 Rue de Rivoli 75001");
    }

    #[test]
    fn address_fallbacks() {
        let raw = RawPoiRecord::node(
            11,
            48.9,
            2.4,
            &[("name", "Shop"), ("addr:full", "1 Main St"), ("contact:street", "Side St")],
        );
        assert_eq!(normalize(raw, PARIS).unwrap().address, "1 Main St");

        let raw = RawPoiRecord::node(12, 48.9, 2.4, &[("name", "Shop"), ("contact:street", "Side St")]);
        assert_eq!(normalize(raw, PARIS).unwrap().address, "Side St");

        let raw = RawPoiRecord::node(13, 48.9, 2.4, &[("name", "Shop")]);
        assert_eq!(normalize(raw, PARIS).unwrap().address, "");
    }

    #[test]
    fn rating_rewards_metadata() {
        let bare = RawPoiRecord::node(14, 1.0, 1.0, &[]);
        assert_eq!(rating(&bare, 0.0), 3.6);

        let full = RawPoiRecord::node(
            15,
            1.0,
            1.0,
            &[
                ("contact:website", "https://example.org"),
                ("contact:phone", "+33 1"),
                ("opening_hours", "24/7"),
            ],
        );
        assert_eq!(rating(&full, 0.0), 4.2);
        assert_eq!(rating(&full, 10.0), 4.0);
        // distance can never push below the floor
        assert_eq!(rating(&full, 500.0), MIN_RATING);
    }
}
