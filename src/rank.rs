use _model::{Coordinate, Place, RawPoiRecord};
use itertools::Itertools;

use crate::normalize::normalize;

pub const RESULT_CAP: usize = 30;

pub fn rank(records: impl IntoIterator<Item = RawPoiRecord>, center: Coordinate) -> Vec<Place> {
    rank_with_cap(records, center, RESULT_CAP)
}

/// Deduplicates by element identity (first seen wins), normalizes, then
/// orders by rating and distance. The sort is stable so equal entries keep
/// their upstream order.
pub fn rank_with_cap(
    records: impl IntoIterator<Item = RawPoiRecord>,
    center: Coordinate,
    cap: usize,
) -> Vec<Place> {
    let mut places = records
        .into_iter()
        .unique_by(RawPoiRecord::identity)
        .filter_map(|x| normalize(x, center))
        .collect_vec();

    places.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then_with(|| a.distance_km.total_cmp(&b.distance_km))
    });
    places.truncate(cap);
    places
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Coordinate = Coordinate {
        lat: 48.8566,
        lng: 2.3522,
    };

    fn named(id: u64, lat: f64, extra: &[(&str, &str)]) -> RawPoiRecord {
        let mut raw = RawPoiRecord::node(id, lat, 2.3522, &[("name", "Spot")]);
        for (k, v) in extra {
            raw.tags.insert(k.to_string(), v.to_string());
        }
        raw
    }

    #[test]
    fn first_duplicate_wins() {
        let first = named(1, 48.86, &[("amenity", "cafe")]);
        let second = named(1, 48.86, &[("amenity", "bar"), ("website", "x")]);
        let places = rank(vec![first, second], CENTER);
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].kind, "cafe");
    }

    #[test]
    fn same_id_different_type_both_kept() {
        let node = named(1, 48.86, &[]);
        let mut way = named(1, 48.87, &[]);
        way.element_type = "way".to_string();
        assert_eq!(rank(vec![node, way], CENTER).len(), 2);
    }

    #[test]
    fn rating_then_distance() {
        let far_rich = named(1, 48.90, &[("website", "x")]);
        let near = named(2, 48.857, &[]);
        let far = named(3, 48.88, &[]);
        let places = rank(vec![far, near, far_rich], CENTER);
        let ids = places.iter().map(|x| x.id.as_str()).collect_vec();
        assert_eq!(ids, ["node:1", "node:2", "node:3"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let a = named(1, 48.86, &[]);
        let mut b = named(2, 48.86, &[]);
        b.tags.insert("name".to_string(), "Other".to_string());
        let places = rank(vec![a, b], CENTER);
        assert_eq!(places[0].id, "node:1");
        assert_eq!(places[1].id, "node:2");
    }

    #[test]
    fn capped() {
        let records = (1..=100).map(|i| named(i, 48.86 + i as f64 * 1e-4, &[]));
        assert_eq!(rank(records, CENTER).len(), RESULT_CAP);

        let records = (1..=100).map(|i| named(i, 48.86, &[]));
        assert_eq!(rank_with_cap(records, CENTER, 5).len(), 5);
    }

    #[test]
    fn skipped_records_do_not_count() {
        let records = vec![
            RawPoiRecord::node(1, 48.86, 2.35, &[("shop", "bakery")]),
            named(2, 48.86, &[]),
        ];
        let places = rank(records, CENTER);
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].id, "node:2");
    }
}
