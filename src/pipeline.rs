use _model::{Category, Coordinate, Place};
use tracing::{info, instrument};

use crate::{
    config::Config,
    error::Result,
    nominatim::{Geocoder, NominatimClient},
    overpass::{OverpassClient, PoiSource},
    rank::{rank_with_cap, RESULT_CAP},
};

/// What to look for around the geocoded point.
#[derive(Clone, Debug, PartialEq)]
pub struct Filters {
    pub category: Category,
    pub hidden_gems: bool,
    pub radius_km: f64,
}

impl Filters {
    pub fn new(category: Category, hidden_gems: bool, radius_km: f64) -> Self {
        Self {
            category,
            hidden_gems,
            radius_km,
        }
    }

    pub fn radius_m(&self) -> u32 {
        (self.radius_km * 1000.0).round() as u32
    }

    pub fn selectors(&self) -> Vec<&'static str> {
        self.category.query_selectors(self.hidden_gems)
    }
}

/// Stateless geocode → query → rank sequence. Shared between the explorer
/// and worker threads.
pub struct Pipeline {
    geocoder: Box<dyn Geocoder>,
    source: Box<dyn PoiSource>,
    result_cap: usize,
}

impl Pipeline {
    pub fn new(geocoder: impl Geocoder + 'static, source: impl PoiSource + 'static) -> Self {
        Self {
            geocoder: Box::new(geocoder),
            source: Box::new(source),
            result_cap: RESULT_CAP,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            NominatimClient::from_config(config),
            OverpassClient::from_config(config),
        )
        .with_result_cap(config.result_cap)
    }

    /// Lowers the number of places returned. Never raises it past
    /// [`RESULT_CAP`].
    pub fn with_result_cap(mut self, cap: usize) -> Self {
        self.result_cap = cap.min(RESULT_CAP);
        self
    }

    pub fn geocode(&self, query: &str) -> Result<Coordinate> {
        self.geocoder.geocode(query)
    }

    #[instrument(skip(self))]
    pub fn places_around(&self, center: Coordinate, filters: &Filters) -> Result<Vec<Place>> {
        let raw = self
            .source
            .query_pois(center, filters.radius_m(), &filters.selectors())?;
        let total = raw.len();
        let places = rank_with_cap(raw, center, self.result_cap);
        info!(raw = total, kept = places.len(), "Ranked places");
        Ok(places)
    }

    pub fn discover(&self, query: &str, filters: &Filters) -> Result<(Coordinate, Vec<Place>)> {
        let center = self.geocode(query)?;
        Ok((center, self.places_around(center, filters)?))
    }
}
