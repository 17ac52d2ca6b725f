mod category;
mod coordinate;
mod osm;
mod place;

pub use category::{Category, Overlay, HIDDEN_GEMS};
pub use coordinate::{distance, Coordinate, EARTH_RADIUS};
pub use osm::{osm_link, RawPoiRecord, RawPosition};
pub use place::Place;
