//! Find places around a named location.
//!
//! A free-text query is geocoded with Nominatim, points of interest around
//! the result are fetched from Overpass, then deduplicated, scored and
//! sorted into at most [`rank::RESULT_CAP`] [`Place`]s. [`Explorer`] wraps
//! the pipeline in a state machine that a map or list view can subscribe to.
//!
//! ```no_run
//! use placefinder::{Category, Config, Filters, Pipeline};
//!
//! let config = Config::default();
//! let pipeline = Pipeline::from_config(&config);
//! let filters = Filters::new(Category::Restaurants, false, 1.5);
//! let (center, places) = pipeline.discover("Lyon, France", &filters)?;
//! println!("{} places around {center}", places.len());
//! # Ok::<(), placefinder::error::DiscoveryError>(())
//! ```

use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod debounce;
pub mod error;
pub mod explorer;
pub mod nominatim;
pub mod normalize;
pub mod overpass;
pub mod pipeline;
pub mod rank;
pub mod theme;

pub use _model::{
    distance, Category, Coordinate, Overlay, Place, RawPoiRecord, RawPosition, HIDDEN_GEMS,
};
pub use config::Config;
pub use explorer::{Explorer, ExplorerEvent, ExplorerState, Focus, RunRequest, RunToken, SearchOutcome};
pub use nominatim::{Geocoder, NominatimClient};
pub use overpass::{OverpassClient, PoiSource};
pub use pipeline::{Filters, Pipeline};
pub use rank::rank;
pub use theme::{PreferenceStore, Theme};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Installs the global subscriber once. `RUST_LOG` takes precedence over
/// `level`.
pub fn init_logging(level: impl Into<LevelFilter>) -> error::Result<&'static ()> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("ureq=warn".parse()?)
            .add_directive("rustls=warn".parse()?);

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        Ok(())
    })
}
