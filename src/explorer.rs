//! Search state machine behind the map and list views.
//!
//! A run moves `Idle → Geocoding → Querying → Ready`, or ends in `Error` at
//! either network step. Every run is stamped with a [`RunToken`]; results that
//! arrive under an older token are dropped so only the latest run is shown.
//! The explorer never touches map widgets: it publishes center, zoom, places,
//! status and the selected place id through [`ExplorerEvent`]s.

use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use _model::{Category, Coordinate, Place};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    debounce::Debouncer,
    error::{DiscoveryError, Result},
    pipeline::{Filters, Pipeline},
};

pub const WORLD_ZOOM: u8 = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExplorerState {
    Idle,
    Geocoding,
    Querying,
    Ready,
    Error,
}

impl fmt::Display for ExplorerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Geocoding => write!(f, "geocoding"),
            Self::Querying => write!(f, "querying"),
            Self::Ready => write!(f, "ready"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunToken(u64);

/// Everything a worker needs to execute one run off the explorer's thread.
#[derive(Clone, Debug)]
pub struct RunRequest {
    pub token: RunToken,
    pub query: String,
    pub filters: Filters,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub state: ExplorerState,
    pub center: Coordinate,
    pub zoom: u8,
    pub places: Vec<Place>,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Focus {
    pub center: Coordinate,
    pub zoom: u8,
    pub selected_id: String,
}

/// Recenter on a place. No network access.
pub fn focus(place: &Place, zoom: u8) -> Focus {
    Focus {
        center: place.coordinate(),
        zoom,
        selected_id: place.id.clone(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExplorerEvent {
    StateChanged(ExplorerState),
    CenterChanged { center: Coordinate, zoom: u8 },
    PlacesChanged(Vec<Place>),
    StatusChanged(String),
    Focused(Focus),
}

type Subscriber = Box<dyn FnMut(&ExplorerEvent)>;

pub struct Explorer {
    pipeline: Arc<Pipeline>,
    search_zoom: u8,
    focus_zoom: u8,
    query: String,
    filters: Filters,
    state: ExplorerState,
    center: Coordinate,
    zoom: u8,
    places: Vec<Place>,
    status: String,
    selected: Option<String>,
    latest: RunToken,
    refresh: Debouncer,
    subscribers: Vec<Subscriber>,
}

impl Explorer {
    /// The initial query and filters are the mounted state: setting them
    /// here never schedules a refresh.
    pub fn new(
        pipeline: Arc<Pipeline>,
        config: &Config,
        query: impl Into<String>,
        filters: Filters,
    ) -> Self {
        Self {
            pipeline,
            search_zoom: config.search_zoom,
            focus_zoom: config.focus_zoom,
            query: query.into(),
            filters,
            state: ExplorerState::Idle,
            center: Coordinate::default(),
            zoom: WORLD_ZOOM,
            places: Vec::new(),
            status: String::new(),
            selected: None,
            latest: RunToken(0),
            refresh: Debouncer::new(config.debounce()),
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&ExplorerEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn state(&self) -> ExplorerState {
        self.state
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn outcome(&self) -> SearchOutcome {
        SearchOutcome {
            state: self.state,
            center: self.center,
            zoom: self.zoom,
            places: self.places.clone(),
            status: self.status.clone(),
        }
    }

    /// Editing the query text alone does not search.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Stores new filters and restarts the refresh window. Returns false when
    /// nothing changed.
    pub fn set_filters(&mut self, filters: Filters, now: Instant) -> bool {
        if filters == self.filters {
            return false;
        }
        debug!(?filters, "Filters changed");
        self.filters = filters;
        self.refresh.schedule(now);
        true
    }

    pub fn set_category(&mut self, category: Category, now: Instant) -> bool {
        let filters = Filters {
            category,
            ..self.filters.clone()
        };
        self.set_filters(filters, now)
    }

    pub fn set_hidden_gems(&mut self, hidden_gems: bool, now: Instant) -> bool {
        let filters = Filters {
            hidden_gems,
            ..self.filters.clone()
        };
        self.set_filters(filters, now)
    }

    pub fn set_radius(&mut self, radius_km: f64, now: Instant) -> bool {
        let filters = Filters {
            radius_km,
            ..self.filters.clone()
        };
        self.set_filters(filters, now)
    }

    /// How long until a debounced refresh is due.
    pub fn refresh_in(&self, now: Instant) -> Option<Duration> {
        self.refresh.remaining(now)
    }

    /// True once the debounce window has passed; the caller should start a run.
    pub fn poll_refresh(&mut self, now: Instant) -> bool {
        self.refresh.fire(now)
    }

    /// Starts a run with the current query and filters. Any pending debounced
    /// refresh is folded into this run.
    pub fn begin(&mut self) -> RunRequest {
        self.refresh.cancel();
        self.latest = RunToken(self.latest.0 + 1);
        info!(token = self.latest.0, query = %self.query, category = %self.filters.category, "Starting search");

        self.set_state(ExplorerState::Geocoding);
        let status = format!("Finding {}...", self.query);
        self.set_status(status);

        RunRequest {
            token: self.latest,
            query: self.query.clone(),
            filters: self.filters.clone(),
        }
    }

    pub fn is_current(&self, token: RunToken) -> bool {
        token == self.latest
    }

    /// Applies the geocoding step. Returns false if the run was superseded.
    pub fn on_geocoded(&mut self, token: RunToken, result: Result<Coordinate>) -> bool {
        if !self.accept(token) {
            return false;
        }

        match result {
            Ok(center) => {
                self.center = center;
                self.zoom = self.search_zoom;
                self.emit(ExplorerEvent::CenterChanged {
                    center,
                    zoom: self.search_zoom,
                });
                self.set_state(ExplorerState::Querying);
                let status = format!(
                    "Searching {} within {} km...",
                    self.filters.category.label().to_lowercase(),
                    self.filters.radius_km
                );
                self.set_status(status);
            }
            Err(err) => self.fail(&err),
        }
        true
    }

    /// Applies the query step. Returns false if the run was superseded.
    pub fn on_places(&mut self, token: RunToken, result: Result<Vec<Place>>) -> bool {
        if !self.accept(token) {
            return false;
        }
        if self.state != ExplorerState::Querying {
            warn!(state = %self.state, "Places arrived before geocoding finished");
            return false;
        }

        match result {
            Ok(places) => {
                let status = match places.len() {
                    0 => "No places found. Try a bigger radius or another category.".to_string(),
                    1 => "1 place found".to_string(),
                    n => format!("{n} places found"),
                };
                info!(places = places.len(), "Search ready");
                self.replace_places(places);
                self.set_status(status);
                self.set_state(ExplorerState::Ready);
            }
            Err(err) => self.fail(&err),
        }
        true
    }

    /// Runs the whole pipeline on this thread.
    pub fn run_search(&mut self, query: impl Into<String>, filters: Filters) -> SearchOutcome {
        self.query = query.into();
        self.filters = filters;
        self.refresh()
    }

    /// Reruns with the current query and filters.
    pub fn refresh(&mut self) -> SearchOutcome {
        let request = self.begin();
        let geocoded = self.pipeline.geocode(&request.query);
        let center = geocoded.as_ref().ok().copied();
        self.on_geocoded(request.token, geocoded);

        if let Some(center) = center {
            let places = self.pipeline.places_around(center, &request.filters);
            self.on_places(request.token, places);
        }
        self.outcome()
    }

    pub fn focus_place(&mut self, place: &Place) -> Focus {
        let focus = focus(place, self.focus_zoom);
        self.center = focus.center;
        self.zoom = focus.zoom;
        self.selected = Some(focus.selected_id.clone());
        self.emit(ExplorerEvent::Focused(focus.clone()));
        focus
    }

    /// Focus by position in the current list.
    pub fn focus_index(&mut self, index: usize) -> Option<Focus> {
        let place = self.places.get(index)?.clone();
        Some(self.focus_place(&place))
    }

    fn accept(&self, token: RunToken) -> bool {
        if self.is_current(token) {
            true
        } else {
            debug!(
                stale = token.0,
                latest = self.latest.0,
                "Dropping superseded result"
            );
            false
        }
    }

    // A failed run clears the list rather than leaving stale places on screen.
    fn fail(&mut self, err: &DiscoveryError) {
        warn!(%err, query = %self.query, "Search failed");
        let status = match err {
            DiscoveryError::NotFound => format!(
                "No results for \"{}\". Try a more specific search, like \"City, Region, Country\".",
                self.query
            ),
            err => err.to_string(),
        };
        self.replace_places(Vec::new());
        self.set_status(status);
        self.set_state(ExplorerState::Error);
    }

    fn replace_places(&mut self, places: Vec<Place>) {
        self.selected = None;
        self.places = places;
        self.emit(ExplorerEvent::PlacesChanged(self.places.clone()));
    }

    fn set_state(&mut self, state: ExplorerState) {
        self.state = state;
        self.emit(ExplorerEvent::StateChanged(state));
    }

    fn set_status(&mut self, status: String) {
        self.status = status;
        self.emit(ExplorerEvent::StatusChanged(self.status.clone()));
    }

    fn emit(&mut self, event: ExplorerEvent) {
        for x in &mut self.subscribers {
            x(&event);
        }
    }
}
