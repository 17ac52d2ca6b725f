use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("No results found for that place")]
    NotFound,
    #[error("Geocoding failed with HTTP {0}")]
    GeocodeFailed(u16),
    #[error("Place query failed with HTTP {status}: {excerpt}")]
    QueryFailed { status: u16, excerpt: String },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] serde_yaml::Error),
    #[error("Preference file error: {0}")]
    PreferenceParse(#[from] ron::error::SpannedError),
    #[error("Preference file error: {0}")]
    PreferenceWrite(#[from] ron::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Init logging error: {0}")]
    InitLogging(#[from] tracing_subscriber::filter::ParseError),
}

impl From<ureq::Transport> for DiscoveryError {
    fn from(x: ureq::Transport) -> Self {
        Self::Transport(x.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
