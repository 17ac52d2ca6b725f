use std::{
    fmt, fs,
    path::PathBuf,
    str::FromStr,
};

use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DiscoveryError, Result};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn tile_url(&self) -> &'static str {
        match self {
            Self::Dark => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
            Self::Light => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            Self::Dark => "© OpenStreetMap contributors © CARTO",
            Self::Light => "© OpenStreetMap contributors",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dark => write!(f, "dark"),
            Self::Light => write!(f, "light"),
        }
    }
}

impl FromStr for Theme {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            _ => Err(DiscoveryError::Config(format!("Unknown theme: {s}"))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

/// The only state kept between sessions.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "placefinder")
            .ok_or_else(|| DiscoveryError::Config("no home directory".into()))?;
        Ok(Self::new(dirs.config_dir().join("preferences.ron")))
    }

    /// Missing or unreadable preferences fall back to the defaults.
    pub fn load(&self) -> Preferences {
        if !self.path.exists() {
            return Preferences::default();
        }
        match self.read() {
            Ok(x) => x,
            Err(err) => {
                warn!(%err, path = %self.path.display(), "Ignoring unreadable preferences");
                Preferences::default()
            }
        }
    }

    fn read(&self) -> Result<Preferences> {
        Ok(ron::from_str(&fs::read_to_string(&self.path)?)?)
    }

    pub fn save(&self, preferences: &Preferences) -> Result<()> {
        if let Some(x) = self.path.parent() {
            fs::create_dir_all(x)?;
        }
        let mut contents = ron::ser::to_string_pretty(preferences, Default::default())?;
        contents.push('\n');
        fs::write(&self.path, contents)?;
        debug!(theme = %preferences.theme, path = %self.path.display(), "Saved preferences");
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        self.load().theme
    }

    pub fn set_theme(&self, theme: Theme) -> Result<Theme> {
        let mut preferences = self.load();
        preferences.theme = theme;
        self.save(&preferences)?;
        Ok(theme)
    }

    pub fn toggle_theme(&self) -> Result<Theme> {
        self.set_theme(self.theme().toggle())
    }
}
