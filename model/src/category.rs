use core::fmt;
use std::str::FromStr;

use anyhow::bail;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Restaurants,
    Attractions,
    Hotels,
    Safety,
    Transport,
}

/// Selector set that can be layered on top of any category.
#[derive(Debug, PartialEq, Eq)]
pub struct Overlay {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub selectors: &'static [&'static str],
}

pub const HIDDEN_GEMS: Overlay = Overlay {
    key: "hidden-gems",
    label: "Hidden gems",
    icon: "💎",
    selectors: &[
        r#"node["leisure"~"park|garden|nature_reserve"]"#,
        r#"node["tourism"~"viewpoint|artwork"]"#,
        r#"node["amenity"~"marketplace|library|arts_centre"]"#,
        r#"node["historic"~"memorial|ruins|castle"]"#,
    ],
};

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "restaurants" => Self::Restaurants,
            "attractions" => Self::Attractions,
            "hotels" => Self::Hotels,
            "safety" => Self::Safety,
            "transport" => Self::Transport,
            _ => bail!("Unknown category: {s}"),
        })
    }
}

impl Category {
    pub fn all() -> Vec<Self> {
        vec![
            Category::Restaurants,
            Category::Attractions,
            Category::Hotels,
            Category::Safety,
            Category::Transport,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Restaurants => "restaurants",
            Self::Attractions => "attractions",
            Self::Hotels => "hotels",
            Self::Safety => "safety",
            Self::Transport => "transport",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Restaurants => "Restaurants",
            Self::Attractions => "Attractions",
            Self::Hotels => "Hotels",
            Self::Safety => "Safety",
            Self::Transport => "Transport",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Restaurants => "🍽️",
            Self::Attractions => "🏛️",
            Self::Hotels => "🏨",
            Self::Safety => "🚑",
            Self::Transport => "🚉",
        }
    }

    /// Overpass tag selectors, in query order.
    pub fn selectors(&self) -> &'static [&'static str] {
        match self {
            Self::Restaurants => &[
                r#"node["amenity"~"restaurant|cafe|fast_food|bar|pub|food_court"]"#,
                r#"way["amenity"~"restaurant|cafe|fast_food"]"#,
            ],
            Self::Attractions => &[
                r#"node["tourism"~"attraction|museum|gallery|viewpoint|theme_park|zoo"]"#,
                r#"way["tourism"~"attraction|museum|gallery|theme_park|zoo"]"#,
                r#"node["historic"~"monument|castle|memorial"]"#,
            ],
            Self::Hotels => &[
                r#"node["tourism"~"hotel|hostel|guest_house|motel|apartment"]"#,
                r#"way["tourism"~"hotel|hostel|guest_house|motel"]"#,
            ],
            Self::Safety => &[
                r#"node["amenity"~"police|hospital|clinic|pharmacy|fire_station"]"#,
                r#"way["amenity"~"police|hospital|clinic|fire_station"]"#,
            ],
            Self::Transport => &[
                r#"node["railway"~"station|halt|tram_stop|subway_entrance"]"#,
                r#"node["public_transport"="station"]"#,
                r#"node["amenity"~"bus_station|ferry_terminal"]"#,
                r#"node["aeroway"~"aerodrome|terminal"]"#,
            ],
        }
    }

    /// Category selectors followed by the hidden gem overlay when enabled.
    /// Selectors already present are not repeated.
    pub fn query_selectors(&self, hidden_gems: bool) -> Vec<&'static str> {
        let mut output = self.selectors().to_vec();
        if hidden_gems {
            for x in HIDDEN_GEMS.selectors {
                if !output.contains(x) {
                    output.push(*x);
                }
            }
        }
        output
    }
}
