use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use placefinder::{Coordinate, Place};

pub fn spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]").expect("hardcoded"),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Search radius in km, as given on the command line or at the prompt.
pub fn parse_radius(s: &str) -> Result<f64> {
    let km: f64 = s.trim().parse().context("radius must be a number of km")?;
    if !(km.is_finite() && km > 0.0) {
        bail!("radius must be a positive number of km, got {s}");
    }
    Ok(km)
}

pub fn print_places(places: &[Place]) {
    for (i, x) in places.iter().enumerate() {
        println!(
            "{:>3}. {} ({}) ★ {:.1}  {:.2} km",
            i + 1,
            x.name,
            x.kind,
            x.rating,
            x.distance_km
        );
        if !x.address.is_empty() {
            println!("     {}", x.address);
        }
        if let Some(link) = x.osm_link() {
            println!("     {link}");
        }
    }
}

pub fn print_center(center: Coordinate, zoom: u8) {
    println!("Map centred on {center} (zoom {zoom})");
}
