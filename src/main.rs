use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use placefinder::{
    init_logging, Category, Config, Explorer, ExplorerEvent, Filters, Pipeline, PreferenceStore,
    Theme, HIDDEN_GEMS,
};
use tracing::Level;

mod explore;
mod utils;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Geocode a place and list what is around it
    Search {
        query: Option<String>,
        #[arg(short, long, value_enum, default_value_t = Category::Restaurants)]
        category: Category,
        /// Add the hidden gems overlay
        #[arg(long)]
        gems: bool,
        /// Search radius in km
        #[arg(short, long, value_parser = utils::parse_radius)]
        radius: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Interactive session reading commands from stdin
    Explore {
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long, value_enum, default_value_t = Category::Restaurants)]
        category: Category,
        #[arg(long)]
        gems: bool,
        /// Search radius in km
        #[arg(short, long, value_parser = utils::parse_radius)]
        radius: Option<f64>,
    },
    /// List categories and their Overpass selectors
    Categories,
    /// Show or change the map theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Clone, Debug, Subcommand)]
enum ThemeAction {
    Toggle,
    Set {
        #[arg(value_enum)]
        theme: Theme,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    init_logging(level)?;
    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Command::Search {
            query,
            category,
            gems,
            radius,
            json,
        } => {
            let query = query.unwrap_or_else(|| config.default_query.clone());
            let filters = Filters::new(category, gems, radius.unwrap_or(config.default_radius_km));
            search(&config, query, filters, json)?;
        }
        Command::Explore {
            query,
            category,
            gems,
            radius,
        } => {
            let query = query.unwrap_or_else(|| config.default_query.clone());
            let filters = Filters::new(category, gems, radius.unwrap_or(config.default_radius_km));
            explore::run(&config, query, filters)?;
        }
        Command::Categories => {
            for x in Category::all() {
                println!("{} {} ({})", x.icon(), x.label(), x.key());
                for s in x.selectors() {
                    println!("    {s}");
                }
            }
            println!("{} {} (--gems)", HIDDEN_GEMS.icon, HIDDEN_GEMS.label);
            for s in HIDDEN_GEMS.selectors {
                println!("    {s}");
            }
        }
        Command::Theme { action } => {
            let store = PreferenceStore::default_location()?;
            let theme = match action {
                None => store.theme(),
                Some(ThemeAction::Toggle) => store.toggle_theme()?,
                Some(ThemeAction::Set { theme }) => store.set_theme(theme)?,
            };
            println!("{theme}");
            println!("tiles: {}", theme.tile_url());
            println!("attribution: {}", theme.attribution());
        }
    }

    Ok(())
}

fn search(config: &Config, query: String, filters: Filters, json: bool) -> Result<()> {
    let pipeline = Pipeline::from_config(config);
    let mut explorer = Explorer::new(pipeline.into(), config, query, filters);

    let bar = utils::spinner();
    let status = bar.clone();
    explorer.subscribe(move |event| {
        if let ExplorerEvent::StatusChanged(x) = event {
            status.set_message(x.clone());
        }
    });

    let outcome = explorer.refresh();
    bar.finish_and_clear();

    if outcome.state == placefinder::ExplorerState::Error {
        bail!("{}", outcome.status);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        utils::print_center(outcome.center, outcome.zoom);
        println!("{}", outcome.status);
        utils::print_places(&outcome.places);
    }
    Ok(())
}
