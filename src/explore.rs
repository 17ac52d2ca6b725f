use std::{
    io::{self, BufRead},
    str::FromStr,
    sync::{
        mpsc::{self, RecvTimeoutError, Sender},
        Arc,
    },
    thread,
    time::Instant,
};

use anyhow::{bail, Context, Result};
use placefinder::{
    error, Category, Config, Coordinate, Explorer, ExplorerEvent, Filters, Pipeline, Place,
    PreferenceStore, RunRequest, RunToken,
};
use tracing::warn;

use crate::utils;

enum Message {
    Input(String),
    Geocoded(RunToken, error::Result<Coordinate>),
    Queried(RunToken, error::Result<Vec<Place>>),
    Eof,
}

#[derive(Debug, PartialEq)]
enum Input {
    Search(Option<String>),
    Category(Category),
    Gems(bool),
    Radius(f64),
    Focus(usize),
    List,
    Theme,
    Help,
    Quit,
}

impl FromStr for Input {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        Ok(match command {
            "search" | "s" => Self::Search((!rest.is_empty()).then(|| rest.to_string())),
            "category" | "c" => Self::Category(rest.parse()?),
            "gems" | "g" => Self::Gems(match rest {
                "on" | "yes" | "true" => true,
                "off" | "no" | "false" => false,
                _ => bail!("expected on or off, got {rest:?}"),
            }),
            "radius" | "r" => Self::Radius(utils::parse_radius(rest)?),
            "focus" | "f" => {
                let n: usize = rest.parse().context("focus takes a list number")?;
                if n == 0 {
                    bail!("list numbers start at 1");
                }
                Self::Focus(n - 1)
            }
            "list" | "l" => Self::List,
            "theme" | "t" => Self::Theme,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => bail!("unknown command: {command}"),
        })
    }
}

const HELP: &str = "\
commands:
  search [place]      search again, optionally for a new place
  category <key>      restaurants | attractions | hotels | safety | transport
  gems on|off         toggle the hidden gems overlay
  radius <km>         search radius
  focus <n>           centre the map on list entry n
  list                print the current list
  theme               toggle the dark/light map theme
  quit";

/// Event loop: stdin lines and worker results arrive on one channel; the
/// explorer's debounce deadline bounds how long we block on it.
pub fn run(config: &Config, query: String, filters: Filters) -> Result<()> {
    let pipeline = Arc::new(Pipeline::from_config(config));
    let mut explorer = Explorer::new(pipeline.clone(), config, query, filters);
    explorer.subscribe(print_event);

    let store = PreferenceStore::default_location()?;
    let theme = store.theme();
    println!("Theme: {theme} ({})", theme.tile_url());
    println!("{HELP}");

    let (tx, rx) = mpsc::channel();
    let input = tx.clone();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if input.send(Message::Input(line)).is_err() {
                return;
            }
        }
        let _ = input.send(Message::Eof);
    });

    // initial load
    start(&mut explorer, &pipeline, &tx);

    loop {
        let message = match explorer.refresh_in(Instant::now()) {
            Some(wait) => match rx.recv_timeout(wait) {
                Ok(x) => Some(x),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match rx.recv() {
                Ok(x) => Some(x),
                Err(_) => break,
            },
        };

        match message {
            None => {}
            Some(Message::Eof) => break,
            Some(Message::Geocoded(token, result)) => {
                explorer.on_geocoded(token, result);
            }
            Some(Message::Queried(token, result)) => {
                explorer.on_places(token, result);
            }
            Some(Message::Input(line)) if line.trim().is_empty() => {}
            Some(Message::Input(line)) => {
                let now = Instant::now();
                match line.parse::<Input>() {
                    Ok(Input::Quit) => break,
                    Ok(Input::Help) => println!("{HELP}"),
                    Ok(Input::List) => {
                        println!("[{}] {}", explorer.state(), explorer.status());
                        utils::print_center(explorer.center(), explorer.zoom());
                        utils::print_places(explorer.places());
                    }
                    Ok(Input::Search(query)) => {
                        if let Some(x) = query {
                            explorer.set_query(x);
                        }
                        start(&mut explorer, &pipeline, &tx);
                    }
                    Ok(Input::Category(x)) => {
                        explorer.set_category(x, now);
                    }
                    Ok(Input::Gems(x)) => {
                        explorer.set_hidden_gems(x, now);
                    }
                    Ok(Input::Radius(x)) => {
                        explorer.set_radius(x, now);
                    }
                    Ok(Input::Focus(i)) => {
                        if explorer.focus_index(i).is_none() {
                            println!("No place #{}", i + 1);
                        }
                    }
                    Ok(Input::Theme) => match store.toggle_theme() {
                        Ok(x) => println!("Theme: {x} ({})", x.tile_url()),
                        Err(err) => warn!(%err, "Could not save theme"),
                    },
                    Err(err) => println!("{err}"),
                }
            }
        }

        if explorer.poll_refresh(Instant::now()) {
            start(&mut explorer, &pipeline, &tx);
        }
    }

    Ok(())
}

fn start(explorer: &mut Explorer, pipeline: &Arc<Pipeline>, tx: &Sender<Message>) {
    let RunRequest {
        token,
        query,
        filters,
    } = explorer.begin();
    let pipeline = pipeline.clone();
    let tx = tx.clone();

    // the receiver only goes away on shutdown, so send errors are ignored
    thread::spawn(move || match pipeline.geocode(&query) {
        Ok(center) => {
            let _ = tx.send(Message::Geocoded(token, Ok(center)));
            let places = pipeline.places_around(center, &filters);
            let _ = tx.send(Message::Queried(token, places));
        }
        Err(err) => {
            let _ = tx.send(Message::Geocoded(token, Err(err)));
        }
    });
}

fn print_event(event: &ExplorerEvent) {
    match event {
        ExplorerEvent::StatusChanged(x) => println!("» {x}"),
        ExplorerEvent::CenterChanged { center, zoom } => utils::print_center(*center, *zoom),
        ExplorerEvent::PlacesChanged(places) => utils::print_places(places),
        ExplorerEvent::Focused(x) => {
            println!("Selected {} at {} (zoom {})", x.selected_id, x.center, x.zoom)
        }
        ExplorerEvent::StateChanged(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        assert_eq!("search".parse::<Input>().unwrap(), Input::Search(None));
        assert_eq!(
            "s  Lyon, France ".parse::<Input>().unwrap(),
            Input::Search(Some("Lyon, France".to_string()))
        );
        assert_eq!(
            "category hotels".parse::<Input>().unwrap(),
            Input::Category(Category::Hotels)
        );
        assert_eq!("gems off".parse::<Input>().unwrap(), Input::Gems(false));
        assert_eq!("radius 2.5".parse::<Input>().unwrap(), Input::Radius(2.5));
        assert_eq!("focus 3".parse::<Input>().unwrap(), Input::Focus(2));
        assert_eq!("q".parse::<Input>().unwrap(), Input::Quit);
    }

    #[test]
    fn reject_bad_commands() {
        assert!("category nightlife".parse::<Input>().is_err());
        assert!("radius -1".parse::<Input>().is_err());
        assert!("radius NaN".parse::<Input>().is_err());
        assert!("focus 0".parse::<Input>().is_err());
        assert!("gems maybe".parse::<Input>().is_err());
        assert!("dance".parse::<Input>().is_err());
    }
}
