//! Pure rendering of [`DashboardState`] into a presentational tree.
//!
//! Nothing here touches the terminal: [`render`] is deterministic in its
//! input, and the terminal front-end only turns the resulting [`View`] into
//! widgets. `View` also implements `Display` for headless output.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::transit::{Arrival, Stop, StopKind};
use crate::ui::dashboard::DashboardState;

/// Arrivals shown per bus stop and per station platform.
pub const MAX_ARRIVALS: usize = 5;

pub const NOTHING_NEARBY: &str = "Could not find any bus stops or Tube stations nearby.";
pub const NO_STATION_ARRIVALS: &str = "No live arrivals available.";
pub const NO_BUS_ARRIVALS: &str = "No buses due in the next 30 minutes.";
const UNKNOWN_PLATFORM: &str = "Unknown Platform";
const UNKNOWN_DESTINATION: &str = "Unknown Destination";
const DEFAULT_LOADING: &str = "Loading…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eta {
    Due,
    Minutes(u32),
}

impl Eta {
    /// Whole minutes, rounded down; anything under a minute is due.
    pub fn from_seconds(seconds: u32) -> Self {
        match seconds / 60 {
            0 => Eta::Due,
            minutes => Eta::Minutes(minutes),
        }
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eta::Due => f.write_str("Due"),
            Eta::Minutes(minutes) => write!(f, "{} min", minutes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalRow {
    pub line_id: String,
    pub line_name: String,
    pub destination: String,
    pub eta: Eta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformGroup {
    pub platform: String,
    pub arrivals: Vec<ArrivalRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Departures {
    /// Station arrivals grouped by platform.
    Platforms(Vec<PlatformGroup>),
    /// Flat list for a bus stop.
    Arrivals(Vec<ArrivalRow>),
    /// Nothing due; carries the text to show instead.
    Nothing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopCard {
    pub id: String,
    pub name: String,
    pub kind: StopKind,
    /// Rounded distance in metres.
    pub distance_m: u32,
    pub stop_letter: Option<String>,
    pub direction: Option<String>,
    pub towards: Option<String>,
    pub disrupted: bool,
    pub departures: Departures,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Loading { message: String },
    Error { message: String },
    Empty { message: &'static str },
    /// Stop cards, with the last error as a banner above them.
    Stops {
        banner: Option<String>,
        cards: Vec<StopCard>,
    },
}

/// Build the view for `state`. Rules, first match wins:
/// 1. no stops and refreshing → loading indicator
/// 2. no stops and an error → error only
/// 3. no stops → "nothing nearby"
/// 4. stops, preceded by the error banner if any
pub fn render(state: &DashboardState) -> View {
    if state.stops.is_empty() {
        if state.is_refreshing {
            return View::Loading {
                message: state
                    .loading_message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LOADING.to_string()),
            };
        }
        if let Some(error) = &state.error {
            return View::Error {
                message: error.clone(),
            };
        }
        return View::Empty {
            message: NOTHING_NEARBY,
        };
    }

    View::Stops {
        banner: state.error.clone(),
        cards: stop_cards(&state.stops),
    }
}

/// Cards ordered by distance, nearest first. Equal distances keep input order.
pub fn stop_cards(stops: &[Stop]) -> Vec<StopCard> {
    let mut ordered: Vec<&Stop> = stops.iter().collect();
    ordered.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ordered.into_iter().map(stop_card).collect()
}

fn stop_card(stop: &Stop) -> StopCard {
    let departures = match stop.kind {
        StopKind::MetroStation => station_departures(&stop.arrivals),
        StopKind::Bus => bus_departures(&stop.arrivals),
    };

    StopCard {
        id: stop.id.clone(),
        name: stop.name.clone(),
        kind: stop.kind,
        distance_m: stop.distance.round().max(0.0) as u32,
        stop_letter: stop.stop_letter.clone(),
        direction: stop.direction.clone(),
        towards: stop.towards.clone(),
        disrupted: stop.disrupted,
        departures,
    }
}

fn soonest(arrivals: Vec<&Arrival>) -> impl Iterator<Item = &Arrival> {
    let mut arrivals = arrivals;
    arrivals.sort_by_key(|a| a.time_to_station);
    arrivals.into_iter().take(MAX_ARRIVALS)
}

fn bus_departures(arrivals: &[Arrival]) -> Departures {
    if arrivals.is_empty() {
        return Departures::Nothing(NO_BUS_ARRIVALS);
    }
    Departures::Arrivals(
        soonest(arrivals.iter().collect())
            .map(|a| ArrivalRow {
                line_id: a.line_id.clone(),
                line_name: a.line_name.clone(),
                destination: a.destination.clone(),
                eta: Eta::from_seconds(a.time_to_station),
            })
            .collect(),
    )
}

fn station_departures(arrivals: &[Arrival]) -> Departures {
    let mut by_platform: HashMap<&str, Vec<&Arrival>> = HashMap::new();
    for arrival in arrivals {
        let platform = arrival.platform.as_deref().unwrap_or(UNKNOWN_PLATFORM);
        by_platform.entry(platform).or_default().push(arrival);
    }

    if by_platform.is_empty() {
        return Departures::Nothing(NO_STATION_ARRIVALS);
    }

    let mut platforms: Vec<(&str, Vec<&Arrival>)> = by_platform.into_iter().collect();
    platforms.sort_by(|a, b| natural_cmp(a.0, b.0));

    Departures::Platforms(
        platforms
            .into_iter()
            .map(|(platform, arrivals)| PlatformGroup {
                platform: platform.to_string(),
                arrivals: soonest(arrivals)
                    .map(|a| ArrivalRow {
                        line_id: a.line_id.clone(),
                        line_name: a.line_name.clone(),
                        destination: a
                            .towards
                            .clone()
                            .unwrap_or_else(|| UNKNOWN_DESTINATION.to_string()),
                        eta: Eta::from_seconds(a.time_to_station),
                    })
                    .collect(),
            })
            .collect(),
    )
}

/// Split into alternating runs of ASCII digits and everything else.
fn chunks(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let numeric = rest.chars().next()?.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != numeric)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}

fn is_numeric(chunk: &str) -> bool {
    chunk.starts_with(|c: char| c.is_ascii_digit())
}

fn compare_chunks(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (true, true) => {
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

/// Numeric-aware, case-insensitive ordering: "Platform 2" < "Platform 10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match compare_chunks(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

impl fmt::Display for ArrivalRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12} {:<32} {:>6}", self.line_name, self.destination, self.eta)
    }
}

impl fmt::Display for StopCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(letter) = &self.stop_letter {
            write!(f, " [{}]", letter)?;
        }
        if let Some(direction) = &self.direction {
            write!(f, " ({})", direction)?;
        }
        if self.disrupted {
            write!(f, " ⚠ disruption")?;
        }
        writeln!(f, "  {}m away", self.distance_m)?;
        if let Some(towards) = &self.towards {
            writeln!(f, "  Towards {}", towards)?;
        }

        match &self.departures {
            Departures::Platforms(platforms) => {
                for group in platforms {
                    writeln!(f, "  {}", group.platform)?;
                    for row in &group.arrivals {
                        writeln!(f, "    {}", row)?;
                    }
                }
            }
            Departures::Arrivals(rows) => {
                for row in rows {
                    writeln!(f, "  {}", row)?;
                }
            }
            Departures::Nothing(message) => writeln!(f, "  {}", message)?,
        }
        Ok(())
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Loading { message } => writeln!(f, "{}", message),
            View::Error { message } => writeln!(f, "An Error Occurred\n{}", message),
            View::Empty { message } => writeln!(f, "{}", message),
            View::Stops { banner, cards } => {
                if let Some(banner) = banner {
                    writeln!(f, "An Error Occurred\n{}\n", banner)?;
                }
                for card in cards {
                    writeln!(f, "{}", card)?;
                }
                Ok(())
            }
        }
    }
}
