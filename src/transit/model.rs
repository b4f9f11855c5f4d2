/// A latitude/longitude pair in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Category of a stop, which decides how its arrivals are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopKind {
    /// Bus, coach or tram stop.
    Bus,
    /// Underground/metro station with platforms.
    MetroStation,
}

impl StopKind {
    /// Map the API's NaPTAN stop type. Anything that isn't a metro station
    /// is rendered as a bus stop.
    pub fn from_stop_type(stop_type: &str) -> Self {
        match stop_type {
            "NaptanMetroStation" => StopKind::MetroStation,
            _ => StopKind::Bus,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub kind: StopKind,
    /// Distance from the resolved location in metres.
    pub distance: f64,
    pub towards: Option<String>,
    /// Compass point the stop faces (e.g. "N", "SW").
    pub direction: Option<String>,
    pub stop_letter: Option<String>,
    /// Set when the service reports `status: false`.
    pub disrupted: bool,
    pub arrivals: Vec<Arrival>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    pub line_id: String,
    pub line_name: String,
    pub platform: Option<String>,
    pub towards: Option<String>,
    pub destination: String,
    /// Seconds until the vehicle arrives.
    pub time_to_station: u32,
}

impl Arrival {
    /// Whole minutes until arrival, rounded down.
    pub fn minutes_away(&self) -> u32 {
        self.time_to_station / 60
    }
}
