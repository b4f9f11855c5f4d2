//! Terminal dashboard of nearby public-transport stops and their live arrivals.

pub mod config;
pub mod location;
pub mod logging;
pub mod refresh;
pub mod shutdown;
pub mod transit;
pub mod ui;
