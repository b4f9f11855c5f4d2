//! Transit authority data: domain model and REST client.

pub mod client;
pub mod error;
pub mod model;

pub use client::{TflClient, TransitApi};
pub use error::TransitError;
pub use model::{Arrival, Coordinates, Stop, StopKind};
