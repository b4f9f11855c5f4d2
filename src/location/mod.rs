//! Location resolution: test coordinate, explicit override, or device fix.

mod ip;
mod resolver;

pub use ip::IpGeolocator;
pub use resolver::{DeviceLocator, LocationError, LocationProvider, LocationResolver};
