use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;

use crate::transit::Coordinates;

/// Why a location could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location access was denied. Please enable location services, or pass --lat/--lon.")]
    Denied,

    #[error("Timed out while getting your location.")]
    Timeout,

    #[error("{0}")]
    Unavailable(String),
}

/// Produces the coordinate a refresh cycle searches around.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Resolve a position. A cached device fix younger than `max_cached_age`
    /// may be returned; `Duration::ZERO` forces a fresh fix.
    async fn resolve(&self, max_cached_age: Duration) -> Result<Coordinates, LocationError>;

    /// Switch the fixed test coordinate on or off.
    fn set_test_location(&mut self, _enabled: bool) {}
}

/// Platform position source (the "device geolocation" step).
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

#[derive(Debug, Clone, Copy)]
struct CachedFix {
    coordinates: Coordinates,
    acquired_at: Instant,
}

/// Resolution order, first match wins:
/// test location (when enabled) → explicit override → device fix.
pub struct LocationResolver<D> {
    test_coordinates: Coordinates,
    use_test_location: bool,
    override_coordinates: Option<Coordinates>,
    device: Option<D>,
    acquisition_timeout: Duration,
    last_fix: Mutex<Option<CachedFix>>,
}

impl<D: DeviceLocator> LocationResolver<D> {
    pub fn new(
        device: Option<D>,
        test_coordinates: Coordinates,
        acquisition_timeout: Duration,
    ) -> Self {
        Self {
            test_coordinates,
            use_test_location: false,
            override_coordinates: None,
            device,
            acquisition_timeout,
            last_fix: Mutex::new(None),
        }
    }

    pub fn with_override(mut self, coordinates: Option<Coordinates>) -> Self {
        self.override_coordinates = coordinates;
        self
    }

    pub fn with_test_location(mut self, enabled: bool) -> Self {
        self.use_test_location = enabled;
        self
    }

    fn cached_fix(&self, max_cached_age: Duration) -> Option<Coordinates> {
        let fix = (*self.last_fix.lock())?;
        (fix.acquired_at.elapsed() < max_cached_age).then_some(fix.coordinates)
    }
}

#[async_trait]
impl<D: DeviceLocator> LocationProvider for LocationResolver<D> {
    async fn resolve(&self, max_cached_age: Duration) -> Result<Coordinates, LocationError> {
        if self.use_test_location {
            tracing::info!(location = %self.test_coordinates, "Using test location");
            return Ok(self.test_coordinates);
        }

        if let Some(coordinates) = self.override_coordinates {
            tracing::info!(location = %coordinates, "Using location override");
            return Ok(coordinates);
        }

        let Some(device) = &self.device else {
            return Err(LocationError::Unavailable(
                "Geolocation is not available. Pass --lat/--lon or enable the test location (t)."
                    .to_string(),
            ));
        };

        if let Some(coordinates) = self.cached_fix(max_cached_age) {
            tracing::debug!(location = %coordinates, "Reusing cached location");
            return Ok(coordinates);
        }

        let coordinates = tokio::time::timeout(self.acquisition_timeout, device.locate())
            .await
            .map_err(|_| LocationError::Timeout)??;

        *self.last_fix.lock() = Some(CachedFix {
            coordinates,
            acquired_at: Instant::now(),
        });
        tracing::info!(location = %coordinates, "Resolved device location");
        Ok(coordinates)
    }

    fn set_test_location(&mut self, enabled: bool) {
        self.use_test_location = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeDevice {
        result: Result<Coordinates, LocationError>,
        delay: Duration,
        calls: Arc<AtomicUsize>,
    }

    impl FakeDevice {
        fn ok(latitude: f64, longitude: f64) -> Self {
            Self {
                result: Ok(Coordinates::new(latitude, longitude)),
                delay: Duration::ZERO,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl DeviceLocator for FakeDevice {
        async fn locate(&self) -> Result<Coordinates, LocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.result.clone()
        }
    }

    fn test_point() -> Coordinates {
        Coordinates::new(51.5181627156178, -0.1786709008541014)
    }

    #[tokio::test]
    async fn test_location_wins_over_everything() {
        let resolver = LocationResolver::new(
            Some(FakeDevice::ok(1.0, 2.0)),
            test_point(),
            Duration::from_secs(10),
        )
        .with_override(Some(Coordinates::new(3.0, 4.0)))
        .with_test_location(true);
        assert_eq!(resolver.resolve(Duration::ZERO).await, Ok(test_point()));
    }

    #[tokio::test]
    async fn override_wins_over_device() {
        let device = FakeDevice::ok(1.0, 2.0);
        let calls = Arc::clone(&device.calls);
        let resolver = LocationResolver::new(Some(device), test_point(), Duration::from_secs(10))
            .with_override(Some(Coordinates::new(3.0, 4.0)));

        assert_eq!(
            resolver.resolve(Duration::ZERO).await,
            Ok(Coordinates::new(3.0, 4.0))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_device_is_unavailable() {
        let resolver: LocationResolver<FakeDevice> =
            LocationResolver::new(None, test_point(), Duration::from_secs(10));
        assert!(matches!(
            resolver.resolve(Duration::ZERO).await,
            Err(LocationError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn device_errors_pass_through() {
        let device = FakeDevice {
            result: Err(LocationError::Denied),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let resolver = LocationResolver::new(Some(device), test_point(), Duration::from_secs(10));
        assert_eq!(resolver.resolve(Duration::ZERO).await, Err(LocationError::Denied));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_device_times_out() {
        let device = FakeDevice {
            result: Ok(Coordinates::new(1.0, 2.0)),
            delay: Duration::from_secs(30),
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let resolver = LocationResolver::new(Some(device), test_point(), Duration::from_secs(10));
        assert_eq!(resolver.resolve(Duration::ZERO).await, Err(LocationError::Timeout));
    }

    #[tokio::test]
    async fn cached_fix_respects_max_age() {
        let device = FakeDevice::ok(1.0, 2.0);
        let calls = Arc::clone(&device.calls);
        let resolver = LocationResolver::new(Some(device), test_point(), Duration::from_secs(10));

        resolver.resolve(Duration::ZERO).await.unwrap();
        resolver.resolve(Duration::from_secs(60)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        resolver.resolve(Duration::ZERO).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn toggling_test_location() {
        let mut resolver = LocationResolver::new(
            Some(FakeDevice::ok(1.0, 2.0)),
            test_point(),
            Duration::from_secs(10),
        );
        resolver.set_test_location(true);
        assert_eq!(resolver.resolve(Duration::ZERO).await, Ok(test_point()));

        resolver.set_test_location(false);
        assert_eq!(
            resolver.resolve(Duration::ZERO).await,
            Ok(Coordinates::new(1.0, 2.0))
        );
    }
}
