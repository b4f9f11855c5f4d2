/// Marker trait for state a reducer owns.
///
/// `Default` lets callers move state out with `std::mem::take` before
/// reducing; `PartialEq` lets tests compare whole snapshots.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
