/// Marker trait for intents: refresh-cycle events and dialog input.
pub trait Intent: Send + 'static {}
