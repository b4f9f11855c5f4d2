//! Refresh cycle: location → discovery → arrival fan-out → state.
//!
//! ```text
//! Idle ─→ Resolving ─→ Discovering ─→ FetchingArrivals ─→ Idle
//!            │              │
//!            └──── error ───┴──────────────────────────→ Idle
//! ```
//!
//! Per-stop arrival failures never leave `FetchingArrivals` as an error;
//! they become empty arrival lists for that stop.

mod orchestrator;
mod publisher;
mod runner;
mod settle;

pub use orchestrator::{
    RefreshOrchestrator, DISCOVERING_MESSAGE, FETCHING_MESSAGE, LOCATING_MESSAGE,
};
pub use publisher::StatePublisher;
pub use runner::{RefreshCommand, RefreshRunner};
pub use settle::settle_all;
