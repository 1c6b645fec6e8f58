//! Multi-stage rocket flight configuration, stage handoff, and post-processing.
//!
//! The numerical flight engine lives behind [`flight::FlightEngine`]; this crate wires
//! scenario manifests into stage setups, derives the upper stage's launch conditions at
//! separation, and renders or exports the results. Keeping the logic in a library crate
//! lets the command-line front-ends share it.

pub mod plot;

pub use staging_config as config;
pub use staging_core as core;
pub use staging_export as export;
pub use staging_flight as flight;
pub use staging_recovery as recovery;
pub use staging_trajectory as trajectory;
pub use staging_vehicle as vehicle;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
