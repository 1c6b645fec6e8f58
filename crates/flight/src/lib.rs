//! Flight façade crate: stage sequencing, stage-separation handoff, and the engine seam.

pub mod engine;
pub mod environment;
pub mod scenario;
pub mod stages;

pub use facade::*;
pub use staging_recovery as recovery;
pub use staging_trajectory as trajectory;

mod facade;
