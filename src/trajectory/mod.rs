//! Trajectory core
//!
//! Milestone catalog, sampled path and the cyclic player that the viewer
//! advances on every tick. Nothing in here depends on windowing or timing.

pub mod catalog;
pub mod ephemeris;
pub mod error;
pub mod player;
pub mod sampler;

pub use catalog::{DEFAULT_EVENT_THRESHOLD_KM, EventCatalog, MilestoneEvent, YearFix};
pub use error::TrajectoryError;
pub use player::{DataSource, PlayerState, RenderMode, TickReport, TrajectoryPlayer};
pub use sampler::SampledPath;
