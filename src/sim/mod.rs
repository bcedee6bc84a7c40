/// Step counter for the race day.
pub mod clock;
pub mod engine;
/// Post-hoc run summary.
pub mod summary;
pub mod types;
/// Vehicle aggregate of parameters and sub-models.
pub mod vehicle;

pub use engine::Engine;
pub use summary::RunSummary;
pub use types::{MAX_STEPS, SimConfig, StepEnergy, StepRecord};
pub use vehicle::VehicleModel;
