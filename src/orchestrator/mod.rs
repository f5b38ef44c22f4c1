mod error;
mod orchestrator;
mod presets;
mod tle;

pub use error::CommandError;
pub use orchestrator::{Action, OrbitApplyOutcome, Orchestrator};
pub use presets::PendingOrbitParams;
