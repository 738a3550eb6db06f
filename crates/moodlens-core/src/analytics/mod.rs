//! Pure analytics computations
//!
//! Each module here is a total function over an immutable input snapshot:
//! empty input produces a well-defined zero/neutral output and nothing ever
//! raises. The four computations have no data dependency on one another and
//! the orchestrator runs them in any order.

pub mod interventions;
pub mod risk;
pub mod stability;
pub mod streak;

pub use interventions::{map_interventions, DEFAULT_RECOMMENDATION, NO_INTERVENTIONS};
pub use risk::classify_risk;
pub use stability::score_stability;
pub use streak::compute_streaks;
