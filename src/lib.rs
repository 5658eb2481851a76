// Week Planner Library
// Draft engine for an interactive week grid, exported for the replay binary and tests

pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{PlannerError, PlannerResult};
pub use services::draft::{DraftEngine, EngineContext, EngineWarning, Effects, InputEvent, PointerTarget};
