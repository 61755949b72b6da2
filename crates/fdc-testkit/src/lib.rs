//! fdc-testkit
//!
//! Shared fixtures and scripted session replay for cart scenarios.

pub mod fixtures;

mod replay;
mod script;

pub use replay::{replay, IntegrityFailure, ReplayReport, StepRecord};
pub use script::{Script, ScriptError, ScriptFormat};
