//! Shared types and simulation core for the SmartIrrig platform
//!
//! This crate contains the zone/reading models, the zone simulation engine
//! and the rule-based advisor shared between the backend service and the
//! in-browser dashboard (via WASM).

pub mod advisor;
pub mod models;
pub mod simulation;
pub mod types;
pub mod validation;

pub use advisor::*;
pub use models::*;
pub use simulation::*;
pub use types::*;
pub use validation::*;
