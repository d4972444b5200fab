//! HTTP handlers for the SmartIrrig API

pub mod health;
pub mod simulation;
pub mod weather;
pub mod zones;

pub use health::*;
pub use simulation::*;
pub use weather::*;
pub use zones::*;
