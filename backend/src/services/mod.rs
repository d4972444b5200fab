//! Business logic services for the SmartIrrig server

pub mod scheduler;
pub mod simulation;
pub mod source;

pub use scheduler::SimulationScheduler;
pub use simulation::{Dashboard, SimulationService, SimulationStatus};
pub use source::{ReadingSource, SharedEngine};
