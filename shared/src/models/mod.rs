//! Domain models for the SmartIrrig platform

mod reading;
mod weather;
mod zone;

pub use reading::*;
pub use weather::*;
pub use zone::*;
