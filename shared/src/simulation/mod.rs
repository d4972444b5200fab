//! Zone simulation engine and its supporting pieces

mod device;
mod dynamics;
mod engine;
mod listeners;
mod seeding;

pub use device::*;
pub use dynamics::*;
pub use engine::*;
pub use listeners::*;
pub use seeding::*;
