//! External API integrations

pub mod irrigation_backend;

pub use irrigation_backend::{BackendClient, DevicePayload, PumpDecision};
