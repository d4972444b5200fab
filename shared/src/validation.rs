//! Validation utilities for SmartIrrig
//!
//! Range helpers used by the simulation plus checks on zone seeds loaded
//! from configuration.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::ZoneSeed;

/// Errors raised while validating zone configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Zone list is empty")]
    NoZones,

    #[error("Zone id must not be empty")]
    EmptyZoneId,

    #[error("Duplicate zone id: {0}")]
    DuplicateZoneId(String),

    #[error("Zone {zone_id}: area must be positive, got {area}")]
    InvalidArea { zone_id: String, area: f64 },

    #[error("Zone {zone_id}: {field} must be between 0 and 100, got {value}")]
    PercentOutOfRange {
        zone_id: String,
        field: &'static str,
        value: f64,
    },

    #[error("History limit must be at least 1")]
    InvalidHistoryLimit,
}

// ============================================================================
// Numeric helpers
// ============================================================================

/// Clamp a percentage to [0, 100]
pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Check that a value is a valid percentage
pub fn is_percent(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

/// Round to a fixed number of decimals
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// Zone seeds
// ============================================================================

/// Validate a single zone seed
pub fn validate_zone_seed(seed: &ZoneSeed) -> Result<(), ValidationError> {
    if seed.id.trim().is_empty() {
        return Err(ValidationError::EmptyZoneId);
    }
    if seed.area.is_nan() || seed.area <= 0.0 {
        return Err(ValidationError::InvalidArea {
            zone_id: seed.id.clone(),
            area: seed.area,
        });
    }
    for (field, value) in [("moisture", seed.moisture), ("humidity", seed.humidity)] {
        if !is_percent(value) {
            return Err(ValidationError::PercentOutOfRange {
                zone_id: seed.id.clone(),
                field,
                value,
            });
        }
    }
    Ok(())
}

/// Validate a full seed list: non-empty, valid entries, unique ids
pub fn validate_zone_seeds(seeds: &[ZoneSeed]) -> Result<(), ValidationError> {
    if seeds.is_empty() {
        return Err(ValidationError::NoZones);
    }

    let mut seen = HashSet::new();
    for seed in seeds {
        validate_zone_seed(seed)?;
        if !seen.insert(seed.id.as_str()) {
            return Err(ValidationError::DuplicateZoneId(seed.id.clone()));
        }
    }
    Ok(())
}

/// Validate the history retention window
pub fn validate_history_limit(limit: usize) -> Result<(), ValidationError> {
    if limit == 0 {
        return Err(ValidationError::InvalidHistoryLimit);
    }
    Ok(())
}
