//! Engine configuration.
//!
//! [`EngineConfig`] has sensible defaults (60 Hz, downward gravity, the
//! stock layer matrix) and can also be loaded from JSON:
//!
//! ```
//! use tessel_engine::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{
//!     "fixed_dt": 0.02,
//!     "physics": { "gravity": 1200.0 }
//! }"#).unwrap();
//!
//! assert_eq!(config.fixed_dt, 0.02);
//! assert_eq!(config.physics.gravity, 1200.0);
//! assert_eq!(config.physics.max_fall_speed, 600.0);
//! ```

use serde::{Deserialize, Serialize};
use tessel_entity::layer::LayerMatrix;

use crate::EngineError;

// ---------------------------------------------------------------------------
// PhysicsConfig
// ---------------------------------------------------------------------------

/// Tunables for the physics pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in px/s² applied to bodies with `gravity` set.
    pub gravity: f64,
    /// Cap on downward speed in px/s for gravity-affected bodies.
    pub max_fall_speed: f64,
    /// Which layer pairs are tested for entity-entity contact.
    pub layers: LayerMatrix,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 980.0,
            max_fall_speed: 600.0,
            layers: LayerMatrix::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Configuration for the frame driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed time step in seconds per frame. Must be positive and finite.
    pub fixed_dt: f64,
    /// Headless mode: render passes are skipped.
    pub headless: bool,
    /// Physics tunables.
    pub physics: PhysicsConfig,
}

impl Default for EngineConfig {
    /// 60 Hz, headless off.
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            headless: false,
            physics: PhysicsConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.fixed_dt > 0.0 && self.fixed_dt.is_finite()) {
            return Err(EngineError::InvalidConfig(format!(
                "fixed_dt must be positive and finite, got {}",
                self.fixed_dt
            )));
        }
        if !self.physics.gravity.is_finite() {
            return Err(EngineError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.physics.gravity
            )));
        }
        if !(self.physics.max_fall_speed > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "max_fall_speed must be positive, got {}",
                self.physics.max_fall_speed
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
