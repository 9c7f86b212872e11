//! Scenario loading and configuration.
//!
//! Scenarios script a session from the outside: which map to generate,
//! what the player builds and deletes, how time advances, and at what
//! speed. They exercise exactly the frame inputs the UI layer would
//! produce.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use basedef_core::prelude::{BuildingKind, GenerationConfig, TimeScale};

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

/// One scripted player action or time step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScenarioStep {
    /// Request a building placement at a tile.
    Place {
        /// Kind to build.
        kind: BuildingKind,
        /// Target column.
        x: i32,
        /// Target row.
        y: i32,
    },
    /// Request a deletion at a tile.
    Delete {
        /// Target column.
        x: i32,
        /// Target row.
        y: i32,
    },
    /// Select a simulation speed.
    SetSpeed(TimeScale),
    /// Let simulated time pass, delivered to the session in frame-sized
    /// slices so the one-tick-per-frame rule applies.
    Advance {
        /// Seconds of real time to elapse.
        seconds: f64,
    },
}

/// A complete scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Map generation settings.
    pub generation: GenerationConfig,
    /// Scripted steps, executed in order.
    pub script: Vec<ScenarioStep>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::sandbox()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let scenario: Scenario = ron::from_str(&contents)?;
        Ok(scenario)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// A small built-in scenario: base, relay, gold mine, one minute of
    /// harvesting at triple speed.
    #[must_use]
    pub fn sandbox() -> Self {
        Self {
            name: "Sandbox".to_string(),
            description: "Base, one relay, and a minute of harvesting".to_string(),
            generation: GenerationConfig::new_game(),
            script: vec![
                ScenarioStep::Place {
                    kind: BuildingKind::Base,
                    x: 20,
                    y: 20,
                },
                ScenarioStep::Place {
                    kind: BuildingKind::Transporter,
                    x: 24,
                    y: 20,
                },
                ScenarioStep::SetSpeed(TimeScale::Fast),
                ScenarioStep::Advance { seconds: 60.0 },
            ],
        }
    }
}
