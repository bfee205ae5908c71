//! Configuration types for loading sandbox scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`WorldConfig`]   – world dimensions, grid cell size, particle capacity
//! - [`SolverConfig`]  – substepping and the physical coefficients
//! - [`PointerConfig`] – the mouse force field
//! - [`SpawnConfig`]   – the incremental spawner
//! - [`EngineConfig`]  – worker pool on/off and thread count
//!
//! Every section and field is optional in the YAML; missing values fall
//! back to the defaults below.
//!
//! # YAML format
//! An example scenario matching these types:
//!
//! ```yaml
//! world:
//!   width: 800.0
//!   height: 800.0
//!   cell_size: 4.0        # should be >= the largest particle diameter
//!   capacity: 8000
//!
//! solver:
//!   substeps: 4
//!   iterations: 1         # collision passes per substep
//!   stiffness: 0.85       # fraction of the overlap corrected per pass
//!   damping: 0.98         # Verlet energy bleed
//!   restitution: 0.8      # wall bounce
//!   friction: 0.99        # tangential wall damping
//!   gravity: 2000.0
//!
//! pointer:
//!   strength: 5000.0
//!   radius: 100.0
//!
//! spawn:
//!   delay: 0.005          # seconds between batches
//!   radius: 2.0
//!   batch: 8              # particles per batch row
//!   speed: 500.0          # initial downward speed
//!
//! engine:
//!   parallel: true
//!   threads: null         # null = hardware concurrency, 0 = serial
//! ```

use serde::Deserialize;

/// World dimensions and broad-phase sizing
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub cell_size: f32,
    pub capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            cell_size: 4.0,
            capacity: 8000,
        }
    }
}

/// Substepping and physical coefficients
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SolverConfig {
    pub substeps: u32,
    pub iterations: u32,
    pub stiffness: f32,
    pub damping: f32,
    pub restitution: f32,
    pub friction: f32,
    pub gravity: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            substeps: 4,
            iterations: 1,
            stiffness: 0.85,
            damping: 0.98,
            restitution: 0.8,
            friction: 0.99,
            gravity: 2000.0,
        }
    }
}

/// Mouse force field
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PointerConfig {
    pub strength: f32,
    pub radius: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            strength: 5000.0,
            radius: 100.0,
        }
    }
}

/// Incremental spawner
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SpawnConfig {
    pub delay: f32,
    pub radius: f32,
    pub batch: usize,
    pub speed: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            delay: 0.005,
            radius: 2.0,
            batch: 8,
            speed: 500.0,
        }
    }
}

/// Worker pool settings
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub parallel: bool,
    pub threads: Option<usize>, // None = hardware concurrency, Some(0) = serial
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub world: WorldConfig,
    pub solver: SolverConfig,
    pub pointer: PointerConfig,
    pub spawn: SpawnConfig,
    pub engine: EngineConfig,
}
