//! Build a fully-initialized scenario from configuration.
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! containing:
//! - solver parameters (`Parameters`)
//! - the world itself (particle buffer, grid, optional worker pool)
//! - the spawner, seeded with image target colors when available
//!
//! The scenario is inserted into Bevy as a `Resource` and consumed by the
//! input, spawn, physics and rendering systems.

use bevy::prelude::Resource;

use crate::configuration::config::ScenarioConfig;
use crate::io::image_seed;
use crate::simulation::params::{Parameters, FIXED_DT};
use crate::simulation::spawner::Spawner;
use crate::simulation::world::World;

/// Runtime bundle for one sandbox run
#[derive(Resource)]
pub struct Scenario {
    pub parameters: Parameters,
    pub world: World,
    pub spawner: Spawner,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        // Parameters (runtime) from the config sections
        let parameters = Parameters {
            width: cfg.world.width,
            height: cfg.world.height,
            cell_size: cfg.world.cell_size,
            capacity: cfg.world.capacity,
            substeps: cfg.solver.substeps.max(1),
            iterations: cfg.solver.iterations.max(1),
            gravity: cfg.solver.gravity,
            damping: cfg.solver.damping,
            restitution: cfg.solver.restitution,
            friction: cfg.solver.friction,
            stiffness: cfg.solver.stiffness,
            pointer_strength: cfg.pointer.strength,
            pointer_radius: cfg.pointer.radius,
            threads: cfg.engine.threads,
            parallel: cfg.engine.parallel,
        };

        // Optional deterministic recoloring from a previous run
        let target_colors = image_seed::load_target_colors(
            parameters.width as u32,
            parameters.height as u32,
            parameters.capacity,
        );
        if let Some(colors) = &target_colors {
            log::info!("seeded {} target colors from assets image", colors.len());
        }

        let sub_dt = FIXED_DT / parameters.substeps as f32;
        let world = World::new(parameters.clone());
        let spawner = Spawner::new(&cfg.spawn, parameters.width, sub_dt, target_colors);

        Self {
            parameters,
            world,
            spawner,
        }
    }
}
