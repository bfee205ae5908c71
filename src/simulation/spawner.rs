//! Incremental particle spawner.
//!
//! Emits a horizontal row of particles on a timer until the world is at
//! capacity. The launch velocity's x component sweeps side to side so the
//! stream fans out instead of stacking into a column. Colors come from the
//! image seed when one is loaded, otherwise each batch gets a random RGB.

use rand::Rng;

use crate::configuration::config::SpawnConfig;
use crate::simulation::particle::{Particle, Vec2f};
use crate::simulation::world::World;

const SWEEP_STEP: f32 = 25.0;
const SWEEP_LIMIT: f32 = 500.0;
const ROW_SPACING: f32 = 10.0;

pub struct Spawner {
    delay: f32,
    accum: f32,
    radius: f32,
    batch: usize,
    sub_dt: f32, // velocity encoding step, dt / substeps
    start_pos: Vec2f,
    velocity: Vec2f,
    sweep_up: bool,
    target_colors: Option<Vec<[u8; 3]>>,
}

impl Spawner {
    pub fn new(
        config: &SpawnConfig,
        world_width: f32,
        sub_dt: f32,
        target_colors: Option<Vec<[u8; 3]>>,
    ) -> Self {
        Self {
            delay: config.delay,
            accum: 0.0,
            radius: config.radius,
            batch: config.batch.max(1),
            sub_dt,
            start_pos: Vec2f::new(world_width / 2.0, 10.0),
            velocity: Vec2f::new(0.0, config.speed),
            sweep_up: true,
            target_colors,
        }
    }

    /// Spawn a batch if the delay elapsed and the world has room
    pub fn update(&mut self, dt: f32, world: &mut World) {
        self.accum += dt;
        if self.accum < self.delay || world.is_full() {
            return;
        }
        self.accum = 0.0;

        let mut rng = rand::thread_rng();
        let batch_color: [u8; 3] = [rng.gen(), rng.gen(), rng.gen()];
        let mut offset_x = -(self.batch as f32) * ROW_SPACING / 2.0;

        for _ in 0..self.batch {
            if world.is_full() {
                break;
            }

            let color = self.color_for(world.len(), batch_color);
            let position = self.start_pos + Vec2f::new(offset_x, 0.0);
            world.push(Particle::with_velocity(
                position,
                self.velocity,
                self.sub_dt,
                self.radius,
                color,
            ));

            offset_x += ROW_SPACING;
        }

        self.sweep_velocity();
    }

    /// Seeded color for this spawn index, or the batch fallback
    fn color_for(&self, index: usize, fallback: [u8; 3]) -> [u8; 3] {
        self.target_colors
            .as_ref()
            .and_then(|colors| colors.get(index).copied())
            .unwrap_or(fallback)
    }

    /// Walk the launch velocity's x component between the sweep limits
    fn sweep_velocity(&mut self) {
        if self.sweep_up {
            if self.velocity.x + SWEEP_STEP < SWEEP_LIMIT {
                self.velocity.x += SWEEP_STEP;
            } else {
                self.velocity.x = SWEEP_LIMIT;
                self.sweep_up = false;
            }
        } else if self.velocity.x - SWEEP_STEP > -SWEEP_LIMIT {
            self.velocity.x -= SWEEP_STEP;
        } else {
            self.velocity.x = -SWEEP_LIMIT;
            self.sweep_up = true;
        }
    }
}
