//! World orchestration: one `update` advances a whole frame.
//!
//! The world exclusively owns the particle buffer, the broad-phase grid
//! and (optionally) the worker pool. Substep order: apply forces,
//! integrate, rebuild the grid, run the collision passes, boundary
//! response, displacement guard. The grid's lifetime is scoped to a single
//! substep; resolving against a stale index would let fast particles
//! tunnel through each other.

use crate::simulation::collision;
use crate::simulation::forces::{ForceSet, PointerField, UniformGravity};
use crate::simulation::grid::SpatialGrid;
use crate::simulation::input::InputState;
use crate::simulation::params::Parameters;
use crate::simulation::particle::{Particle, Vec2f};
use crate::simulation::worker_pool::{partition_columns, ColumnSpan, WorkerPool};

pub struct World {
    particles: Vec<Particle>,
    grid: SpatialGrid,
    params: Parameters,
    gravity: Vec2f, // current direction * magnitude, steered by input
    pool: Option<WorkerPool>,
    even_slices: Vec<ColumnSpan>,
    odd_slices: Vec<ColumnSpan>,
}

impl World {
    pub fn new(params: Parameters) -> Self {
        let grid = SpatialGrid::new(params.width, params.height, params.cell_size);
        let (even_slices, odd_slices) = partition_columns(grid.cols());

        let pool = if params.parallel {
            let threads = params.threads.unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            });
            if threads == 0 {
                // zero concurrency requested or reported: stay on the
                // calling thread
                None
            } else {
                log::info!("collision pool: {threads} worker threads");
                Some(WorkerPool::new(threads))
            }
        } else {
            None
        };

        Self {
            particles: Vec::with_capacity(params.capacity),
            grid,
            gravity: Vec2f::new(0.0, params.gravity),
            pool,
            even_slices,
            odd_slices,
            params,
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn gravity(&self) -> Vec2f {
        self.gravity
    }

    /// Read-only view for the renderer
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.particles.len() >= self.params.capacity
    }

    /// Add a particle unless the world is at capacity
    pub fn push(&mut self, particle: Particle) -> bool {
        if self.is_full() {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Advance the simulation by one frame of `dt` seconds
    pub fn update(&mut self, dt: f32, input: &InputState) {
        if self.particles.is_empty() {
            return;
        }

        if let Some(direction) = input.gravity_direction() {
            self.gravity = direction * self.params.gravity;
        }

        let mut forces = ForceSet::new().with(UniformGravity {
            gravity: self.gravity,
        });
        if input.pointer_held {
            forces = forces.with(PointerField {
                center: input.pointer_position,
                strength: self.params.pointer_strength,
                radius: self.params.pointer_radius,
            });
        }

        let sub_dt = dt / self.params.substeps as f32;
        let padding = self.params.cell_size;
        let guard_dist2 = self.params.cell_size * self.params.cell_size;

        for _ in 0..self.params.substeps {
            forces.apply(&mut self.particles, &self.grid);

            for particle in &mut self.particles {
                particle.integrate(sub_dt, self.params.damping);
            }

            self.grid.rebuild(&self.particles);
            self.resolve_collisions();

            for particle in &mut self.particles {
                particle.apply_boundary_response(
                    self.params.width,
                    self.params.height,
                    padding,
                    self.params.restitution,
                    self.params.friction,
                );

                // a substep that moves a particle more than one cell would
                // poison the implicit velocity; settle it instead
                if particle.velocity().norm_squared() > guard_dist2 {
                    particle.prev_position = particle.position;
                }
            }
        }
    }

    fn resolve_collisions(&mut self) {
        for _ in 0..self.params.iterations {
            match &self.pool {
                Some(pool) => {
                    // even then odd, strictly in order: the second pass
                    // must see the first pass's corrections
                    pool.run_pass(
                        &mut self.particles,
                        &self.grid,
                        &self.even_slices,
                        self.params.stiffness,
                    );
                    pool.run_pass(
                        &mut self.particles,
                        &self.grid,
                        &self.odd_slices,
                        self.params.stiffness,
                    );
                }
                None => {
                    collision::resolve_serial(&mut self.particles, &self.grid, self.params.stiffness)
                }
            }
        }
    }
}
