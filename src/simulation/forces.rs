//! Force terms applied before integration.
//!
//! Each term implements [`Force`] and accumulates into
//! `Particle::acceleration`; a [`ForceSet`] is assembled per frame from
//! the input snapshot. Gravity is explicit state handed in by the caller,
//! never a global, so tests can inject arbitrary force terms.

use crate::simulation::grid::SpatialGrid;
use crate::simulation::particle::{Particle, Vec2f};

/// A force contributor for one substep
pub trait Force {
    fn apply(&self, particles: &mut [Particle], grid: &SpatialGrid);
}

/// Ordered collection of force terms
pub struct ForceSet {
    terms: Vec<Box<dyn Force + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a force term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Force + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Accumulate every term into the particles' accelerations
    pub fn apply(&self, particles: &mut [Particle], grid: &SpatialGrid) {
        for term in &self.terms {
            term.apply(particles, grid);
        }
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Constant acceleration on every particle
pub struct UniformGravity {
    pub gravity: Vec2f,
}

impl Force for UniformGravity {
    fn apply(&self, particles: &mut [Particle], _grid: &SpatialGrid) {
        for particle in particles.iter_mut() {
            particle.accelerate(self.gravity);
        }
    }
}

/// Radial attractor around the pointer.
///
/// Walks only the grid cells within `radius` of the centre, so the cost
/// scales with the particles actually affected rather than with N. Uses
/// whatever grid the previous substep built; a particle spawned since then
/// is simply missed for one substep.
pub struct PointerField {
    pub center: Vec2f,
    pub strength: f32,
    pub radius: f32,
}

impl Force for PointerField {
    fn apply(&self, particles: &mut [Particle], grid: &SpatialGrid) {
        let (ccx, ccy) = grid.cell_of(self.center);
        let reach = (self.radius / grid.cell_size()) as usize + 1;

        let x0 = ccx.saturating_sub(reach);
        let y0 = ccy.saturating_sub(reach);
        let x1 = (ccx + reach).min(grid.cols() - 1);
        let y1 = (ccy + reach).min(grid.rows() - 1);

        for cy in y0..=y1 {
            for cx in x0..=x1 {
                for &index in grid.cell(cx, cy) {
                    let particle = &mut particles[index as usize];

                    let dir = self.center - particle.position;
                    let dist2 = dir.norm_squared();
                    if dist2 > self.radius * self.radius || dist2 < 1e-3 {
                        continue;
                    }

                    let dist = dist2.sqrt();
                    particle.accelerate(dir * (self.strength / dist));
                }
            }
        }
    }
}
