//! Runtime parameter bundle for the solver.
//!
//! Built once from the YAML-facing config; everything the core consumes
//! is a plain value here. The core computes nothing from files, globals
//! or the environment.

/// Frame time step; the render loop advances the world by exactly this
pub const FIXED_DT: f32 = 1.0 / 60.0;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub width: f32,
    pub height: f32,
    pub cell_size: f32,
    pub capacity: usize, // particle count never exceeds this

    pub substeps: u32,
    pub iterations: u32, // collision passes per substep

    pub gravity: f32,     // magnitude; direction comes from input
    pub damping: f32,     // < 1, Verlet energy bleed per step
    pub restitution: f32, // wall bounce
    pub friction: f32,    // tangential wall damping
    pub stiffness: f32,   // collision correction factor in (0, 1]

    pub pointer_strength: f32,
    pub pointer_radius: f32,

    pub threads: Option<usize>, // None = hardware concurrency, Some(0) = serial
    pub parallel: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            cell_size: 4.0,
            capacity: 8000,
            substeps: 4,
            iterations: 1,
            gravity: 2000.0,
            damping: 0.98,
            restitution: 0.8,
            friction: 0.99,
            stiffness: 0.85,
            pointer_strength: 5000.0,
            pointer_radius: 100.0,
            threads: None,
            parallel: true,
        }
    }
}
