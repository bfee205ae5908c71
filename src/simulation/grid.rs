//! Uniform spatial hash used as the collision broad-phase.
//!
//! Cells store particle indices, not particles. Buckets have a hard
//! capacity: inserting into a full bucket overwrites the last slot, an
//! accepted loss under extreme local density in exchange for bounded
//! memory and O(1) insertion. The grid is rebuilt from scratch every
//! substep, so it never holds indices from a stale particle layout.

use crate::simulation::particle::{Particle, Vec2f};

/// Hard cap on indices per cell
pub const CELL_CAPACITY: usize = 16;

/// Forward half of the 8-neighbourhood in y-down space: east, south,
/// south-east and south-west. Together with within-cell pairs this visits
/// every unordered pair of particles in adjacent cells exactly once per
/// full sweep; the other four directions are each pair's mirror.
pub const FORWARD_NEIGHBOURS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

pub struct SpatialGrid {
    cols: usize,
    rows: usize,
    cell_size: f32,
    counts: Vec<u32>, // live indices per cell
    slots: Vec<u32>,  // cols * rows * CELL_CAPACITY, bucket-major
}

impl SpatialGrid {
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        let cols = (width / cell_size).ceil().max(1.0) as usize;
        let rows = (height / cell_size).ceil().max(1.0) as usize;

        Self {
            cols,
            rows,
            cell_size,
            counts: vec![0; cols * rows],
            slots: vec![0; cols * rows * CELL_CAPACITY],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// O(cells) occupancy reset; slot contents are left behind and
    /// overwritten by the next round of insertions
    pub fn clear(&mut self) {
        self.counts.fill(0);
    }

    /// Cell coordinates for a position: floored by `cell_size`, clamped to
    /// the grid so momentarily out-of-world positions still land somewhere
    pub fn cell_of(&self, position: Vec2f) -> (usize, usize) {
        let cx = (position.x / self.cell_size).floor() as i64;
        let cy = (position.y / self.cell_size).floor() as i64;

        (
            cx.clamp(0, self.cols as i64 - 1) as usize,
            cy.clamp(0, self.rows as i64 - 1) as usize,
        )
    }

    /// Append `index` to the bucket under `position`. A full bucket keeps
    /// its count and the newcomer replaces the last slot.
    pub fn insert(&mut self, index: u32, position: Vec2f) {
        let (cx, cy) = self.cell_of(position);
        let cell = cy * self.cols + cx;

        let count = self.counts[cell] as usize;
        let slot = if count < CELL_CAPACITY {
            self.counts[cell] += 1;
            count
        } else {
            CELL_CAPACITY - 1
        };

        self.slots[cell * CELL_CAPACITY + slot] = index;
    }

    /// Live indices of one cell
    pub fn cell(&self, cx: usize, cy: usize) -> &[u32] {
        debug_assert!(cx < self.cols && cy < self.rows);
        let cell = cy * self.cols + cx;
        let count = self.counts[cell] as usize;
        &self.slots[cell * CELL_CAPACITY..cell * CELL_CAPACITY + count]
    }

    /// Clear and repopulate from the particle buffer; `slots` then hold
    /// indices into exactly this buffer until the next rebuild
    pub fn rebuild(&mut self, particles: &[Particle]) {
        self.clear();
        for (i, particle) in particles.iter().enumerate() {
            self.insert(i as u32, particle.position);
        }
    }
}
