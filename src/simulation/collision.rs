//! Narrow-phase collision resolution.
//!
//! `resolve` is a purely positional correction: overlapping particles are
//! pushed apart along their centre line, scaled by a stiffness factor so a
//! single pass does not overcorrect. Repeated across substeps this relaxes
//! toward a non-overlapping configuration (Gauss-Seidel style); the exact
//! converged positions depend on pair visitation order under tight packing,
//! which is why the sweep order is fixed.
//!
//! The column sweep kernel is shared by the serial path and the worker
//! pool. The pool relies on the even/odd slice partition for disjoint
//! writes; the kernel itself never synchronizes.

use crate::simulation::grid::{SpatialGrid, FORWARD_NEIGHBOURS};
use crate::simulation::particle::{Particle, Vec2f};

/// Below this squared distance two centres count as coincident
const DEGENERATE_DIST2: f32 = 1e-12;

/// Push two overlapping particles apart along their centre line.
///
/// Non-overlapping pairs are untouched. Coincident centres get an
/// arbitrary unit normal instead of a division by zero, so stacked
/// particles still separate.
pub fn resolve(a: &mut Particle, b: &mut Particle, stiffness: f32) {
    let delta = a.position - b.position;
    let dist2 = delta.norm_squared();
    let min_dist = a.radius + b.radius;

    let (dist, normal) = if dist2 < DEGENERATE_DIST2 {
        (0.0, Vec2f::new(1.0, 0.0))
    } else {
        if dist2 >= min_dist * min_dist {
            return;
        }
        let dist = dist2.sqrt();
        (dist, delta / dist)
    };

    let correction = (min_dist - dist) * 0.5 * stiffness;
    a.position += normal * correction;
    b.position -= normal * correction;
}

/// Raw view of the particle buffer for the column sweep.
///
/// Hands out `&mut` pairs by index without borrow tracking; the sweep's
/// slice partition is what guarantees no two threads reach the same
/// particle.
#[derive(Clone, Copy)]
pub(crate) struct ParticleTable {
    ptr: *mut Particle,
    len: usize,
}

unsafe impl Send for ParticleTable {}
unsafe impl Sync for ParticleTable {}

impl ParticleTable {
    pub(crate) fn new(particles: &mut [Particle]) -> Self {
        Self {
            ptr: particles.as_mut_ptr(),
            len: particles.len(),
        }
    }

    /// # Safety
    /// `i != j`, both in bounds, and no other thread may touch either
    /// particle while the returned borrows live.
    unsafe fn pair(&self, i: usize, j: usize) -> (&mut Particle, &mut Particle) {
        debug_assert!(i != j && i < self.len && j < self.len);
        (&mut *self.ptr.add(i), &mut *self.ptr.add(j))
    }
}

/// Sweep the cells of columns `[start, end)` and resolve every candidate
/// pair once: pairs within each cell, then each cell against its forward
/// neighbours.
///
/// # Safety
/// The caller must have exclusive access to every particle indexed by
/// columns `start - 1 ..= end` of `grid` for the duration of the call, and
/// `grid` must have been rebuilt from the buffer behind `table`.
pub(crate) unsafe fn resolve_span(
    table: ParticleTable,
    grid: &SpatialGrid,
    start: usize,
    end: usize,
    stiffness: f32,
) {
    for cx in start..end {
        for cy in 0..grid.rows() {
            let cell = grid.cell(cx, cy);
            if cell.is_empty() {
                continue;
            }

            for i in 0..cell.len() {
                for j in (i + 1)..cell.len() {
                    let (a, b) = table.pair(cell[i] as usize, cell[j] as usize);
                    resolve(a, b, stiffness);
                }
            }

            for (dx, dy) in FORWARD_NEIGHBOURS {
                let nx = cx as i32 + dx;
                let ny = cy as i32 + dy;
                if nx < 0 || ny < 0 || nx >= grid.cols() as i32 || ny >= grid.rows() as i32 {
                    continue;
                }

                let neighbour = grid.cell(nx as usize, ny as usize);
                for &ai in cell {
                    for &bi in neighbour {
                        let (a, b) = table.pair(ai as usize, bi as usize);
                        resolve(a, b, stiffness);
                    }
                }
            }
        }
    }
}

/// Full-grid sweep on the calling thread
pub fn resolve_serial(particles: &mut [Particle], grid: &SpatialGrid, stiffness: f32) {
    let table = ParticleTable::new(particles);
    // SAFETY: exclusive borrow of the whole buffer, single thread
    unsafe { resolve_span(table, grid, 0, grid.cols(), stiffness) };
}
