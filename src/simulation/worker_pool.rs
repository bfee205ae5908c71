//! Persistent worker threads for the collision passes.
//!
//! Worker state machine: idle on a condvar, wake when the generation
//! counter moves, drain the shared slice queue, decrement the active
//! counter, go back to idle. The coordinating thread blocks on a second
//! condvar until the counter hits zero, so `run_pass` is a synchronous
//! barrier and the buffers it borrows are never touched after it returns.
//!
//! There is no locking during the collision math itself. Safety comes from
//! the slice partition: a pass only ever publishes every second slice, and
//! the sweep of a slice writes at most one column past each edge, so two
//! slices of the same parity can never write to the same or to mutually
//! neighbouring cells.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crate::simulation::collision::{self, ParticleTable};
use crate::simulation::grid::SpatialGrid;
use crate::simulation::particle::Particle;

/// A contiguous range of grid columns, one unit of parallel work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub start: usize,
    pub end: usize, // exclusive
}

/// Columns per slice. Must be at least 2: the sweep of a slice writes one
/// column past each edge, and the even/odd schedule keeps same-set slices
/// apart by only a single slice.
pub const SLICE_COLS: usize = 4;

/// Cut `cols` into spans of `SLICE_COLS` and deal them into two sets by
/// parity. No two spans in the same set are adjacent, which is the whole
/// correctness argument for running one set concurrently.
pub fn partition_columns(cols: usize) -> (Vec<ColumnSpan>, Vec<ColumnSpan>) {
    let mut spans = Vec::new();
    let mut start = 0;
    while start < cols {
        let end = (start + SLICE_COLS).min(cols);
        spans.push(ColumnSpan { start, end });
        start = end;
    }

    // a trailing sliver of one column would sit too close to the span two
    // back; fold it into its predecessor
    if spans.len() >= 2 {
        let last = spans[spans.len() - 1];
        if last.end - last.start < 2 {
            spans.pop();
            if let Some(prev) = spans.last_mut() {
                prev.end = last.end;
            }
        }
    }

    let even = spans.iter().copied().step_by(2).collect();
    let odd = spans.iter().copied().skip(1).step_by(2).collect();
    (even, odd)
}

/// Everything a worker needs for one pass. The pointers are only
/// dereferenced between `run_pass` publishing the job and the completion
/// barrier releasing the coordinator, while the coordinator still holds
/// the borrows that produced them.
#[derive(Clone, Copy)]
struct PassJob {
    particles: ParticleTable,
    grid: *const SpatialGrid,
    slices: *const ColumnSpan,
    slice_count: usize,
    stiffness: f32,
}

unsafe impl Send for PassJob {}

struct PoolState {
    generation: u64,
    active: usize,
    stop: bool,
    job: Option<PassJob>,
}

struct PoolShared {
    state: Mutex<PoolState>,
    work_ready: Condvar, // workers idle here
    pass_done: Condvar,  // coordinator blocks here
    next_slice: AtomicUsize,
}

pub struct WorkerPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `threads` persistent workers (at least one)
    pub fn new(threads: usize) -> Self {
        let threads = threads.max(1);

        let shared = Arc::new(PoolShared {
            state: Mutex::new(PoolState {
                generation: 0,
                active: 0,
                stop: false,
                job: None,
            }),
            work_ready: Condvar::new(),
            pass_done: Condvar::new(),
            next_slice: AtomicUsize::new(0),
        });

        let workers = (0..threads)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || worker_loop(&shared))
            })
            .collect();

        Self { shared, workers }
    }

    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }

    /// Resolve one slice set. Publishes the job under the lock, bumps the
    /// generation, wakes every worker, and blocks until all of them have
    /// drained the slice queue.
    pub fn run_pass(
        &self,
        particles: &mut [Particle],
        grid: &SpatialGrid,
        slices: &[ColumnSpan],
        stiffness: f32,
    ) {
        if slices.is_empty() {
            return;
        }

        let job = PassJob {
            particles: ParticleTable::new(particles),
            grid,
            slices: slices.as_ptr(),
            slice_count: slices.len(),
            stiffness,
        };

        let mut state = self.shared.state.lock().unwrap();
        state.job = Some(job);
        state.generation += 1;
        state.active = self.workers.len();
        self.shared.next_slice.store(0, Ordering::Relaxed);
        drop(state);
        self.shared.work_ready.notify_all();

        let mut state = self.shared.state.lock().unwrap();
        while state.active > 0 {
            state = self.shared.pass_done.wait(state).unwrap();
        }
        // drop the dangling pointers with the borrows still alive
        state.job = None;
    }
}

impl Drop for WorkerPool {
    /// Set the stop flag, wake everyone, and join. No pass is in flight
    /// here (`run_pass` is synchronous), so no work can be claimed after
    /// the flag is visible.
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.stop = true;
        }
        self.shared.work_ready.notify_all();

        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(shared: &PoolShared) {
    let mut seen_generation = 0u64;

    loop {
        let job = {
            let mut state = shared.state.lock().unwrap();
            loop {
                if state.stop {
                    return;
                }
                if state.generation != seen_generation {
                    break;
                }
                state = shared.work_ready.wait(state).unwrap();
            }

            seen_generation = state.generation;
            let Some(job) = state.job else { continue };
            job
        };

        // drain the queue: claim slices until exhausted
        loop {
            let k = shared.next_slice.fetch_add(1, Ordering::Relaxed);
            if k >= job.slice_count {
                break;
            }

            // SAFETY: the coordinator keeps the particle and grid borrows
            // alive until the barrier below, and same-parity slices never
            // write to overlapping columns.
            unsafe {
                let span = *job.slices.add(k);
                let grid = &*job.grid;
                collision::resolve_span(job.particles, grid, span.start, span.end, job.stiffness);
            }
        }

        let mut state = shared.state.lock().unwrap();
        state.active -= 1;
        if state.active == 0 {
            shared.pass_done.notify_one();
        }
    }
}
