use std::time::Instant;

use crate::simulation::input::InputState;
use crate::simulation::params::{Parameters, FIXED_DT};
use crate::simulation::particle::{Particle, Vec2f};
use crate::simulation::world::World;

/// Deterministic particle cloud, no rand needed
fn seeded_world(n: usize, parallel: bool) -> World {
    let params = Parameters {
        capacity: n,
        parallel,
        threads: None,
        ..Default::default()
    };

    let mut world = World::new(params);
    for i in 0..n {
        let i_f = i as f32;
        let x = 400.0 + (i_f * 0.37).sin() * 350.0;
        let y = 400.0 + (i_f * 0.13).cos() * 350.0;
        world.push(Particle::new(Vec2f::new(x, y), 2.0, [255, 255, 255]));
    }
    world
}

/// Full-frame throughput, serial sweep vs worker pool
pub fn bench_collision() {
    let ns = [1000, 2000, 4000, 8000, 16000];
    let input = InputState::default();

    for n in ns {
        let mut serial = seeded_world(n, false);
        let mut pooled = seeded_world(n, true);

        // Warm up
        serial.update(FIXED_DT, &input);
        pooled.update(FIXED_DT, &input);

        let t0 = Instant::now();
        serial.update(FIXED_DT, &input);
        let dt_serial = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        pooled.update(FIXED_DT, &input);
        let dt_pooled = t1.elapsed().as_secs_f64();

        println!("N = {n:5}, serial = {dt_serial:8.6} s, pooled = {dt_pooled:8.6} s");
    }
}

/// Raw integrator throughput, no grid or collisions
pub fn bench_integration() {
    let n = 16000;
    let steps = 1000;
    let gravity = Vec2f::new(0.0, 2000.0);
    let sub_dt = FIXED_DT / 4.0;

    let mut particles: Vec<Particle> = (0..n)
        .map(|i| {
            let i_f = i as f32;
            let x = 400.0 + (i_f * 0.37).sin() * 350.0;
            let y = 400.0 + (i_f * 0.13).cos() * 350.0;
            Particle::new(Vec2f::new(x, y), 2.0, [255, 255, 255])
        })
        .collect();

    let t0 = Instant::now();
    for _ in 0..steps {
        for particle in particles.iter_mut() {
            particle.accelerate(gravity);
            particle.integrate(sub_dt, 0.98);
        }
    }
    let elapsed = t0.elapsed().as_secs_f64();

    println!(
        "N = {n}, {steps} steps in {elapsed:8.6} s ({:.1} M particle-steps/s)",
        (n * steps) as f64 / elapsed / 1e6
    );
}
