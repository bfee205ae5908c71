use verletbox::{
    partition_columns, resolve, resolve_serial, Force, ForceSet, InputState, Parameters, Particle,
    PointerField, ScenarioConfig, SpatialGrid, SpawnConfig, Spawner, UniformGravity, Vec2f,
    WorkerPool, World, CELL_CAPACITY, FIXED_DT,
};

/// Solver parameters for deterministic single-threaded tests
pub fn test_params() -> Parameters {
    Parameters {
        parallel: false,
        ..Default::default()
    }
}

/// Resting particle helper
pub fn particle_at(x: f32, y: f32, radius: f32) -> Particle {
    Particle::new(Vec2f::new(x, y), radius, [255, 255, 255])
}

fn distance(a: &Particle, b: &Particle) -> f32 {
    (a.position - b.position).norm()
}

// ==================================================================================
// Verlet integration
// ==================================================================================

#[test]
fn integration_carries_implicit_velocity() {
    let mut p = Particle::with_velocity(Vec2f::new(100.0, 100.0), Vec2f::new(10.0, 0.0), 1.0, 2.0, [0; 3]);
    assert!((p.velocity().x - 10.0).abs() < 1e-6);

    // no damping, no forces: the displacement repeats every step
    p.integrate(1.0, 1.0);
    assert!((p.position.x - 110.0).abs() < 1e-4);
    p.integrate(1.0, 1.0);
    assert!((p.position.x - 120.0).abs() < 1e-4);
}

#[test]
fn acceleration_is_transient() {
    let mut p = particle_at(100.0, 100.0, 2.0);
    p.accelerate(Vec2f::new(0.0, 2000.0));
    p.accelerate(Vec2f::new(0.0, 2000.0));
    assert!((p.acceleration.y - 4000.0).abs() < 1e-6, "accelerate accumulates");

    p.integrate(0.1, 1.0);
    assert_eq!(p.acceleration, Vec2f::zeros(), "integrate clears the accumulator");
    assert!(p.position.y > 100.0, "the accumulated force moved the particle");
}

#[test]
fn damping_bleeds_velocity() {
    let mut p = Particle::with_velocity(Vec2f::new(100.0, 100.0), Vec2f::new(8.0, 0.0), 1.0, 2.0, [0; 3]);
    p.integrate(1.0, 0.5);
    assert!((p.velocity().x - 4.0).abs() < 1e-4);
}

// ==================================================================================
// Boundary response
// ==================================================================================

#[test]
fn floor_bounce_reflects_and_damps() {
    // particle at (400, 790), r = 10, in an 800x800 world, falling at 50/step
    let mut p = particle_at(400.0, 790.0, 10.0);
    p.prev_position = Vec2f::new(400.0, 740.0);

    p.apply_boundary_response(800.0, 800.0, 10.0, 0.8, 1.0);

    assert!((p.position.y - 790.0).abs() < 1e-6, "clamped to the padded floor");
    let v = p.velocity();
    assert!((v.y + 40.0).abs() < 1e-4, "reflected and damped: expected -40, got {}", v.y);
    assert!(v.x.abs() < 1e-6);
}

#[test]
fn wall_friction_damps_tangential_component() {
    let mut p = particle_at(400.0, 797.0, 2.0);
    p.prev_position = Vec2f::new(390.0, 787.0); // moving (10, 10) into the floor

    p.apply_boundary_response(800.0, 800.0, 4.0, 0.5, 0.9);

    let v = p.velocity();
    assert!((v.y + 5.0).abs() < 1e-4, "normal component reflected and halved");
    assert!((v.x - 9.0).abs() < 1e-4, "tangential component only rubbed down");
}

#[test]
fn boundary_response_is_idempotent_inside_bounds() {
    let mut p = Particle::with_velocity(Vec2f::new(400.0, 400.0), Vec2f::new(3.0, -2.0), 1.0, 2.0, [0; 3]);
    let before = p.clone();

    p.apply_boundary_response(800.0, 800.0, 4.0, 0.8, 0.99);

    assert_eq!(p.position, before.position);
    assert_eq!(p.prev_position, before.prev_position);
}

#[test]
fn bounce_heights_decay_under_gravity() {
    let gravity = Vec2f::new(0.0, 2000.0);
    let dt = 1.0 / 240.0;
    let mut p = particle_at(400.0, 400.0, 2.0);

    // y grows downward: an apex is a local minimum of y
    let mut apexes: Vec<f32> = Vec::new();
    let mut prev_vy = 0.0f32;

    for _ in 0..20000 {
        p.accelerate(gravity);
        p.integrate(dt, 1.0);
        p.apply_boundary_response(800.0, 800.0, 4.0, 0.8, 0.99);

        let vy = p.velocity().y;
        if prev_vy < 0.0 && vy >= 0.0 {
            apexes.push(p.position.y);
        }
        prev_vy = vy;
    }

    // ignore the micro-bounces of resting contact, they sit within one
    // integration step of the floor
    let significant: Vec<f32> = apexes.into_iter().filter(|&y| y < 795.0).collect();

    assert!(significant.len() >= 3, "expected several bounces, got {}", significant.len());
    for pair in significant.windows(2) {
        assert!(
            pair[1] > pair[0] - 0.05,
            "bounce height did not decay: {} then {}",
            pair[0],
            pair[1]
        );
    }
    assert!(p.velocity().y.abs() < 1.0, "vertical speed should die out");
}

#[test]
fn world_contains_violent_particles() {
    let params = test_params();
    let (width, height, padding) = (params.width, params.height, params.cell_size);
    let mut world = World::new(params);
    let sub_dt = FIXED_DT / 4.0;

    for i in 0..50 {
        let angle = i as f32 * 0.7;
        let velocity = Vec2f::new(angle.cos(), angle.sin()) * 3000.0;
        world.push(Particle::with_velocity(
            Vec2f::new(400.0, 400.0) + Vec2f::new(angle.sin(), angle.cos()) * 50.0,
            velocity,
            sub_dt,
            2.0,
            [0; 3],
        ));
    }

    let input = InputState::default();
    for _ in 0..120 {
        world.update(FIXED_DT, &input);
    }

    for p in world.particles() {
        assert!(p.position.x >= padding - 1e-3 && p.position.x <= width - padding + 1e-3);
        assert!(p.position.y >= padding - 1e-3 && p.position.y <= height - padding + 1e-3);
    }
}

// ==================================================================================
// Collision resolution
// ==================================================================================

#[test]
fn resolve_separates_overlapping_pair_exactly() {
    let mut a = particle_at(100.0, 100.0, 5.0);
    let mut b = particle_at(106.0, 100.0, 5.0);

    resolve(&mut a, &mut b, 1.0);

    assert!((a.position.x - 98.0).abs() < 1e-4, "a pushed 2 units left, got {}", a.position.x);
    assert!((b.position.x - 108.0).abs() < 1e-4, "b pushed 2 units right, got {}", b.position.x);
    assert!((distance(&a, &b) - 10.0).abs() < 1e-4, "final distance equals the radii sum");
}

#[test]
fn resolve_never_increases_overlap() {
    for (dx, dy, stiffness) in [
        (1.0f32, 0.5f32, 0.25f32),
        (0.5, 2.0, 0.5),
        (3.0, 1.0, 0.85),
        (0.1, 0.1, 1.0),
    ] {
        let mut a = particle_at(200.0, 200.0, 3.0);
        let mut b = particle_at(200.0 + dx, 200.0 + dy, 3.0);
        let before = distance(&a, &b);

        resolve(&mut a, &mut b, stiffness);

        let after = distance(&a, &b);
        assert!(after >= before - 1e-6, "separation is monotonic");
        assert!(after <= 6.0 + 1e-4, "no overshoot past contact for stiffness <= 1");
    }
}

#[test]
fn resolve_leaves_separated_pair_alone() {
    let mut a = particle_at(100.0, 100.0, 3.0);
    let mut b = particle_at(110.0, 100.0, 3.0);

    resolve(&mut a, &mut b, 1.0);

    assert_eq!(a.position, Vec2f::new(100.0, 100.0));
    assert_eq!(b.position, Vec2f::new(110.0, 100.0));
}

#[test]
fn coincident_particles_still_separate() {
    let mut a = particle_at(50.0, 50.0, 3.0);
    let mut b = particle_at(50.0, 50.0, 3.0);

    resolve(&mut a, &mut b, 1.0);

    let d = distance(&a, &b);
    assert!(d > 0.0, "a substitute normal must break the tie");
    assert!(d <= 6.0 + 1e-4);
}

// ==================================================================================
// Spatial grid
// ==================================================================================

#[test]
fn rebuild_assigns_exactly_one_cell_per_particle() {
    let mut grid = SpatialGrid::new(800.0, 800.0, 4.0);
    let particles = vec![
        particle_at(0.0, 0.0, 2.0),
        particle_at(3.9, 3.9, 2.0),
        particle_at(4.0, 4.0, 2.0),
        particle_at(421.7, 73.2, 2.0),
        particle_at(799.9, 799.9, 2.0),
        particle_at(-5.0, 900.0, 2.0), // clamped into the grid
    ];

    grid.rebuild(&particles);

    let mut seen = vec![0usize; particles.len()];
    for cy in 0..grid.rows() {
        for cx in 0..grid.cols() {
            for &index in grid.cell(cx, cy) {
                seen[index as usize] += 1;

                let expected = grid.cell_of(particles[index as usize].position);
                assert_eq!((cx, cy), expected, "index lives in its floored cell");
            }
        }
    }
    assert!(seen.iter().all(|&n| n == 1), "each index appears exactly once: {seen:?}");
}

#[test]
fn cell_of_floors_and_clamps() {
    let grid = SpatialGrid::new(800.0, 800.0, 4.0);

    assert_eq!(grid.cell_of(Vec2f::new(0.0, 0.0)), (0, 0));
    assert_eq!(grid.cell_of(Vec2f::new(7.9, 8.0)), (1, 2));
    assert_eq!(grid.cell_of(Vec2f::new(-50.0, 400.0)), (0, 100));
    assert_eq!(grid.cell_of(Vec2f::new(9000.0, 799.9)), (grid.cols() - 1, 199));
}

#[test]
fn full_bucket_overwrites_last_slot() {
    let mut grid = SpatialGrid::new(800.0, 800.0, 4.0);
    let position = Vec2f::new(100.0, 100.0);

    let total = CELL_CAPACITY as u32 + 3;
    for index in 0..total {
        grid.insert(index, position);
    }

    let (cx, cy) = grid.cell_of(position);
    let cell = grid.cell(cx, cy);

    assert_eq!(cell.len(), CELL_CAPACITY, "count stays pinned at capacity");
    assert_eq!(cell[CELL_CAPACITY - 1], total - 1, "newest index wins the last slot");
    for (slot, &index) in cell[..CELL_CAPACITY - 1].iter().enumerate() {
        assert_eq!(index, slot as u32, "earlier slots are untouched");
    }
}

// ==================================================================================
// Column partitioning
// ==================================================================================

#[test]
fn partition_covers_all_columns_once() {
    for cols in [1usize, 2, 3, 4, 5, 7, 8, 9, 13, 200] {
        let (even, odd) = partition_columns(cols);

        let mut covered = vec![0usize; cols];
        for span in even.iter().chain(odd.iter()) {
            assert!(span.start < span.end && span.end <= cols);
            for c in span.start..span.end {
                covered[c] += 1;
            }
        }
        assert!(
            covered.iter().all(|&n| n == 1),
            "cols = {cols}: every column in exactly one span"
        );
    }
}

#[test]
fn same_parity_spans_keep_a_two_column_gap() {
    for cols in [8usize, 9, 13, 50, 200, 203] {
        let (even, odd) = partition_columns(cols);

        for set in [&even, &odd] {
            for pair in set.windows(2) {
                assert!(
                    pair[1].start >= pair[0].end + 2,
                    "cols = {cols}: same-set spans {:?} and {:?} write-overlap",
                    pair[0],
                    pair[1]
                );
            }
        }
    }
}

// ==================================================================================
// Worker pool
// ==================================================================================

/// Overlapping pairs spread far apart, so pair order cannot influence the
/// outcome and serial and pooled passes must agree exactly
fn isolated_pairs() -> Vec<Particle> {
    let mut particles = Vec::new();
    for k in 0..40 {
        let x = 20.0 + (k % 8) as f32 * 96.0;
        let y = 20.0 + (k / 8) as f32 * 96.0;
        particles.push(particle_at(x, y, 3.0));
        particles.push(particle_at(x + 4.0, y, 3.0));
    }
    particles
}

#[test]
fn pooled_pass_matches_serial_pass() {
    let mut grid = SpatialGrid::new(800.0, 800.0, 4.0);

    let mut serial = isolated_pairs();
    grid.rebuild(&serial);
    resolve_serial(&mut serial, &grid, 0.85);

    let mut pooled = isolated_pairs();
    grid.rebuild(&pooled);
    let (even, odd) = partition_columns(grid.cols());
    let pool = WorkerPool::new(4);
    pool.run_pass(&mut pooled, &grid, &even, 0.85);
    pool.run_pass(&mut pooled, &grid, &odd, 0.85);

    for (a, b) in serial.iter().zip(pooled.iter()) {
        assert!(
            (a.position - b.position).norm() < 1e-6,
            "serial {:?} vs pooled {:?}",
            a.position,
            b.position
        );
    }
}

#[test]
fn pool_converges_over_repeated_passes() {
    let mut grid = SpatialGrid::new(800.0, 800.0, 4.0);
    let mut particles = vec![particle_at(400.0, 400.0, 3.0), particle_at(402.0, 400.0, 3.0)];

    let pool = WorkerPool::new(2);
    assert_eq!(pool.thread_count(), 2);
    let (even, odd) = partition_columns(grid.cols());

    for _ in 0..100 {
        grid.rebuild(&particles);
        pool.run_pass(&mut particles, &grid, &even, 0.85);
        pool.run_pass(&mut particles, &grid, &odd, 0.85);
    }

    let d = distance(&particles[0], &particles[1]);
    assert!((d - 6.0).abs() < 1e-3, "pairs relax to contact distance, got {d}");
    // pool joins its workers on drop
}

#[test]
fn parallel_world_resolves_and_contains() {
    let params = Parameters {
        parallel: true,
        threads: Some(2),
        capacity: 100,
        gravity: 0.0, // keep the pairs where they were placed
        ..Default::default()
    };
    let mut world = World::new(params);

    for p in isolated_pairs() {
        world.push(p);
    }

    let input = InputState::default();
    for _ in 0..30 {
        world.update(FIXED_DT, &input);
    }

    let particles = world.particles();
    for pair in particles.chunks(2) {
        let d = distance(&pair[0], &pair[1]);
        assert!(d >= 6.0 - 0.2, "pair still overlapping after 30 frames: {d}");
    }
}

// ==================================================================================
// Forces
// ==================================================================================

#[test]
fn force_terms_accumulate() {
    let grid = SpatialGrid::new(800.0, 800.0, 4.0);
    let mut particles = vec![particle_at(100.0, 100.0, 2.0)];

    let forces = ForceSet::new()
        .with(UniformGravity { gravity: Vec2f::new(0.0, 100.0) })
        .with(UniformGravity { gravity: Vec2f::new(50.0, 0.0) });
    forces.apply(&mut particles, &grid);

    assert!((particles[0].acceleration - Vec2f::new(50.0, 100.0)).norm() < 1e-6);
}

#[test]
fn pointer_field_respects_its_radius() {
    let mut grid = SpatialGrid::new(800.0, 800.0, 4.0);
    let mut particles = vec![particle_at(100.0, 100.0, 2.0), particle_at(400.0, 400.0, 2.0)];
    grid.rebuild(&particles);

    let field = PointerField {
        center: Vec2f::new(110.0, 100.0),
        strength: 5000.0,
        radius: 100.0,
    };
    field.apply(&mut particles, &grid);

    assert!(particles[0].acceleration.x > 0.0, "nearby particle pulled toward the pointer");
    assert!(particles[0].acceleration.norm() > 0.0);
    assert_eq!(particles[1].acceleration, Vec2f::zeros(), "distant particle unaffected");
}

#[test]
fn arrows_steer_gravity() {
    let mut world = World::new(test_params());
    world.push(particle_at(400.0, 400.0, 2.0));

    let input = InputState {
        left: true,
        ..Default::default()
    };
    world.update(FIXED_DT, &input);

    assert!(world.gravity().x < 0.0, "gravity swung to the left");
    assert!(world.particles()[0].velocity().x < 0.0);
    assert!(world.particles()[0].velocity().y.abs() < 1e-4);
}

#[test]
fn runaway_displacement_is_settled() {
    let params = test_params();
    let cell_size = params.cell_size;
    let mut world = World::new(params);
    let sub_dt = FIXED_DT / 4.0;

    // 10 px per substep, well past the one-cell guard
    world.push(Particle::with_velocity(
        Vec2f::new(400.0, 400.0),
        Vec2f::new(2400.0, 0.0),
        sub_dt,
        2.0,
        [0; 3],
    ));

    world.update(FIXED_DT, &InputState::default());

    let p = &world.particles()[0];
    assert!(
        p.velocity().norm() < cell_size,
        "guard snapped the implicit velocity, got {}",
        p.velocity().norm()
    );
}

// ==================================================================================
// Spawner and configuration
// ==================================================================================

#[test]
fn spawner_fills_to_capacity_and_stops() {
    let params = Parameters {
        capacity: 10,
        parallel: false,
        ..Default::default()
    };
    let mut world = World::new(params);

    let cfg = SpawnConfig {
        delay: 0.0,
        radius: 2.0,
        batch: 4,
        speed: 500.0,
    };
    let mut spawner = Spawner::new(&cfg, 800.0, FIXED_DT / 4.0, None);

    for _ in 0..10 {
        spawner.update(FIXED_DT, &mut world);
    }

    assert_eq!(world.len(), 10, "spawner stops exactly at capacity");
    for p in world.particles() {
        assert!(p.velocity().y > 0.0, "spawned particles launch downward");
        assert!((p.radius - 2.0).abs() < 1e-6);
    }
}

#[test]
fn spawner_hands_out_seeded_colors_in_order() {
    let params = Parameters {
        capacity: 10,
        parallel: false,
        ..Default::default()
    };
    let mut world = World::new(params);

    let cfg = SpawnConfig {
        delay: 0.0,
        radius: 2.0,
        batch: 1,
        speed: 500.0,
    };
    let seeded = vec![[1, 2, 3], [4, 5, 6]];
    let mut spawner = Spawner::new(&cfg, 800.0, FIXED_DT / 4.0, Some(seeded));

    for _ in 0..3 {
        spawner.update(FIXED_DT, &mut world);
    }

    assert_eq!(world.particles()[0].color, [1, 2, 3]);
    assert_eq!(world.particles()[1].color, [4, 5, 6]);
    // third particle fell off the seed list and got a random batch color
    assert_eq!(world.len(), 3);
}

#[test]
fn partial_yaml_falls_back_to_defaults() {
    let yaml = "world:\n  width: 400.0\n  capacity: 100\nsolver:\n  substeps: 2\n";
    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(cfg.world.width, 400.0);
    assert_eq!(cfg.world.capacity, 100);
    assert_eq!(cfg.world.height, 800.0, "missing field -> default");
    assert_eq!(cfg.solver.substeps, 2);
    assert!((cfg.solver.stiffness - 0.85).abs() < 1e-6);
    assert!(cfg.engine.parallel);
    assert_eq!(cfg.engine.threads, None);
}
