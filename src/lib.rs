pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod io;
pub mod benchmark;

pub use simulation::particle::{Particle, Vec2f};
pub use simulation::grid::{SpatialGrid, CELL_CAPACITY, FORWARD_NEIGHBOURS};
pub use simulation::collision::{resolve, resolve_serial};
pub use simulation::worker_pool::{partition_columns, ColumnSpan, WorkerPool, SLICE_COLS};
pub use simulation::forces::{Force, ForceSet, PointerField, UniformGravity};
pub use simulation::input::InputState;
pub use simulation::params::{Parameters, FIXED_DT};
pub use simulation::world::World;
pub use simulation::spawner::Spawner;
pub use simulation::scenario::Scenario;

pub use configuration::config::{
    EngineConfig, PointerConfig, ScenarioConfig, SolverConfig, SpawnConfig, WorldConfig,
};

pub use visualization::vis2d::run_2d;

pub use benchmark::benchmark::{bench_collision, bench_integration};
