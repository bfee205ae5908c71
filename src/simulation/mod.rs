pub mod particle;
pub mod params;
pub mod input;
pub mod forces;
pub mod grid;
pub mod collision;
pub mod worker_pool;
pub mod world;
pub mod spawner;
pub mod scenario;
