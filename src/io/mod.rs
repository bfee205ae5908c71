pub mod image_seed;
pub mod snapshot;
