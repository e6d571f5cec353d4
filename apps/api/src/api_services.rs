mod database;
mod demo_seed;
mod state_builder;

pub use database::connect_and_migrate;
pub use state_builder::{build_memory_state, build_postgres_state};
