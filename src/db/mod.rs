pub mod pool;
pub mod queries;
pub mod queries_debit;

pub use pool::{create_pool, run_migrations};
