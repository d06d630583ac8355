// storage/mod.rs
// Optional SQLite backend receiving every flush

pub mod insert;
pub mod migrations;
pub mod pool;

pub use insert::{load_records, replace_records};
pub use migrations::run_migrations;
pub use pool::init_db_pool_with_path;
