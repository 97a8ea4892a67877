// storage/mod.rs
// Result sink and database operations

mod memory;
pub mod migrations;
pub mod pool;
mod sink;
mod sqlite;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use memory::MemorySink;
pub use migrations::run_migrations;
pub use pool::{init_db_pool_with_path, init_memory_pool};
pub use sink::ResultSink;
pub use sqlite::SqliteSink;
