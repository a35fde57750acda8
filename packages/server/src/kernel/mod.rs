//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod memory_store;
pub mod postgres_store;
pub mod scheduled_tasks;
pub mod traits;
pub mod unit_of_work;

pub use deps::ServerDeps;
pub use memory_store::{MemoryStore, MemoryTables};
pub use postgres_store::PgStore;
pub use scheduled_tasks::start_scheduler;
pub use traits::*;
pub use unit_of_work::{read_only, run_atomically};
