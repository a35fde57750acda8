// Roomie - Room Occupancy & Match Lifecycle core
//
// Owners list rooms, seekers request them, and an accepted request becomes a
// tenancy match with its own conversation. Domain rules live in
// domains/*/actions and talk to storage only through kernel::BaseStore.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
