// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod config;
pub mod roster;
pub mod schedule;
pub mod standings;
pub mod store;
