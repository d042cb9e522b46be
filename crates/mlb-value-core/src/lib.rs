// Library root: re-exports all modules so integration tests and the CLI
// can access the crate's public API.

pub mod browse;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod loader;
pub mod player;
pub mod refresh;
pub mod valuation;
