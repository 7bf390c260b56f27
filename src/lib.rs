// ABOUTME: Library root for metavasi - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod cutover;
pub mod directory;
pub mod error;
pub mod types;
