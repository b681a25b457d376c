//! Utility functions and helpers.
//!
//! Environment variable lookup for configuration.

pub mod env;

pub use env::get_env_with_prefix;

