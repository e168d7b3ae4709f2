//! Utility modules for common functionality

pub mod env;

pub use env::EnvUtils;
