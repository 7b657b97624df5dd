//! Common Geometry and Identifier Library
//! 
//! This crate provides shared types and utilities used across the deployment generator,
//! the installer interfaces and the scenario binary.

pub mod types;
pub mod utils;

// Re-export commonly used items
pub use types::*;
pub use utils::*;
