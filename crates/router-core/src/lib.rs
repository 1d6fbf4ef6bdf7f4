//! router-core: Shared types, errors, math and configuration
//!
//! This crate provides the foundational types used across the router workspace.

pub mod config;
pub mod errors;
pub mod math;
pub mod types;

pub use config::*;
pub use errors::*;
pub use math::*;
pub use types::*;
