//! # Cinelens Library
//!
//! This library exposes the Cinelens modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod charts;
pub mod cli;

// Re-export cinelens_core for convenience
pub use cinelens_core;
