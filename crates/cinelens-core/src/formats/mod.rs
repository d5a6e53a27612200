//! # Formats Module
//!
//! Decoding of the movie and rating tables.
//!
//! This module contains:
//! - CSV decoding into typed records (serde + csv)
//! - Column profiling during the same pass
//!
//! Note: Opening files remains in the app layer (apps/cinelens).
//! Readers here take any `io::Read`.

mod csv_table;

pub use csv_table::*;
