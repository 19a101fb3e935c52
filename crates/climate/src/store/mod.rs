//! Store module exports

pub mod memory;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;
