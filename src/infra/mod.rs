//! Infrastructure adapters and runtime bootstrap.

pub mod airtable;
pub mod assets;
pub mod error;
pub mod fetch;
pub mod http;
pub mod memory;
pub mod telemetry;
