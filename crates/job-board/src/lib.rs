//! Job postings and applications served over HTTP from a document store.

pub mod config;
pub mod error;
pub mod resources;
pub mod schema;
pub mod store;
pub mod telemetry;
