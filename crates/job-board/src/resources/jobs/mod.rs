//! Job postings: shape, catalog operations and HTTP routes.

pub mod catalog;
pub mod domain;
pub mod router;

pub use catalog::JobCatalog;
pub use domain::Job;
pub use router::job_router;
