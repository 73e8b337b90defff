//! Job applications: shape, intake operations and HTTP routes.

pub mod domain;
pub mod intake;
pub mod router;

pub use domain::Application;
pub use intake::ApplicationIntake;
pub use router::application_router;
