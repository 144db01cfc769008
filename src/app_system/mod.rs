//! Runtime orchestration and lifecycle management.
//!
//! - [`PageSystem`] - starts the backend and both pages, wires their
//!   collaborators together and shuts them down in order
//! - [`Config`] - environment-driven settings
//! - [`setup_tracing`] - initializes the tracing subscriber

pub mod config;
pub mod logging;
pub mod page_system;

pub use config::*;
pub use logging::*;
pub use page_system::*;
