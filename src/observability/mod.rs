//! Observability subsystem.
//!
//! All subsystems emit `tracing` events tagged with the connection id;
//! logging.rs installs the subscriber that renders them.

pub mod logging;

pub use logging::init_tracing;
