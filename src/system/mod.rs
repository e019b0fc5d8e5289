//! Platform abstraction and system utilities

pub mod logging;

pub use logging::init_logging;
