pub mod address;
pub mod health;

pub use health::{HealthService, ShutdownFlag};
