//! Command services.

mod executor;

pub use executor::CommandExecutor;
