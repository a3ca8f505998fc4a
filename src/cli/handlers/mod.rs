//! Command handlers for CLI operations

pub mod plugins;
pub mod serve;

pub use plugins::PluginsCommandHandler;
pub use serve::ServeCommandHandler;
