//! Data Transfer Objects for API responses.
//!
//! - `error` - the uniform error body
//! - `plugin` - plugin listings

mod error;
mod plugin;

pub use error::{ErrorResponse, StatusInput};
pub use plugin::PluginListResponse;
