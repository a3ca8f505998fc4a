//! Outbound HTTP used by destination plugins

pub mod client;
