use std::sync::LazyLock;
use std::time::Duration;

/// Shared outbound HTTP client.
///
/// Initialized on first use and reused by every destination, so requests
/// share one connection pool. Destinations set their own per-request
/// timeout on top of the defaults below.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        .gzip(true)
        .user_agent(user_agent())
        .build()
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build HTTP client, using defaults");
            reqwest::Client::new()
        })
});

/// `notification-router/<version>`
pub fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), crate::pkg_version())
}
