//! Routes one inbound request from a source plugin to a destination plugin.

use std::sync::Arc;
use std::time::Instant;

use crate::error::{AppError, AppResult};
use crate::plugins::{Delivery, PluginRegistry, RawRequest};

#[derive(Clone)]
pub struct RoutingService {
    registry: Arc<PluginRegistry>,
}

impl RoutingService {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    /// Ingests `request` with the `source` plugin and hands the instance to
    /// the `destination` plugin.
    ///
    /// Both names are resolved before any plugin code runs. When either is
    /// unknown every unresolved name is reported in one error, source first.
    /// The destination's delivery is returned untouched.
    pub async fn route(
        &self,
        source: &str,
        destination: &str,
        request: RawRequest,
    ) -> AppResult<Delivery> {
        let source_factory = self.registry.source(source);
        let destination_factory = self.registry.destination(destination);

        let (source_factory, destination_factory) = match (source_factory, destination_factory) {
            (Some(s), Some(d)) => (s, d),
            (s, d) => {
                let mut missing = Vec::with_capacity(2);
                if s.is_none() {
                    missing.push(source);
                }
                if d.is_none() {
                    missing.push(destination);
                }
                tracing::debug!(source, destination, ?missing, "Unresolved plugin names");
                return Err(AppError::unsupported_plugins(missing));
            }
        };

        let start = Instant::now();
        let result = async {
            let instance = source_factory.ingest(request)?;
            let target = destination_factory.create()?;
            let delivery = target.notify(instance.as_ref()).await?;
            Ok::<_, AppError>(delivery)
        }
        .await;

        match &result {
            Ok(delivery) => tracing::info!(
                source,
                destination,
                status = delivery.status.as_u16(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Notification routed"
            ),
            Err(error) if error.is_internal() => tracing::error!(
                source,
                destination,
                error = ?error,
                "Failed to route notification"
            ),
            Err(error) => tracing::warn!(
                source,
                destination,
                error = %error,
                "Notification rejected"
            ),
        }

        result
    }
}
