use async_trait::async_trait;

use crate::plugins::{Delivery, Destination, DestinationFactory, PluginResult, Source};

pub struct EchoFactory;

impl DestinationFactory for EchoFactory {
    fn description(&self) -> &str {
        "A destination that echoes the source generated text straight into the response of the call."
    }

    fn create(&self) -> PluginResult<Box<dyn Destination>> {
        Ok(Box::new(EchoDestination))
    }
}

/// Returns the source's plain text as the response body
pub struct EchoDestination;

#[async_trait]
impl Destination for EchoDestination {
    fn name(&self) -> &str {
        "echo"
    }

    async fn notify(&self, source: &dyn Source) -> PluginResult<Delivery> {
        Ok(Delivery::text(source.to_text()?))
    }
}
