use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use utoipa_axum::router::OpenApiRouter;

use super::PluginRole;
use super::destination::DestinationFactory;
use super::source::SourceFactory;
use crate::state::AppState;

/// A registered constructor; the variant carries the plugin's role
#[derive(Clone)]
pub enum PluginConstructor {
    Source(Arc<dyn SourceFactory>),
    Destination(Arc<dyn DestinationFactory>),
}

impl PluginConstructor {
    pub fn role(&self) -> PluginRole {
        match self {
            PluginConstructor::Source(_) => PluginRole::Source,
            PluginConstructor::Destination(_) => PluginRole::Destination,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            PluginConstructor::Source(factory) => factory.description(),
            PluginConstructor::Destination(factory) => factory.description(),
        }
    }

    pub fn render_documentation(&self) -> Option<Value> {
        match self {
            PluginConstructor::Source(factory) => factory.render_documentation(),
            PluginConstructor::Destination(factory) => factory.render_documentation(),
        }
    }

    pub fn routes(&self) -> Option<OpenApiRouter<AppState>> {
        match self {
            PluginConstructor::Source(factory) => factory.routes(),
            PluginConstructor::Destination(factory) => factory.routes(),
        }
    }
}

impl fmt::Debug for PluginConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PluginConstructor::{:?}", self.role())
    }
}

/// Collects registrations before the registry is frozen
#[derive(Default)]
pub struct RegistryBuilder {
    sources: BTreeMap<String, Arc<dyn SourceFactory>>,
    destinations: BTreeMap<String, Arc<dyn DestinationFactory>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `constructor` within the constructor's role.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register(&mut self, name: impl Into<String>, constructor: PluginConstructor) -> &mut Self {
        let name = name.into();
        let role = constructor.role();
        let replaced = match constructor {
            PluginConstructor::Source(factory) => self.sources.insert(name.clone(), factory).is_some(),
            PluginConstructor::Destination(factory) => {
                self.destinations.insert(name.clone(), factory).is_some()
            }
        };

        if replaced {
            tracing::warn!(
                plugin = %name,
                role = %role,
                "Plugin registered more than once, keeping the last registration"
            );
        } else {
            tracing::debug!(plugin = %name, role = %role, "Plugin registered");
        }
        self
    }

    pub fn source<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: SourceFactory + 'static,
    {
        self.register(name, PluginConstructor::Source(Arc::new(factory)))
    }

    pub fn destination<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: DestinationFactory + 'static,
    {
        self.register(name, PluginConstructor::Destination(Arc::new(factory)))
    }

    pub fn build(self) -> PluginRegistry {
        PluginRegistry {
            sources: self.sources,
            destinations: self.destinations,
        }
    }
}

/// Immutable name to constructor index, one namespace per role
pub struct PluginRegistry {
    sources: BTreeMap<String, Arc<dyn SourceFactory>>,
    destinations: BTreeMap<String, Arc<dyn DestinationFactory>>,
}

impl PluginRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn resolve(&self, role: PluginRole, name: &str) -> Option<PluginConstructor> {
        match role {
            PluginRole::Source => self.source(name).map(PluginConstructor::Source),
            PluginRole::Destination => self.destination(name).map(PluginConstructor::Destination),
        }
    }

    pub fn source(&self, name: &str) -> Option<Arc<dyn SourceFactory>> {
        self.sources.get(name).cloned()
    }

    pub fn destination(&self, name: &str) -> Option<Arc<dyn DestinationFactory>> {
        self.destinations.get(name).cloned()
    }

    /// Registered names for `role`, sorted
    pub fn list(&self, role: PluginRole) -> Vec<String> {
        match role {
            PluginRole::Source => self.sources.keys().cloned().collect(),
            PluginRole::Destination => self.destinations.keys().cloned().collect(),
        }
    }

    /// Endpoints contributed by plugins, keyed by plugin name.
    ///
    /// A name registered under both roles gets the routes of both merged.
    pub fn endpoints(&self) -> BTreeMap<String, OpenApiRouter<AppState>> {
        let mut endpoints: BTreeMap<String, OpenApiRouter<AppState>> = BTreeMap::new();
        let contributed = self
            .sources
            .iter()
            .filter_map(|(name, factory)| Some((name, factory.routes()?)))
            .chain(
                self.destinations
                    .iter()
                    .filter_map(|(name, factory)| Some((name, factory.routes()?))),
            );

        for (name, router) in contributed {
            let merged = match endpoints.remove(name) {
                Some(existing) => existing.merge(router),
                None => router,
            };
            endpoints.insert(name.clone(), merged);
        }
        endpoints
    }

    pub fn contains(&self, role: PluginRole, name: &str) -> bool {
        match role {
            PluginRole::Source => self.sources.contains_key(name),
            PluginRole::Destination => self.destinations.contains_key(name),
        }
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("sources", &self.list(PluginRole::Source))
            .field("destinations", &self.list(PluginRole::Destination))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{
        Credentials, Delivery, Destination, PluginResult, Source, SourceInput,
    };
    use async_trait::async_trait;

    struct Named(&'static str);

    impl Source for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn to_text(&self) -> PluginResult<String> {
            Ok(self.0.to_string())
        }

        fn authorization(&self) -> Option<&Credentials> {
            None
        }
    }

    struct NamedSource(&'static str);

    impl SourceFactory for NamedSource {
        fn description(&self) -> &str {
            self.0
        }

        fn create(&self, _input: SourceInput) -> PluginResult<Box<dyn Source>> {
            Ok(Box::new(Named(self.0)))
        }
    }

    struct Sink;

    #[async_trait]
    impl Destination for Sink {
        fn name(&self) -> &str {
            "sink"
        }

        async fn notify(&self, source: &dyn Source) -> PluginResult<Delivery> {
            Ok(Delivery::text(source.to_text()?))
        }
    }

    struct SinkFactory;

    impl DestinationFactory for SinkFactory {
        fn create(&self) -> PluginResult<Box<dyn Destination>> {
            Ok(Box::new(Sink))
        }
    }

    #[test]
    fn test_list_is_sorted_per_role() {
        let mut builder = PluginRegistry::builder();
        builder
            .source("zabbix", NamedSource("z"))
            .source("alertmanager", NamedSource("a"))
            .destination("sink", SinkFactory);
        let registry = builder.build();

        assert_eq!(registry.list(PluginRole::Source), ["alertmanager", "zabbix"]);
        assert_eq!(registry.list(PluginRole::Destination), ["sink"]);
    }

    #[test]
    fn test_roles_are_independent_namespaces() {
        let mut builder = PluginRegistry::builder();
        builder
            .source("shared", NamedSource("source side"))
            .destination("shared", SinkFactory);
        let registry = builder.build();

        assert!(registry.contains(PluginRole::Source, "shared"));
        assert!(registry.contains(PluginRole::Destination, "shared"));
        assert_eq!(
            registry.resolve(PluginRole::Source, "shared").unwrap().role(),
            PluginRole::Source
        );
        assert_eq!(
            registry
                .resolve(PluginRole::Destination, "shared")
                .unwrap()
                .role(),
            PluginRole::Destination
        );
    }

    struct Routed(&'static str);

    impl SourceFactory for Routed {
        fn routes(&self) -> Option<OpenApiRouter<AppState>> {
            Some(OpenApiRouter::new().route(self.0, axum::routing::get(|| async { "ok" })))
        }

        fn create(&self, _input: SourceInput) -> PluginResult<Box<dyn Source>> {
            Ok(Box::new(Named("routed")))
        }
    }

    impl DestinationFactory for Routed {
        fn routes(&self) -> Option<OpenApiRouter<AppState>> {
            Some(OpenApiRouter::new().route(self.0, axum::routing::get(|| async { "ok" })))
        }

        fn create(&self) -> PluginResult<Box<dyn Destination>> {
            Ok(Box::new(Sink))
        }
    }

    #[test]
    fn test_endpoints_only_for_contributing_plugins() {
        let mut builder = PluginRegistry::builder();
        builder
            .source("quiet", NamedSource("no routes"))
            .source("loud", Routed("/status"))
            .destination("sink", SinkFactory);
        let registry = builder.build();

        let endpoints = registry.endpoints();
        assert_eq!(endpoints.keys().collect::<Vec<_>>(), ["loud"]);
    }

    #[tokio::test]
    async fn test_endpoints_merge_both_roles() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use tower::ServiceExt;

        let mut builder = PluginRegistry::builder();
        builder
            .source("twin", Routed("/inbound"))
            .destination("twin", Routed("/outbound"));
        let registry = builder.build();

        let mut endpoints = registry.endpoints();
        assert_eq!(endpoints.len(), 1);
        let (router, _) = endpoints.remove("twin").unwrap().split_for_parts();
        let router = router.with_state(AppState::new(PluginRegistry::builder().build()));

        for path in ["/inbound", "/outbound"] {
            let request = Request::builder().uri(path).body(Body::empty()).unwrap();
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{path}");
        }
    }

    #[test]
    fn test_last_registration_wins() {
        let mut builder = PluginRegistry::builder();
        builder
            .source("dup", NamedSource("first"))
            .source("dup", NamedSource("second"));
        let registry = builder.build();

        assert_eq!(registry.list(PluginRole::Source), ["dup"]);
        let constructor = registry.resolve(PluginRole::Source, "dup").unwrap();
        assert_eq!(constructor.description(), "second");
    }

    #[test]
    fn test_resolve_unknown_name() {
        let registry = PluginRegistry::builder().build();
        assert!(registry.resolve(PluginRole::Source, "nope").is_none());
        assert!(registry.destination("nope").is_none());
        assert!(registry.list(PluginRole::Source).is_empty());
    }

    #[tokio::test]
    async fn test_resolved_constructors_compose() {
        let mut builder = PluginRegistry::builder();
        builder
            .source("named", NamedSource("hello"))
            .destination("sink", SinkFactory);
        let registry = builder.build();

        let source = registry
            .source("named")
            .unwrap()
            .ingest(Default::default())
            .unwrap();
        let destination = registry.destination("sink").unwrap().create().unwrap();
        let delivery = destination.notify(source.as_ref()).await.unwrap();
        assert_eq!(delivery.body, "hello");
    }
}
