use utoipa::openapi::path::{Operation, Parameter, PathItem};
use utoipa::openapi::schema::{ObjectBuilder, Type};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::{OpenApi as OpenApiDocument, RefOr, Schema};
use utoipa::{Modify, OpenApi};

use crate::plugins::{PluginRegistry, PluginRole};

pub const NOTIFY_TAG: &str = "Notify";
pub const PLUGIN_TAG: &str = "Plugin";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Notification Router",
        description = "A webhook translator that converts support notification source to notification services.",
        license(name = "MIT"),
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::PluginListResponse,
            crate::plugins::PluginSummary,
        )
    ),
    tags(
        (name = NOTIFY_TAG, description = "Plugin discovery and notification routing"),
        (name = PLUGIN_TAG, description = "Endpoints contributed by plugins"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut OpenApiDocument) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basicAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Basic)
                    .description(Some("Credentials handed to the source plugin"))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Token handed to the source plugin"))
                    .build(),
            ),
        );
    }
}

/// Restricts the plugin path parameters to the names in `registry`.
pub fn declare_plugin_names(openapi: &mut OpenApiDocument, registry: &PluginRegistry) {
    let sources = registry.list(PluginRole::Source);
    let destinations = registry.list(PluginRole::Destination);
    let mut all: Vec<String> = sources.iter().chain(&destinations).cloned().collect();
    all.sort();
    all.dedup();

    for item in openapi.paths.paths.values_mut() {
        for operation in operations_mut(item) {
            for parameter in operation.parameters.iter_mut().flatten() {
                let names = match parameter.name.as_str() {
                    "source" => &sources,
                    "destination" => &destinations,
                    "plugin_name" => &all,
                    _ => continue,
                };
                restrict(parameter, names);
            }
        }
    }
}

fn operations_mut(item: &mut PathItem) -> impl Iterator<Item = &mut Operation> {
    [item.get.as_mut(), item.post.as_mut()].into_iter().flatten()
}

fn restrict(parameter: &mut Parameter, names: &[String]) {
    let schema = ObjectBuilder::new()
        .schema_type(Type::String)
        .enum_values(Some(names.iter().cloned()))
        .build();
    parameter.schema = Some(RefOr::T(Schema::Object(schema)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PluginsConfig;
    use crate::plugins::builtin;
    use serde_json::{Value, json};

    #[test]
    fn test_security_schemes_are_declared() {
        let document = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemes = &document["components"]["securitySchemes"];
        assert_eq!(schemes["basicAuth"]["scheme"], "basic");
        assert_eq!(schemes["bearerAuth"]["scheme"], "bearer");
        assert_eq!(document["info"]["license"]["name"], "MIT");
    }

    #[test]
    fn test_plugin_names_become_enums() {
        let (_, mut openapi) = utoipa_axum::router::OpenApiRouter::<()>::with_openapi(ApiDoc::openapi())
            .routes(utoipa_axum::routes!(fake_route))
            .split_for_parts();
        let registry = builtin::registry(&PluginsConfig::default());
        declare_plugin_names(&mut openapi, &registry);

        let document = serde_json::to_value(&openapi).unwrap();
        let parameters = &document["paths"]["/notify/{source}/{destination}"]["post"]["parameters"];
        let enums: Vec<Value> = parameters
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["schema"]["enum"].clone())
            .collect();
        assert_eq!(
            enums,
            [json!(["form", "json", "sample"]), json!(["echo", "webhook"])]
        );
    }

    #[utoipa::path(
        post,
        path = "/notify/{source}/{destination}",
        params(("source" = String, Path), ("destination" = String, Path))
    )]
    async fn fake_route() {}
}
