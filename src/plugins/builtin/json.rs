use serde_json::{Map, Value, json};

use crate::plugins::{
    Credentials, PayloadEncoding, PluginError, PluginResult, Source, SourceFactory, SourceInput,
    Table, TableFormat,
};

/// Source accepting any JSON document
pub struct JsonFactory;

impl SourceFactory for JsonFactory {
    fn description(&self) -> &str {
        "A source that accepts any JSON document and renders its fields as text or a table."
    }

    fn encoding(&self) -> PayloadEncoding {
        PayloadEncoding::Json
    }

    fn render_documentation(&self) -> Option<Value> {
        Some(json!({
            "name": "json",
            "type": "source",
            "description": self.description(),
            "encoding": PayloadEncoding::Json,
            "rendering": {
                "text": "One `key: value` line per top-level field of an object; other documents are pretty printed.",
                "markdown": "Objects become a Field/Value table, arrays of objects one row per element.",
            },
            "example": {
                "alert": "DiskFull",
                "host": "web-1",
                "usage": 0.93,
            },
        }))
    }

    fn create(&self, input: SourceInput) -> PluginResult<Box<dyn Source>> {
        let document = input
            .payload
            .as_json()
            .cloned()
            .ok_or_else(|| PluginError::render("json", "payload is not a JSON document"))?;
        Ok(Box::new(JsonSource {
            document,
            credentials: input.credentials,
        }))
    }
}

pub struct JsonSource {
    document: Value,
    credentials: Option<Credentials>,
}

/// Strings are shown without quotes, everything else as compact JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn object_table(object: &Map<String, Value>) -> Table {
    let mut table = Table::new(["Field", "Value"]);
    for (key, value) in object {
        table.push_row([key.clone(), display_value(value)]);
    }
    table
}

fn records_table(records: &[Value]) -> Option<Table> {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for key in record.as_object()?.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut table = Table::new(columns.iter().copied());
    for record in records {
        table.push_row(
            columns
                .iter()
                .map(|column| record.get(*column).map(display_value).unwrap_or_default()),
        );
    }
    Some(table)
}

impl Source for JsonSource {
    fn name(&self) -> &str {
        "json"
    }

    fn to_text(&self) -> PluginResult<String> {
        match &self.document {
            Value::Object(object) => Ok(object
                .iter()
                .map(|(key, value)| format!("{}: {}", key, display_value(value)))
                .collect::<Vec<_>>()
                .join("\n")),
            other => serde_json::to_string_pretty(other)
                .map_err(|e| PluginError::render(self.name(), e.to_string())),
        }
    }

    fn to_markdown(&self, table_format: Option<&str>) -> PluginResult<String> {
        let format = TableFormat::resolve(table_format);
        let table = match &self.document {
            Value::Object(object) => object_table(object),
            Value::Array(items) if !items.is_empty() => match records_table(items) {
                Some(table) => table,
                None => {
                    let mut table = Table::new(["Value"]);
                    for item in items {
                        table.push_row([display_value(item)]);
                    }
                    table
                }
            },
            other => Table::new(["Value"]).row([display_value(other)]),
        };
        Ok(table.render(format))
    }

    fn authorization(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}
