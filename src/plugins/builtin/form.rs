use crate::plugins::{
    Credentials, FormData, PayloadEncoding, PluginError, PluginResult, Source, SourceFactory,
    SourceInput, Table, TableFormat,
};

/// Source for `application/x-www-form-urlencoded` bodies
pub struct FormFactory;

impl SourceFactory for FormFactory {
    fn description(&self) -> &str {
        "
        A source that accepts URL-encoded form bodies. Repeated fields are
        collected in the order they were sent.
        "
    }

    fn encoding(&self) -> PayloadEncoding {
        PayloadEncoding::UrlEncoded
    }

    fn create(&self, input: SourceInput) -> PluginResult<Box<dyn Source>> {
        let form = input
            .payload
            .as_form()
            .cloned()
            .ok_or_else(|| PluginError::render("form", "payload is not form data"))?;
        Ok(Box::new(FormSource {
            form,
            credentials: input.credentials,
        }))
    }
}

pub struct FormSource {
    form: FormData,
    credentials: Option<Credentials>,
}

impl Source for FormSource {
    fn name(&self) -> &str {
        "form"
    }

    fn to_text(&self) -> PluginResult<String> {
        Ok(self
            .form
            .iter()
            .map(|(key, values)| format!("{}: {}", key, values.join(", ")))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn to_markdown(&self, table_format: Option<&str>) -> PluginResult<String> {
        let mut table = Table::new(["Field", "Values"]);
        for (key, values) in self.form.iter() {
            table.push_row([key.to_string(), values.join(", ")]);
        }
        Ok(table.render(TableFormat::resolve(table_format)))
    }

    fn authorization(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}
