//! Payload decoding for the encodings a source can declare.

use std::fmt;

use axum::body::Bytes;
use serde::Serialize;
use serde_json::Value;

use super::error::{PluginError, PluginResult};

/// How a source wants its request body interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    #[default]
    Raw,
    Json,
    #[serde(rename = "urlencoded")]
    UrlEncoded,
}

impl fmt::Display for PayloadEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadEncoding::Raw => write!(f, "raw"),
            PayloadEncoding::Json => write!(f, "JSON"),
            PayloadEncoding::UrlEncoded => write!(f, "form"),
        }
    }
}

/// A decoded request body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Raw(Bytes),
    Json(Value),
    Form(FormData),
}

impl Payload {
    /// Decodes `body` according to `encoding`.
    ///
    /// JSON is parsed strictly, so an empty body is an error for JSON
    /// sources. Form bodies never fail on content; invalid percent escapes
    /// are decoded lossily.
    pub fn decode(encoding: PayloadEncoding, body: &Bytes) -> PluginResult<Self> {
        match encoding {
            PayloadEncoding::Raw => Ok(Payload::Raw(body.clone())),
            PayloadEncoding::Json => serde_json::from_slice(body)
                .map(Payload::Json)
                .map_err(|e| PluginError::ingest(encoding, e.to_string())),
            PayloadEncoding::UrlEncoded => FormData::parse(body).map(Payload::Form),
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Payload::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_form(&self) -> Option<&FormData> {
        match self {
            Payload::Form(form) => Some(form),
            _ => None,
        }
    }
}

/// Form-encoded fields, each key mapped to every value it was given.
///
/// Keys keep the order of their first appearance. Blank values are dropped,
/// and a key whose values are all blank is not recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, Vec<String>)>,
}

impl FormData {
    pub fn parse(body: &[u8]) -> PluginResult<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| PluginError::ingest(PayloadEncoding::UrlEncoded, e.to_string()))?;

        let mut form = FormData::default();
        for (key, value) in pairs {
            form.append(key, value);
        }
        Ok(form)
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }

        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((key, vec![value])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_passthrough() {
        let body = Bytes::from_static(b"\x00\xffbinary");
        let payload = Payload::decode(PayloadEncoding::Raw, &body).unwrap();
        assert_eq!(payload.as_bytes(), Some(&body));
    }

    #[test]
    fn test_json_decode() {
        let body = Bytes::from_static(br#"{"alert": "disk full", "severity": 3}"#);
        let payload = Payload::decode(PayloadEncoding::Json, &body).unwrap();
        assert_eq!(
            payload.as_json(),
            Some(&json!({"alert": "disk full", "severity": 3}))
        );
    }

    #[test]
    fn test_malformed_json_is_ingest_error() {
        let body = Bytes::from_static(b"{\"alert\": ");
        let error = Payload::decode(PayloadEncoding::Json, &body).unwrap_err();
        assert!(matches!(
            error,
            PluginError::Ingest {
                encoding: PayloadEncoding::Json,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_json_body_is_ingest_error() {
        let error = Payload::decode(PayloadEncoding::Json, &Bytes::new()).unwrap_err();
        assert!(error.is_client_error());
    }

    #[test]
    fn test_form_repeated_keys_accumulate_in_order() {
        let form = FormData::parse(b"tag=a&host=web-1&tag=b&tag=c").unwrap();
        assert_eq!(form.len(), 2);
        assert_eq!(form.get("tag").unwrap(), ["a", "b", "c"]);
        assert_eq!(form.get("host").unwrap(), ["web-1"]);

        let keys: Vec<&str> = form.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["tag", "host"]);
    }

    #[test]
    fn test_form_percent_decoding_and_blank_values() {
        let form = FormData::parse(b"message=disk+is+90%25+full&empty=&flag").unwrap();
        assert_eq!(form.get("message").unwrap(), ["disk is 90% full"]);
        assert!(form.get("empty").is_none());
        assert!(form.get("flag").is_none());
    }

    #[test]
    fn test_empty_form() {
        let payload = Payload::decode(PayloadEncoding::UrlEncoded, &Bytes::new()).unwrap();
        assert!(payload.as_form().unwrap().is_empty());
    }
}
