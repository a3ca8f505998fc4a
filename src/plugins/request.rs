//! Inbound request representation handed to source plugins.

use axum::body::Bytes;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Credentials presented by the caller in the `Authorization` header.
///
/// The core never interprets these; destinations that want to enforce
/// caller identity read them through [`Source::authorization`].
///
/// [`Source::authorization`]: super::Source::authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// `Authorization: Basic base64(username:password)`
    Basic { username: String, password: String },
    /// `Authorization: Bearer <token>`
    Bearer { token: String },
    /// Any other scheme, kept verbatim
    Other { scheme: String, value: String },
}

impl Credentials {
    /// Parses an `Authorization` header value.
    ///
    /// Returns `None` for an empty header, a scheme without a value, or a
    /// Basic value that is not valid base64 `username:password`.
    pub fn parse(header: &str) -> Option<Self> {
        let (scheme, value) = header.trim().split_once(' ')?;
        let value = value.trim();
        if scheme.is_empty() || value.is_empty() {
            return None;
        }

        match scheme.to_ascii_lowercase().as_str() {
            "basic" => {
                let decoded = STANDARD.decode(value).ok()?;
                let decoded = String::from_utf8(decoded).ok()?;
                let (username, password) = decoded.split_once(':')?;
                Some(Self::Basic {
                    username: username.to_string(),
                    password: password.to_string(),
                })
            }
            "bearer" => Some(Self::Bearer {
                token: value.to_string(),
            }),
            _ => Some(Self::Other {
                scheme: scheme.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// The secret part of the credentials: password, token or raw value
    pub fn secret(&self) -> &str {
        match self {
            Self::Basic { password, .. } => password,
            Self::Bearer { token } => token,
            Self::Other { value, .. } => value,
        }
    }

    /// Scheme name as it would appear in the header
    pub fn scheme(&self) -> &str {
        match self {
            Self::Basic { .. } => "Basic",
            Self::Bearer { .. } => "Bearer",
            Self::Other { scheme, .. } => scheme,
        }
    }
}

/// The raw request a source ingests: body bytes plus request metadata.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    pub body: Bytes,
    pub content_type: Option<String>,
    pub credentials: Option<Credentials>,
}

impl RawRequest {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_bearer() {
        assert_eq!(
            Credentials::parse("Bearer abc.def"),
            Some(Credentials::Bearer {
                token: "abc.def".to_string()
            })
        );
    }

    #[test]
    fn test_parse_basic() {
        // "alice:s3cret:with:colons"
        let encoded = STANDARD.encode("alice:s3cret:with:colons");
        let credentials = Credentials::parse(&format!("Basic {}", encoded)).unwrap();
        assert_eq!(
            credentials,
            Credentials::Basic {
                username: "alice".to_string(),
                password: "s3cret:with:colons".to_string(),
            }
        );
        assert_eq!(credentials.secret(), "s3cret:with:colons");
        assert_eq!(credentials.scheme(), "Basic");
    }

    #[test]
    fn test_parse_scheme_is_case_insensitive() {
        assert!(matches!(
            Credentials::parse("bearer token"),
            Some(Credentials::Bearer { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_values() {
        assert_eq!(Credentials::parse(""), None);
        assert_eq!(Credentials::parse("Bearer"), None);
        assert_eq!(Credentials::parse("Bearer   "), None);
        assert_eq!(Credentials::parse("Basic not-base64!"), None);
        // valid base64 without a colon separator
        assert_eq!(Credentials::parse("Basic YWxpY2U="), None);
    }

    #[test]
    fn test_parse_other_scheme() {
        assert_eq!(
            Credentials::parse("Digest username=\"x\""),
            Some(Credentials::Other {
                scheme: "Digest".to_string(),
                value: "username=\"x\"".to_string(),
            })
        );
    }

    #[test]
    fn test_raw_request_builders() {
        let request = RawRequest::new("payload")
            .with_content_type("text/plain")
            .with_credentials(Credentials::Bearer {
                token: "t".to_string(),
            });
        assert_eq!(request.body, Bytes::from_static(b"payload"));
        assert_eq!(request.content_type.as_deref(), Some("text/plain"));
        assert!(request.credentials.is_some());
    }

    proptest! {
        #[test]
        fn prop_basic_credentials_parse(username in "[a-zA-Z0-9_.-]{1,20}", password in "[ -~]{0,30}") {
            let encoded = STANDARD.encode(format!("{}:{}", username, password));
            let parsed = Credentials::parse(&format!("Basic {}", encoded));
            prop_assert_eq!(parsed, Some(Credentials::Basic { username, password }));
        }
    }
}
