use serde::{Deserialize, Serialize};

/// Caller-supplied parameters for one certificate check request.
///
/// This is a plain parameter bag: it holds the values, exposes them for
/// serialization, and nothing else. Construction and assignment cannot
/// fail, and no validation is performed here; malformed or missing
/// domains are rejected by [`CheckClient`](super::CheckClient) before a
/// request is issued.
///
/// The wire key for the domain is exactly `"domain"` and must not
/// change: it is the contract with the remote service. When `domain` is
/// `None` the key is omitted from the serialized output entirely
/// (rather than emitted as `null`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// The domain of the website whose SSL certificate should be checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl QueryOptions {
    /// Create empty options with no domain set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the domain to check.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// The configured domain, if any.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_round_trip() {
        let opts = QueryOptions::new().with_domain("example.com");
        assert_eq!(opts.domain(), Some("example.com"));

        // Direct field assignment works the same way
        let mut opts = QueryOptions::new();
        opts.domain = Some(String::new());
        assert_eq!(opts.domain(), Some(""));

        let opts = QueryOptions::new();
        assert_eq!(opts.domain(), None);
    }

    #[test]
    fn test_serializes_under_domain_key() {
        let opts = QueryOptions::new().with_domain("example.com");
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["domain"], "example.com");
    }

    #[test]
    fn test_unset_domain_is_omitted() {
        let opts = QueryOptions::new();
        let json = serde_json::to_string(&opts).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_example_wire_output() {
        let opts = QueryOptions::new().with_domain("apiverve.com");
        let json = serde_json::to_string(&opts).unwrap();
        assert_eq!(json, r#"{"domain":"apiverve.com"}"#);
    }

    #[test]
    fn test_equal_options_serialize_identically() {
        let a = QueryOptions::new().with_domain("example.com");
        let b = QueryOptions {
            domain: Some("example.com".to_string()),
        };
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_deserialize_missing_domain() {
        let opts: QueryOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.domain, None);

        let opts: QueryOptions = serde_json::from_str(r#"{"domain":"apiverve.com"}"#).unwrap();
        assert_eq!(opts.domain(), Some("apiverve.com"));
    }
}
