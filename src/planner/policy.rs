//! Access policy handling.
//!
//! The service fills in the `Resource` of every policy statement that lacks
//! one with `<domain ARN>/*`. Comparing a declared policy against the stored
//! one therefore only makes sense after applying the same qualification.

use serde_json::Value;

use crate::error::{ConfigError, EsDomainError, ProviderError, Result};

/// A declared access policy document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    document: Value,
}

impl AccessPolicy {
    /// Builds a policy from the declared parameter, either a mapping or a
    /// JSON string.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the string is not valid JSON or the
    /// document is not a JSON object.
    pub fn from_param(value: &Value) -> Result<Self> {
        let document = match value {
            Value::String(text) => serde_json::from_str(text)
                .map_err(|e| EsDomainError::Config(ConfigError::policy(e.to_string())))?,
            other => other.clone(),
        };

        if !document.is_object() {
            return Err(EsDomainError::Config(ConfigError::policy(
                "the policy document must be a JSON object",
            )));
        }

        Ok(Self { document })
    }

    /// Returns a copy whose statements all carry a `Resource`, defaulting to
    /// every path of the given domain.
    #[must_use]
    pub fn qualified(&self, domain_arn: &str) -> Self {
        let mut document = self.document.clone();
        let resource = Value::String(format!("{domain_arn}/*"));

        match document.get_mut("Statement") {
            Some(Value::Array(statements)) => {
                for statement in statements.iter_mut() {
                    qualify_statement(statement, &resource);
                }
            }
            Some(statement @ Value::Object(_)) => qualify_statement(statement, &resource),
            _ => {}
        }

        Self { document }
    }

    /// Serializes the policy as the JSON string the API expects.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if serialization fails.
    pub fn to_document(&self) -> Result<String> {
        serde_json::to_string(&self.document)
            .map_err(|e| EsDomainError::Config(ConfigError::policy(e.to_string())))
    }

    /// Returns the policy as a JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.document
    }
}

fn qualify_statement(statement: &mut Value, resource: &Value) {
    if let Value::Object(fields) = statement
        && !fields.contains_key("Resource")
    {
        fields.insert(String::from("Resource"), resource.clone());
    }
}

/// Parses the policy string stored on a domain. An empty string means the
/// domain has no policy.
///
/// # Errors
///
/// Returns a provider error if the stored policy is not valid JSON.
pub fn parse_current_policy(raw: Option<&str>) -> Result<Option<Value>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => serde_json::from_str(text).map(Some).map_err(|e| {
            EsDomainError::Provider(ProviderError::invalid_response(format!(
                "Stored access policy is not valid JSON: {e}"
            )))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ARN: &str = "arn:aws:es:eu-west-1:123456789012:domain/logs";

    #[test]
    fn test_from_json_string() {
        let policy = AccessPolicy::from_param(&json!(r#"{"Version":"2012-10-17","Statement":[]}"#)).unwrap();
        assert_eq!(policy.as_value()["Version"], "2012-10-17");
    }

    #[test]
    fn test_from_mapping() {
        let policy = AccessPolicy::from_param(&json!({"Statement": []})).unwrap();
        assert!(policy.as_value().is_object());
    }

    #[test]
    fn test_malformed_string_is_config_error() {
        let result = AccessPolicy::from_param(&json!("{not json"));
        assert!(matches!(
            result,
            Err(EsDomainError::Config(ConfigError::InvalidPolicy { .. }))
        ));
    }

    #[test]
    fn test_non_object_is_config_error() {
        assert!(AccessPolicy::from_param(&json!(["a", "b"])).is_err());
        assert!(AccessPolicy::from_param(&json!("42")).is_err());
    }

    #[test]
    fn test_qualified_fills_missing_resource_only() {
        let policy = AccessPolicy::from_param(&json!({
            "Statement": [
                {"Effect": "Allow", "Action": "es:*"},
                {"Effect": "Deny", "Action": "es:ESHttpDelete", "Resource": "arn:custom"}
            ]
        }))
        .unwrap();

        let qualified = policy.qualified(ARN);
        let statements = &qualified.as_value()["Statement"];
        assert_eq!(statements[0]["Resource"], format!("{ARN}/*"));
        assert_eq!(statements[1]["Resource"], "arn:custom");

        // The declared policy is left untouched.
        assert!(policy.as_value()["Statement"][0].get("Resource").is_none());
    }

    #[test]
    fn test_qualified_single_statement_object() {
        let policy = AccessPolicy::from_param(&json!({
            "Statement": {"Effect": "Allow", "Action": "es:*"}
        }))
        .unwrap();
        let qualified = policy.qualified(ARN);
        assert_eq!(qualified.as_value()["Statement"]["Resource"], format!("{ARN}/*"));
    }

    #[test]
    fn test_parse_current_policy() {
        assert_eq!(parse_current_policy(None).unwrap(), None);
        assert_eq!(parse_current_policy(Some("")).unwrap(), None);
        assert_eq!(
            parse_current_policy(Some(r#"{"Statement":[]}"#)).unwrap(),
            Some(json!({"Statement": []}))
        );
        assert!(parse_current_policy(Some("{oops")).is_err());
    }
}
