//! Evaluator configuration
//!
//! Loadable from JSON; every field is optional:
//!
//! ```
//! use fluree_db_expr::config::{ErrorPolicy, EvaluatorConfig};
//!
//! let config = EvaluatorConfig::from_json(
//!     r#"{"filterErrors": "propagate", "groupConcatSeparator": ", "}"#,
//! )
//! .unwrap();
//! assert_eq!(config.filter_errors, ErrorPolicy::Propagate);
//! assert_eq!(config.group_concat_separator, ", ");
//! assert!(config.now.is_none());
//! ```

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// What [`Evaluator::filter`](crate::eval::Evaluator::filter) does with an
/// expression error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorPolicy {
    /// The binding is rejected, as in a SPARQL FILTER
    #[default]
    Exclude,
    /// The error is returned to the caller
    Propagate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvaluatorConfig {
    /// Fixed value for NOW(). When absent the evaluator captures the current
    /// instant once, at construction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub now: Option<DateTime<FixedOffset>>,
    pub filter_errors: ErrorPolicy,
    /// GROUP_CONCAT separator when the aggregate does not name one
    pub group_concat_separator: String,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            now: None,
            filter_errors: ErrorPolicy::Exclude,
            group_concat_separator: " ".to_string(),
        }
    }
}

impl EvaluatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_now(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn with_filter_errors(mut self, policy: ErrorPolicy) -> Self {
        self.filter_errors = policy;
        self
    }

    pub fn with_group_concat_separator(mut self, separator: impl Into<String>) -> Self {
        self.group_concat_separator = separator.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = EvaluatorConfig::from_json("{}").unwrap();
        assert_eq!(config, EvaluatorConfig::default());
        assert_eq!(config.group_concat_separator, " ");
        assert_eq!(config.filter_errors, ErrorPolicy::Exclude);
    }

    #[test]
    fn test_fixed_now() {
        let config = EvaluatorConfig::from_json(r#"{"now": "2024-05-01T10:00:00+02:00"}"#).unwrap();
        let now = config.now.unwrap();
        assert_eq!(now.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_serializes_camel_case() {
        let config = EvaluatorConfig::new()
            .with_filter_errors(ErrorPolicy::Propagate)
            .with_group_concat_separator("|");
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"filterErrors": "propagate", "groupConcatSeparator": "|"})
        );
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(EvaluatorConfig::from_json(r#"{"filterErrors": "ignore"}"#).is_err());
    }
}
