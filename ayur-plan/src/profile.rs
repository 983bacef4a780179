//! User profile and interview answer types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user's intake profile: prakriti assessment, lifestyle factors,
/// health concerns. Produced by the interview flow; the plan layer treats
/// the shape as opaque JSON and only serializes it into prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Value);

impl UserProfile {
    /// Wrap a JSON value as a profile.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Canonical text form used in prompts and retrieval queries:
    /// pretty-printed JSON.
    pub fn to_canonical_text(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

impl From<Value> for UserProfile {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// One answered interview question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    /// The question that was asked.
    pub question: String,
    /// The user's answer.
    pub answer: String,
}

/// Follow-up questions as returned by the model: a parsed list when the
/// response was valid JSON, otherwise the raw text for the caller to
/// render as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Questions {
    /// A parsed question list.
    List(Vec<String>),
    /// The unparsed model output.
    Raw(String),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn canonical_text_is_pretty_json() {
        let profile = UserProfile::new(json!({"lifestyle_factors": {"stress_level": "high"}}));
        let text = profile.to_canonical_text();
        assert!(text.contains("\"stress_level\": \"high\""));
        assert!(text.contains('\n'));
    }

    #[test]
    fn profile_serializes_transparently() {
        let profile = UserProfile::new(json!({"a": 1}));
        assert_eq!(serde_json::to_string(&profile).unwrap(), r#"{"a":1}"#);
    }
}
