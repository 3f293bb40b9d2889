//! Copr API response payload
//!
//! Every Copr API v1 endpoint answers with the same loose JSON object. The
//! `output` field carries the outcome marker (`"ok"` or anything else), the
//! remaining fields are filled in depending on the endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::build::{BuildHandle, BuildStatus};

/// Outcome marker Copr puts in `output` on success
pub const OUTPUT_OK: &str = "ok";

/// Decoded response from the Copr API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoprResponse {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub ids: Option<Vec<u64>>,
    #[serde(default)]
    pub status: Option<String>,
}

impl CoprResponse {
    /// True only when `output` is exactly `"ok"`
    pub fn is_ok(&self) -> bool {
        self.output.as_deref() == Some(OUTPUT_OK)
    }

    /// Human-readable reason for a response that is not ok
    pub fn failure_reason(&self) -> String {
        if let Some(error) = self.error.as_deref().filter(|e| !e.is_empty()) {
            return error.to_string();
        }
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            return message.to_string();
        }
        match self.output.as_deref() {
            Some(output) => format!("unexpected output '{}'", output),
            None => "response carried no output marker".to_string(),
        }
    }

    /// Builds a handle from `ids`, falling back to the single `id`
    pub fn build_handle(&self) -> Option<BuildHandle> {
        match &self.ids {
            Some(ids) if !ids.is_empty() => BuildHandle::new(ids.iter().map(u64::to_string)),
            _ => BuildHandle::new(self.id.clone()),
        }
    }

    /// The build status carried by a status response
    pub fn build_status(&self) -> Option<BuildStatus> {
        self.status.as_deref().map(BuildStatus::from)
    }
}

/// Copr is inconsistent about whether `id` is a string or a number
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(JsonValue::String(s)) => Some(s),
        Some(JsonValue::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CoprResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_ok_marker_must_match_exactly() {
        assert!(parse(r#"{"output": "ok"}"#).is_ok());
        assert!(!parse(r#"{"output": "OK"}"#).is_ok());
        assert!(!parse(r#"{"output": "Ok"}"#).is_ok());
        assert!(!parse(r#"{"output": ""}"#).is_ok());
        assert!(!parse(r#"{"output": "notok"}"#).is_ok());
        assert!(!parse(r#"{"output": null}"#).is_ok());
        assert!(!parse(r#"{}"#).is_ok());
    }

    #[test]
    fn test_new_build_response() {
        let response = parse(
            r#"{"output": "ok", "ids": [4711, 4712], "message": "Build was added to test."}"#,
        );

        assert!(response.is_ok());
        let handle = response.build_handle().unwrap();
        assert_eq!(handle.ids(), ["4711", "4712"]);
    }

    #[test]
    fn test_single_id_fallback() {
        let numeric = parse(r#"{"output": "ok", "id": 42}"#);
        assert_eq!(numeric.build_handle().unwrap().ids(), ["42"]);

        let text = parse(r#"{"output": "ok", "id": "42", "ids": []}"#);
        assert_eq!(text.build_handle().unwrap().ids(), ["42"]);

        assert!(parse(r#"{"output": "ok"}"#).build_handle().is_none());
    }

    #[test]
    fn test_status_response() {
        let response = parse(r#"{"output": "ok", "status": "running"}"#);
        assert_eq!(response.build_status(), Some(BuildStatus::Running));

        assert_eq!(parse(r#"{"output": "ok"}"#).build_status(), None);
    }

    #[test]
    fn test_failure_reason_prefers_error_text() {
        let response = parse(r#"{"output": "notok", "error": "Copr test not found", "message": "m"}"#);
        assert_eq!(response.failure_reason(), "Copr test not found");

        let response = parse(r#"{"output": "notok", "message": "Bad request"}"#);
        assert_eq!(response.failure_reason(), "Bad request");

        let response = parse(r#"{"output": "notok"}"#);
        assert_eq!(response.failure_reason(), "unexpected output 'notok'");

        assert_eq!(
            CoprResponse::default().failure_reason(),
            "response carried no output marker"
        );
    }
}
