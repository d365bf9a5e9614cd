// src/llm/response.rs
//! Canonical result of any language-model call.
//!
//! Providers and SDK wrappers answer in several shapes. They are all mapped
//! here, once, so callers only ever see `LlmReply`.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LlmReply {
    pub text: Option<String>,
    pub error: Option<String>,
}

impl LlmReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            text: None,
            error: Some(error.into()),
        }
    }

    /// Normalize a raw response body.
    pub fn from_value(value: &Value) -> Self {
        if let Some(error) = error_message(value) {
            return Self::error(error);
        }

        match extract_text(value) {
            Some(text) => Self::text(text),
            None => Self::error(format!("Unrecognized model response: {}", value)),
        }
    }

    /// Normalize a raw response body that may not be JSON at all.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::from_value(&Value::String(body.to_string())),
        }
    }

    pub fn into_result(self) -> anyhow::Result<String> {
        match (self.text, self.error) {
            (_, Some(error)) => anyhow::bail!("Language model error: {}", error),
            (Some(text), None) => Ok(text),
            (None, None) => anyhow::bail!("Language model returned no text"),
        }
    }
}

fn error_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(
            other
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        ),
    }
}

fn extract_text(value: &Value) -> Option<String> {
    if let Value::String(text) = value {
        return Some(text.clone());
    }

    let candidates = [
        value.pointer("/choices/0/message/content"),
        value.pointer("/choices/0/text"),
        value.pointer("/message/content"),
        value.get("response"),
        value.get("content"),
        value.get("text"),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Array(parts) => join_content_parts(parts),
            _ => None,
        })
}

/// Content given as `[{"type": "text", "text": "..."}]` parts.
fn join_content_parts(parts: &[Value]) -> Option<String> {
    let texts: Vec<&str> = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    (!texts.is_empty()).then(|| texts.join(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_supported_shapes() {
        let shapes = [
            json!("plain"),
            json!({"choices": [{"message": {"role": "assistant", "content": "plain"}}]}),
            json!({"choices": [{"text": "plain"}]}),
            json!({"message": {"content": "plain"}}),
            json!({"response": "plain"}),
            json!({"content": "plain"}),
            json!({"text": "plain"}),
            json!({"content": [{"type": "text", "text": "pla"}, {"type": "text", "text": "in"}]}),
        ];

        for shape in shapes {
            assert_eq!(LlmReply::from_value(&shape), LlmReply::text("plain"), "{}", shape);
        }
    }

    #[test]
    fn test_null_content_falls_through() {
        let value = json!({"choices": [{"message": {"content": null}}], "text": "fallback"});
        assert_eq!(LlmReply::from_value(&value), LlmReply::text("fallback"));
    }

    #[test]
    fn test_error_shapes() {
        let reply = LlmReply::from_value(&json!({"error": {"code": "429", "message": "Rate limit"}}));
        assert_eq!(reply.error.as_deref(), Some("Rate limit"));

        let reply = LlmReply::from_value(&json!({"error": "bad deployment"}));
        assert_eq!(reply.error.as_deref(), Some("bad deployment"));

        let reply = LlmReply::from_value(&json!({"error": null, "text": "ok"}));
        assert_eq!(reply, LlmReply::text("ok"));

        let reply = LlmReply::from_value(&json!({"id": 1}));
        assert!(reply.text.is_none());
        assert!(reply.error.unwrap().starts_with("Unrecognized"));
    }

    #[test]
    fn test_from_body_accepts_raw_text() {
        assert_eq!(LlmReply::from_body("## Relatório"), LlmReply::text("## Relatório"));
        assert_eq!(
            LlmReply::from_body(r#"{"response": "ok"}"#),
            LlmReply::text("ok")
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(LlmReply::text("ok").into_result().unwrap(), "ok");
        assert!(LlmReply::error("boom").into_result().is_err());
        assert!(LlmReply::default().into_result().is_err());
    }
}
