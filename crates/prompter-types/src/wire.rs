//! JSON bodies of the network endpoints.
//!
//! Request bodies are decoded from an arbitrary [`serde_json::Value`]
//! rather than derived, because callers are untrusted and missing or
//! mistyped fields are coerced to defaults instead of rejected:
//!
//! - a JSON string is used as is
//! - a missing field or `null` becomes `""`
//! - any other value becomes its JSON text (`5` becomes `"5"`)
//!
//! `options` is only honoured when it is an array.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::ids::PromptId;

/// Decoded body of `POST /prompt`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitRequest {
    /// Question text.
    pub message: String,
    /// Quick-answer labels, absent unless the caller sent an array.
    pub options: Option<Vec<String>>,
}

impl SubmitRequest {
    /// Build a request from a parsed JSON body, coercing every field.
    pub fn from_json(body: &Value) -> Self {
        let options = match body.get("options") {
            Some(Value::Array(items)) => Some(items.iter().map(coerce_value).collect()),
            _ => None,
        };
        Self {
            message: coerce_field(body, "message"),
            options,
        }
    }
}

/// Decoded body of `POST /answer`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerRequest {
    /// Raw id string as sent by the caller.
    pub id: String,
    /// Answer text.
    pub answer: String,
}

impl AnswerRequest {
    /// Build a request from a parsed JSON body, coercing every field.
    pub fn from_json(body: &Value) -> Self {
        Self {
            id: coerce_field(body, "id"),
            answer: coerce_field(body, "answer"),
        }
    }
}

/// Response body of `POST /prompt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SubmitResponse {
    /// Identifier of the newly created prompt.
    pub id: PromptId,
}

/// Response body of `GET /wait`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WaitResponse {
    /// The prompt that was waited on.
    pub id: PromptId,
    /// Its stored answer.
    pub answer: String,
}

/// Response body of `POST /answer`.
///
/// `ok` is `true` both for a fresh answer and for one ignored because the
/// prompt was already answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AnswerResponse {
    /// Always `true` on a 200 response.
    pub ok: bool,
}

fn coerce_field(body: &Value, key: &str) -> String {
    body.get(key).map(coerce_value).unwrap_or_default()
}

fn coerce_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
