//! Receptionist output: exactly one of two channel-tagged shapes.
//!
//! ```text
//! {"channel": "to_user", "message": "<text for the guest>"}
//! {"channel": "to_data_entry", "instruction": {"intent": "<intent>", "parameters": {...}}}
//! ```
//!
//! Parsing is strict. The only leniency is stripping a surrounding markdown
//! code fence; extra keys, missing keys, blank messages and unknown intents
//! are all rejected as [`AgentError::MalformedOutput`].

use serde_json::{json, Map, Value};
use songbird_booking::Intent;
use songbird_memory::Channel;

use crate::error::{AgentError, Result};

/// Loosely typed request from the receptionist to the data entry worker.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Booking operation to perform.
    pub intent: Intent,
    /// Values as the guest stated them.
    pub parameters: Map<String, Value>,
}

impl Instruction {
    /// Create an instruction.
    pub fn new(intent: Intent, parameters: Map<String, Value>) -> Self {
        Self { intent, parameters }
    }

    /// JSON form (`{"intent", "parameters"}`).
    pub fn to_value(&self) -> Value {
        json!({
            "intent": self.intent.as_str(),
            "parameters": Value::Object(self.parameters.clone()),
        })
    }

    fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| malformed("instruction must be an object"))?;
        expect_keys(obj, &["intent", "parameters"], "instruction")?;

        let intent = obj
            .get("intent")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("instruction intent must be a string"))?
            .parse::<Intent>()
            .map_err(|e| malformed(&e.to_string()))?;
        let parameters = obj
            .get("parameters")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| malformed("instruction parameters must be an object"))?;

        Ok(Self { intent, parameters })
    }
}

/// One receptionist decision.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceptionistAction {
    /// Reply to the guest.
    ToUser {
        /// Text for the guest.
        message: String,
    },
    /// Delegate a booking operation.
    ToDataEntry {
        /// What to do.
        instruction: Instruction,
    },
}

impl ReceptionistAction {
    /// Channel tag of this action.
    pub fn channel(&self) -> Channel {
        match self {
            Self::ToUser { .. } => Channel::ToUser,
            Self::ToDataEntry { .. } => Channel::ToDataEntry,
        }
    }

    /// JSON form, as the model is asked to produce it.
    pub fn to_value(&self) -> Value {
        match self {
            Self::ToUser { message } => json!({"channel": "to_user", "message": message}),
            Self::ToDataEntry { instruction } => {
                json!({"channel": "to_data_entry", "instruction": instruction.to_value()})
            }
        }
    }

    /// Parse raw model output against the two-shape contract.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(strip_code_fence(raw))
            .map_err(|e| malformed(&format!("not valid JSON: {e}")))?;
        let obj = value
            .as_object()
            .ok_or_else(|| malformed("expected a JSON object"))?;

        let channel = obj
            .get("channel")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("missing channel"))?;

        match channel {
            "to_user" => {
                expect_keys(obj, &["channel", "message"], "to_user action")?;
                let message = obj
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .ok_or_else(|| malformed("to_user message must be a non-empty string"))?;
                Ok(Self::ToUser {
                    message: message.to_string(),
                })
            }
            "to_data_entry" => {
                expect_keys(obj, &["channel", "instruction"], "to_data_entry action")?;
                let instruction = obj
                    .get("instruction")
                    .ok_or_else(|| malformed("missing instruction"))?;
                Ok(Self::ToDataEntry {
                    instruction: Instruction::from_value(instruction)?,
                })
            }
            other => Err(malformed(&format!("unknown channel {other:?}"))),
        }
    }
}

/// Remove a surrounding markdown code fence (```` ```json ... ``` ````), if any.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line.
    match body.split_once('\n') {
        Some((info, content)) if !info.trim().contains(' ') => content.trim(),
        _ => body.trim(),
    }
}

/// Require the object to have exactly `keys`.
pub(crate) fn expect_keys(obj: &Map<String, Value>, keys: &[&str], what: &str) -> Result<()> {
    let same = obj.len() == keys.len() && keys.iter().all(|k| obj.contains_key(*k));
    if same {
        Ok(())
    } else {
        let found: Vec<&str> = obj.keys().map(String::as_str).collect();
        Err(malformed(&format!(
            "{what} must have exactly keys {keys:?}, found {found:?}"
        )))
    }
}

fn malformed(reason: &str) -> AgentError {
    AgentError::MalformedOutput(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_to_user() {
        let action = ReceptionistAction::parse(
            r#"{"channel":"to_user","message":"What time would you like?"}"#,
        )
        .unwrap();
        assert_eq!(
            action,
            ReceptionistAction::ToUser {
                message: "What time would you like?".into()
            }
        );
        assert_eq!(action.channel(), Channel::ToUser);
    }

    #[test]
    fn test_parse_to_data_entry() {
        let raw = r#"{
            "channel": "to_data_entry",
            "instruction": {
                "intent": "check_availability",
                "parameters": {"party_size": 4, "date": "today", "time": "19:00"}
            }
        }"#;
        let action = ReceptionistAction::parse(raw).unwrap();
        let ReceptionistAction::ToDataEntry { instruction } = action else {
            panic!("expected to_data_entry");
        };
        assert_eq!(instruction.intent, Intent::CheckAvailability);
        assert_eq!(instruction.parameters["party_size"], 4);
    }

    #[test]
    fn test_parse_fenced_output() {
        let raw = "```json\n{\"channel\":\"to_user\",\"message\":\"Hello!\"}\n```";
        assert!(matches!(
            ReceptionistAction::parse(raw),
            Ok(ReceptionistAction::ToUser { .. })
        ));
    }

    #[test]
    fn test_rejects_other_shapes() {
        let bad = [
            "Sure, I can help with that!",
            r#"["to_user", "hi"]"#,
            r#"{"message":"no channel"}"#,
            r#"{"channel":"to_kitchen","message":"hi"}"#,
            r#"{"channel":"to_user","message":"   "}"#,
            r#"{"channel":"to_user","message":"hi","extra":true}"#,
            r#"{"channel":"to_user","instruction":{"intent":"check_availability","parameters":{}}}"#,
            r#"{"channel":"to_data_entry","message":"book it"}"#,
            r#"{"channel":"to_data_entry","instruction":{"intent":"check_reservation","parameters":{}}}"#,
            r#"{"channel":"to_data_entry","instruction":{"intent":"cancel_reservation"}}"#,
            r#"{"channel":"to_data_entry","instruction":{"intent":"cancel_reservation","parameters":"ABC"}}"#,
        ];
        for raw in bad {
            let err = ReceptionistAction::parse(raw).unwrap_err();
            assert!(
                matches!(err, AgentError::MalformedOutput(_)),
                "expected rejection for {raw}"
            );
        }
    }

    #[test]
    fn test_value_round_trip() {
        let mut parameters = Map::new();
        parameters.insert("reservation_id".into(), json!("SB0001"));
        let action = ReceptionistAction::ToDataEntry {
            instruction: Instruction::new(Intent::CancelReservation, parameters),
        };
        let parsed = ReceptionistAction::parse(&action.to_value().to_string()).unwrap();
        assert_eq!(parsed, action);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("  {}  "), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```{}```"), "{}");
    }
}
