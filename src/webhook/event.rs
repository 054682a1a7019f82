use crate::error::{InterviewError, InterviewResult};
use crate::session::{Role, TranscriptMessage};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Inbound webhook body as delivered by the voice platform.
///
/// Fields stay untyped until the event kind is known; only `kind` and `callId`
/// can make an event unusable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default, alias = "type")]
    pub kind: Option<Value>,
    #[serde(default, alias = "call_id")]
    pub call_id: Option<Value>,
    #[serde(default)]
    pub assistant_id: Option<Value>,
    #[serde(default)]
    pub started_at: Option<Value>,
    #[serde(default)]
    pub ended_at: Option<Value>,
    #[serde(default)]
    pub cost: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub analysis_payload: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    role: Role,
    content: String,
    #[serde(default)]
    time: Option<Value>,
    #[serde(default)]
    seconds_from_start: Option<f64>,
}

/// A lifecycle or transcript event for one call
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    CallStart {
        call_id: String,
        started_at: Option<DateTime<Utc>>,
    },
    Transcript {
        call_id: String,
        message: TranscriptMessage,
    },
    AssistantRequest {
        call_id: String,
    },
    CallEnd {
        call_id: String,
        ended_at: Option<DateTime<Utc>>,
        cost: Option<f64>,
        report: Value,
    },
    EndOfCallReport {
        call_id: String,
        ended_at: Option<DateTime<Utc>>,
        cost: Option<f64>,
        report: Value,
    },
    Unknown {
        kind: String,
    },
}

impl WebhookEvent {
    /// Parse a webhook body. `received_at` stands in for missing message times.
    pub fn from_json(body: Value, received_at: DateTime<Utc>) -> InterviewResult<Self> {
        let raw: RawEvent = serde_json::from_value(body.clone())
            .map_err(|e| InterviewError::MalformedEvent(e.to_string()))?;

        let kind = raw
            .kind
            .as_ref()
            .and_then(identifier)
            .ok_or_else(|| InterviewError::MalformedEvent("missing event kind".to_string()))?;

        if !is_known_kind(&kind) {
            return Ok(WebhookEvent::Unknown { kind });
        }

        let call_id = raw.call_id.as_ref().and_then(identifier).ok_or_else(|| {
            InterviewError::MalformedEvent(format!("{} event without call id", kind))
        })?;

        let event_time = raw.timestamp.as_ref().and_then(parse_timestamp);

        let event = match kind.as_str() {
            "call-start" => WebhookEvent::CallStart {
                call_id,
                started_at: raw.started_at.as_ref().and_then(parse_timestamp).or(event_time),
            },
            "transcript" => {
                let message = raw.message.clone().ok_or_else(|| {
                    InterviewError::MalformedEvent("transcript without message".to_string())
                })?;
                let message: RawMessage = serde_json::from_value(message)
                    .map_err(|e| InterviewError::MalformedEvent(e.to_string()))?;

                WebhookEvent::Transcript {
                    call_id,
                    message: TranscriptMessage {
                        role: message.role,
                        content: message.content,
                        time: message
                            .time
                            .as_ref()
                            .and_then(parse_timestamp)
                            .or(event_time)
                            .unwrap_or(received_at),
                        seconds_from_start: message.seconds_from_start,
                    },
                }
            }
            "assistant-request" => WebhookEvent::AssistantRequest { call_id },
            _ => {
                let ended_at = raw.ended_at.as_ref().and_then(parse_timestamp);
                let cost = raw.cost.as_ref().and_then(number);
                // Reports without a dedicated payload carry the analysis inline
                let report = raw.analysis_payload.unwrap_or(body);

                if kind == "call-end" {
                    WebhookEvent::CallEnd {
                        call_id,
                        ended_at,
                        cost,
                        report,
                    }
                } else {
                    WebhookEvent::EndOfCallReport {
                        call_id,
                        ended_at,
                        cost,
                        report,
                    }
                }
            }
        };

        Ok(event)
    }

    pub fn call_id(&self) -> Option<&str> {
        match self {
            WebhookEvent::CallStart { call_id, .. }
            | WebhookEvent::Transcript { call_id, .. }
            | WebhookEvent::AssistantRequest { call_id }
            | WebhookEvent::CallEnd { call_id, .. }
            | WebhookEvent::EndOfCallReport { call_id, .. } => Some(call_id),
            WebhookEvent::Unknown { .. } => None,
        }
    }
}

fn is_known_kind(kind: &str) -> bool {
    matches!(
        kind,
        "call-start" | "transcript" | "assistant-request" | "call-end" | "end-of-call-report"
    )
}

/// Non-empty string or integer id
fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers, or strings holding one
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// RFC3339 strings or epoch milliseconds
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                s.parse::<i64>()
                    .ok()
                    .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            }),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}
