//! Voice platform webhook handling
//!
//! Raw JSON bodies are parsed into the closed `WebhookEvent` enum and dispatched by
//! `WebhookRouter`. Unknown kinds parse successfully (as `Unknown`) so they can be
//! logged and answered without error.

pub mod event;
pub mod router;

pub use event::{parse_timestamp, RawEvent, WebhookEvent};
pub use router::{AssistantReply, WebhookRouter};
