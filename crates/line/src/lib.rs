//! LINE Messaging API collaborator: inbound webhook event types, outbound
//! message rendering, and the HTTP client behind the [`Messenger`] seam.

pub mod client;
pub mod events;
pub mod messages;

pub use client::{LineClient, LineError, Messenger};
pub use events::{EventSource, MessageContent, PostbackContent, WebhookEvent, WebhookPayload};
pub use messages::{Language, OutboundMessage};
