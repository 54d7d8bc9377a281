//! Wire events exchanged over the realtime channel.
//!
//! Every frame is a JSON text message of the form
//! `{"event": "<name>", "data": {...}}`.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Conversation (bill) a chat message belongs to.
pub type BillId = i64;

/// Events sent by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// A chat message typed by the user.
    #[serde(rename = "send_message")]
    SendMessage {
        /// Trimmed message text.
        message: String,
        /// Conversation the message belongs to.
        bill_id: BillId,
    },
}

/// A chat message broadcast by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Author display name.
    pub user: String,
    /// Message body.
    pub message: String,
    /// Origin classification: `"user"` for the local user, anything else
    /// (e.g. `"ai"`) for other authors.
    #[serde(rename = "type")]
    pub kind: String,
    /// ISO-8601 timestamp.
    pub timestamp: String,
}

/// Events received from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// A chat message to append to the list.
    #[serde(rename = "new_message")]
    NewMessage(InboundMessage),

    /// Someone connected to the conversation.
    #[serde(rename = "user_joined")]
    UserJoined {
        /// Display name of the new participant.
        username: String,
    },
}

/// Envelope used to peek at the event name before decoding the payload.
#[derive(Debug, Deserialize)]
struct Frame {
    event: String,
}

impl ServerEvent {
    /// Event names this client understands.
    pub const KNOWN: [&'static str; 2] = ["new_message", "user_joined"];

    /// Decode a text frame.
    ///
    /// Returns `Ok(None)` for well-formed frames carrying an event this
    /// client does not handle; malformed frames are an error.
    pub fn decode(text: &str) -> Result<Option<Self>> {
        let frame: Frame = serde_json::from_str(text)?;
        if !Self::KNOWN.contains(&frame.event.as_str()) {
            tracing::debug!(event = %frame.event, "Ignoring unknown realtime event");
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(text)?))
    }
}
