//! Realtime chat panel view-model.
//!
//! The messenger owns the input buffer and the rendered message list for
//! one conversation. Outbound messages go to an [`EventSink`]; inbound
//! server events are applied with [`Messenger::apply`]. Messages are kept
//! in receipt order with no reordering or deduplication.

use uuid::Uuid;

use crate::error::Result;
use crate::realtime::{BillId, ClientEvent, EventSink, InboundMessage, ServerEvent};
use crate::view::{escape_html, time_of_day};

/// Who authored a message, relative to the local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Sent by the local user (`type == "user"`).
    SelfAuthored,
    /// Any other classification, kept verbatim.
    Other(String),
}

impl Origin {
    /// Classify an inbound `type` field.
    pub fn classify(kind: &str) -> Self {
        if kind == "user" {
            Self::SelfAuthored
        } else {
            Self::Other(kind.to_string())
        }
    }
}

/// Presentation classes for one message bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleStyle {
    pub row: &'static str,
    pub bubble: &'static str,
    pub header: &'static str,
    pub body: &'static str,
    pub timestamp: &'static str,
}

const SELF_STYLE: BubbleStyle = BubbleStyle {
    row: "flex justify-end chat-message",
    bubble: "rounded-lg p-4 max-w-3/4 bg-blue-500 text-white",
    header: "font-semibold text-blue-100",
    body: "text-white",
    timestamp: "text-xs mt-1 text-blue-200",
};

const OTHER_STYLE: BubbleStyle = BubbleStyle {
    row: "flex justify-start chat-message",
    bubble: "rounded-lg p-4 max-w-3/4 bg-blue-100 text-gray-700",
    header: "font-semibold text-blue-800",
    body: "text-gray-700",
    timestamp: "text-xs mt-1 text-gray-500",
};

/// A rendered chat message. Immutable once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    id: Uuid,
    author: String,
    body: String,
    origin: Origin,
    timestamp: String,
}

impl ChatMessage {
    fn from_inbound(msg: InboundMessage) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin: Origin::classify(&msg.kind),
            author: msg.user,
            body: msg.message,
            timestamp: msg.timestamp,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Raw timestamp as received.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn style(&self) -> BubbleStyle {
        match self.origin {
            Origin::SelfAuthored => SELF_STYLE,
            Origin::Other(_) => OTHER_STYLE,
        }
    }

    /// HTML for this message. Author and body are escaped.
    pub fn render(&self) -> String {
        let style = self.style();
        format!(
            r#"<div id="msg-{id}" class="{row}"><div class="{bubble}"><div class="{header}">{author}</div><div class="{body}">{text}</div><div class="{ts}">{time}</div></div></div>"#,
            id = self.id,
            row = style.row,
            bubble = style.bubble,
            header = style.header,
            author = escape_html(&self.author),
            body = style.body,
            text = escape_html(&self.body),
            ts = style.timestamp,
            time = time_of_day(&self.timestamp),
        )
    }

    /// Single-line plain text form for terminals.
    pub fn to_line(&self) -> String {
        format!(
            "[{}] {}: {}",
            time_of_day(&self.timestamp),
            self.author,
            self.body
        )
    }
}

/// One entry of the message list.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A chat message.
    Message(ChatMessage),
    /// Someone joined the conversation.
    Presence { id: Uuid, username: String },
}

impl Entry {
    pub fn id(&self) -> Uuid {
        match self {
            Self::Message(msg) => msg.id(),
            Self::Presence { id, .. } => *id,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Message(msg) => msg.render(),
            Self::Presence { id, username } => format!(
                r#"<div id="msg-{id}" class="text-center text-xs text-gray-400 chat-presence">{} joined</div>"#,
                escape_html(username)
            ),
        }
    }

    pub fn to_line(&self) -> String {
        match self {
            Self::Message(msg) => msg.to_line(),
            Self::Presence { username, .. } => format!("* {username} joined"),
        }
    }
}

/// Chat panel state for one conversation.
pub struct Messenger {
    sink: Box<dyn EventSink>,
    bill_id: BillId,
    input: String,
    entries: Vec<Entry>,
    scroll_anchor: Option<Uuid>,
}

impl std::fmt::Debug for Messenger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Messenger")
            .field("bill_id", &self.bill_id)
            .field("input", &self.input)
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl Messenger {
    pub fn new(sink: Box<dyn EventSink>, bill_id: BillId) -> Self {
        Self {
            sink,
            bill_id,
            input: String::new(),
            entries: Vec::new(),
            scroll_anchor: None,
        }
    }

    pub fn bill_id(&self) -> BillId {
        self.bill_id
    }

    /// Current input text.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input text (typing).
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Send the trimmed input, then clear it.
    ///
    /// Returns `Ok(false)` without touching the input when it is empty or
    /// whitespace-only.
    pub fn send_message(&mut self) -> Result<bool> {
        let message = self.input.trim();
        if message.is_empty() {
            return Ok(false);
        }
        self.sink.emit(ClientEvent::SendMessage {
            message: message.to_string(),
            bill_id: self.bill_id,
        })?;
        tracing::debug!(
            name: "chat.message.sent",
            bill_id = self.bill_id,
            len = message.len(),
            "Chat message sent"
        );
        self.input.clear();
        Ok(true)
    }

    /// Send-button handler.
    pub fn click_send(&mut self) -> Result<bool> {
        self.send_message()
    }

    /// Key handler for the input field. Only `Enter` sends.
    pub fn key_press(&mut self, key: &str) -> Result<bool> {
        if key == "Enter" {
            self.send_message()
        } else {
            Ok(false)
        }
    }

    /// Apply a server event and return the entry it produced.
    pub fn apply(&mut self, event: ServerEvent) -> &Entry {
        let entry = match event {
            ServerEvent::NewMessage(msg) => Entry::Message(ChatMessage::from_inbound(msg)),
            ServerEvent::UserJoined { username } => Entry::Presence {
                id: Uuid::new_v4(),
                username,
            },
        };
        self.scroll_anchor = Some(entry.id());
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Chat messages only, in receipt order.
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Message(msg) => Some(msg),
            Entry::Presence { .. } => None,
        })
    }

    /// Entry the view should be scrolled to (the newest one).
    pub fn scroll_anchor(&self) -> Option<Uuid> {
        self.scroll_anchor
    }

    /// HTML for the message list and input area.
    pub fn render(&self) -> String {
        let mut list = String::new();
        for entry in &self.entries {
            list.push_str(&entry.render());
        }
        let anchor = self
            .scroll_anchor
            .map(|id| format!(r#" data-scroll-to="msg-{id}""#))
            .unwrap_or_default();
        format!(
            r#"<div id="chat-messages" class="flex-1 overflow-y-auto p-4 space-y-4"{anchor}>{list}</div>
<div class="border-t p-4 flex space-x-2">
    <input id="message-input" type="text" class="flex-1 border border-gray-300 rounded-lg px-4 py-2" placeholder="Type your message..." value="{input}">
    <button id="send-button" class="bg-blue-500 text-white px-6 py-2 rounded-lg hover:bg-blue-600">Send</button>
</div>"#,
            input = escape_html(&self.input),
        )
    }
}
