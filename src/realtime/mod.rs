//! Realtime chat channel.
//!
//! - [`events`]: wire events in both directions
//! - [`connect`]: WebSocket transport split into [`Outbound`] and [`Inbound`]
//! - [`EventSink`]: the outbound seam the messenger writes to

mod connection;
pub mod events;

pub use connection::{Inbound, Outbound, connect};
pub use events::{BillId, ClientEvent, InboundMessage, ServerEvent};

use crate::error::Result;

/// Fire-and-forget sender of client events.
pub trait EventSink: Send + Sync {
    /// Queue an event for transmission. No acknowledgment is awaited.
    fn emit(&self, event: ClientEvent) -> Result<()>;
}
