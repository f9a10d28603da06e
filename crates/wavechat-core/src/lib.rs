use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod board;
pub mod color;
pub mod ident;
pub mod scroll;
pub mod stats;

pub use board::{BoardError, ChannelBoard, ChannelTab};
pub use color::{label_color, LabelColor};
pub use ident::{channel_slug, ChannelIds};
pub use scroll::{scroll_decision, ScrollDecision};

/// One chat message as delivered by the gateway. Messages are immutable and
/// keep their arrival order; timestamps are informational and never used to
/// re-sort the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub timestamp: i64,
    pub from_call: String,
    pub message_text: String,
}

/// Bootstrap shape for one channel. All three fields are required on the
/// wire; an entry missing any of them is rejected on its own without
/// aborting the rest of the bootstrap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub messages: Vec<Message>,
    pub users: Vec<String>,
}

impl Channel {
    pub fn from_value(value: &Value) -> Result<Self, BoardError> {
        let channel: Channel =
            serde_json::from_value(value.clone()).map_err(|err| BoardError::MalformedChannel {
                reason: err.to_string(),
            })?;
        if channel.name.is_empty() {
            return Err(BoardError::MalformedChannel {
                reason: "channel name is empty".to_string(),
            });
        }
        Ok(channel)
    }
}

/// Inbound update from the gateway. How these arrive is the transport's
/// business; the board only cares about the mutation they describe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelEvent {
    Message { channel: String, message: Message },
    Join { channel: String, user: String },
    Leave { channel: String, user: String },
}
