use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;

use super::InboundFrame;
use super::Message;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AdapterName {
    Mock,
    Remote,
}

impl AdapterName {
    pub fn parse(text: &str) -> Result<AdapterName> {
        for name in AdapterName::iter() {
            if name.to_string() == text {
                return Ok(name);
            }
        }

        bail!(format!("There is no adapter named {text}"))
    }
}

/// Everything an adapter can report back to its session.
#[derive(Clone, Debug)]
pub enum AdapterEvent {
    ChannelOpened,
    ChannelClosed,
    Frame(InboundFrame),
    SendFailed(String),
}

/// An adapter event tagged with the channel generation it belongs to.
#[derive(Clone, Debug)]
pub struct SessionEvent {
    pub generation: u64,
    pub event: AdapterEvent,
}

/// Write side of a session's event channel, pinned to one channel
/// generation. Events arriving after the session has moved on (close or
/// reconnect) are dropped on the receiving end.
#[derive(Clone, Debug)]
pub struct EventSink {
    generation: u64,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventSink {
    pub fn new(generation: u64, tx: mpsc::UnboundedSender<SessionEvent>) -> EventSink {
        return EventSink { generation, tx };
    }

    pub fn send(&self, event: AdapterEvent) {
        let res = self.tx.send(SessionEvent {
            generation: self.generation,
            event,
        });

        if res.is_err() {
            tracing::debug!(
                generation = self.generation,
                "session is gone, dropping adapter event"
            );
        }
    }
}

pub type AdapterBox = Box<dyn Adapter + Send + Sync>;

#[async_trait]
pub trait Adapter {
    fn name(&self) -> AdapterName;

    /// Establishes the adapter's channel. Implementations emit
    /// `ChannelOpened` through the sink once the channel is usable, and
    /// `ChannelClosed` when it dies.
    async fn open(&mut self, sink: EventSink) -> Result<()>;

    /// Tears the channel down. Must be safe to call at any time, including
    /// when no channel is open.
    async fn close(&mut self);

    /// Conversation to pre-fill the widget with. Restartable: the same seed
    /// comes back on every call.
    async fn initial_messages(&self) -> Result<Vec<Message>>;

    /// Hands a user message to the reply source. Replies are never returned
    /// from this call; they arrive through the sink as frames, so delivery
    /// works the same for adapters that answer out-of-band.
    async fn send_message(&mut self, text: &str, sink: EventSink) -> Result<()>;
}
