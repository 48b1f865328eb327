#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::domain::models::AdapterBox;
use crate::domain::models::AdapterEvent;
use crate::domain::models::AdapterName;
use crate::domain::models::Author;
use crate::domain::models::ConnectionStatus;
use crate::domain::models::EventSink;
use crate::domain::models::FrameKind;
use crate::domain::models::InboundFrame;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::SessionEvent;
use crate::domain::models::SessionState;

/// Coordinates one widget session: the adapter, the message list, and the
/// connection lifecycle.
///
/// All state mutation happens on the task driving [`SessionClient::tick`],
/// so interleaved async work is serialized the same way the widget's event
/// loop serializes it. Two limitations are deliberate and inherited from the
/// wire contract: the reconnect loop retries forever at a fixed delay, and a
/// reply that never arrives leaves `awaiting_reply` raised.
pub struct SessionClient {
    adapter: AdapterBox,
    state: SessionState,
    reconnect_delay: Duration,
    wanted: bool,
    generation: u64,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    reconnect_at: Option<Instant>,
}

impl SessionClient {
    pub fn new(adapter: AdapterBox, reconnect_delay: Duration) -> SessionClient {
        let (events_tx, events_rx) = mpsc::unbounded_channel::<SessionEvent>();

        return SessionClient {
            adapter,
            state: SessionState::default(),
            reconnect_delay,
            wanted: false,
            generation: 0,
            events_tx,
            events_rx,
            reconnect_at: None,
        };
    }

    pub fn state(&self) -> &SessionState {
        return &self.state;
    }

    pub fn adapter_name(&self) -> AdapterName {
        return self.adapter.name();
    }

    /// Opens the adapter's channel. Idempotent: calling while a channel is
    /// already open or opening does nothing.
    pub async fn open(&mut self) -> Result<()> {
        self.wanted = true;
        if self.state.connection_status != ConnectionStatus::Disconnected {
            return Ok(());
        }

        self.reconnect_at = None;
        self.generation += 1;
        self.state.connection_status = ConnectionStatus::Connecting;

        let sink = self.sink();
        if let Err(err) = self.adapter.open(sink).await {
            tracing::warn!(error = ?err, "channel open failed");
            self.state.last_error = Some(err.to_string());
            self.state.connection_status = ConnectionStatus::Disconnected;
            self.schedule_reconnect();
        }

        return Ok(());
    }

    /// Tears the session down: cancels any pending reconnect and invalidates
    /// events still in flight from the old channel. Safe to call repeatedly.
    pub async fn close(&mut self) {
        self.wanted = false;
        self.reconnect_at = None;
        self.generation += 1;
        self.adapter.close().await;
        self.state.connection_status = ConnectionStatus::Disconnected;
        self.state.awaiting_reply = false;
    }

    /// Sends a user message. Whitespace-only input is dropped before any
    /// adapter interaction. The user bubble is appended optimistically, and
    /// failures surface as an error bubble rather than an `Err`.
    pub async fn send(&mut self, text: &str) -> Result<()> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        self.push_message(Message::new(Author::User, trimmed));
        self.state.awaiting_reply = true;

        let sink = self.sink();
        if let Err(err) = self.adapter.send_message(trimmed, sink).await {
            tracing::warn!(error = ?err, "send failed");
            self.fail_send(&err.to_string());
        }

        return Ok(());
    }

    /// Waits for the next adapter event or the reconnect deadline, whichever
    /// comes first, and applies it.
    pub async fn tick(&mut self) -> Result<()> {
        let deadline = self.reconnect_at;

        tokio::select! {
            event = self.events_rx.recv() => {
                if let Some(event) = event {
                    self.handle_event(event).await?;
                }
            }
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                self.reconnect_at = None;
                tracing::info!("retrying channel");
                self.open().await?;
            }
        }

        return Ok(());
    }

    fn sink(&self) -> EventSink {
        return EventSink::new(self.generation, self.events_tx.clone());
    }

    async fn handle_event(&mut self, event: SessionEvent) -> Result<()> {
        if event.generation != self.generation {
            tracing::debug!(
                event_generation = event.generation,
                current_generation = self.generation,
                "dropping event from a previous channel"
            );
            return Ok(());
        }

        match event.event {
            AdapterEvent::ChannelOpened => {
                self.state.connection_status = ConnectionStatus::Connected;
                self.state.last_error = None;

                match self.adapter.initial_messages().await {
                    Ok(seed) => {
                        for message in seed {
                            self.push_message(message);
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = ?err, "failed to fetch the initial conversation");
                    }
                }
            }
            AdapterEvent::ChannelClosed => {
                self.state.connection_status = ConnectionStatus::Disconnected;
                if self.wanted {
                    self.schedule_reconnect();
                }
            }
            AdapterEvent::Frame(frame) => {
                self.handle_frame(frame);
            }
            AdapterEvent::SendFailed(reason) => {
                self.fail_send(&reason);
            }
        }

        return Ok(());
    }

    fn handle_frame(&mut self, frame: InboundFrame) {
        match frame.kind {
            FrameKind::Typing => {
                self.state.awaiting_reply = true;
            }
            FrameKind::User => {
                // Server echo of our own send; the optimistic append already
                // covered it.
            }
            FrameKind::Assistant => {
                self.push_message(Message::new(Author::Assistant, &frame.display_text()));
                self.state.awaiting_reply = false;
            }
            FrameKind::System => {
                self.push_message(Message::new(Author::System, &frame.display_text()));
                self.state.awaiting_reply = false;
            }
            FrameKind::Error => {
                self.push_message(Message::new_with_type(
                    Author::System,
                    MessageType::Error,
                    &frame.display_text(),
                ));
                self.state.awaiting_reply = false;
            }
            FrameKind::Unknown => {
                tracing::debug!("dropping frame with an unrecognized type");
            }
        }
    }

    fn fail_send(&mut self, reason: &str) {
        self.state.last_error = Some(reason.to_string());
        self.push_message(Message::new_with_type(
            Author::System,
            MessageType::Error,
            &format!("Your message could not be delivered: {reason}"),
        ));
        self.state.awaiting_reply = false;
    }

    fn schedule_reconnect(&mut self) {
        let delay_ms = self.reconnect_delay.as_millis() as u64;
        self.reconnect_at = Some(Instant::now() + self.reconnect_delay);
        tracing::info!(delay_ms, "channel down, retry scheduled");
    }

    fn push_message(&mut self, message: Message) {
        if self
            .state
            .messages
            .iter()
            .any(|existing| return existing.id == message.id)
        {
            tracing::debug!(id = %message.id, "dropping message with a duplicate id");
            return;
        }

        self.state.messages.push(message);
    }
}
