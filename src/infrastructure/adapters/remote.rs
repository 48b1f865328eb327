#[cfg(test)]
#[path = "remote_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use futures::SinkExt;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Adapter;
use crate::domain::models::AdapterEvent;
use crate::domain::models::AdapterName;
use crate::domain::models::EventSink;
use crate::domain::models::InboundFrame;
use crate::domain::models::Message;
use crate::domain::models::OutboundFrame;
use crate::domain::services::identity;

/// Realtime reply source: a WebSocket to the assistant backend, one channel
/// per widget session, addressed by the session's client id.
pub struct Remote {
    url: String,
    client_id: String,
    session_id: String,
    outbound: Option<mpsc::UnboundedSender<OutboundFrame>>,
    worker: Option<JoinHandle<()>>,
}

impl Default for Remote {
    fn default() -> Remote {
        let client_id = Config::get(ConfigKey::ClientId);

        return Remote {
            url: Config::get(ConfigKey::RemoteUrl),
            session_id: identity::session_id(&client_id),
            client_id,
            outbound: None,
            worker: None,
        };
    }
}

#[async_trait]
impl Adapter for Remote {
    fn name(&self) -> AdapterName {
        return AdapterName::Remote;
    }

    #[allow(clippy::implicit_return)]
    async fn open(&mut self, sink: EventSink) -> Result<()> {
        // At most one live channel per adapter.
        self.close().await;

        let endpoint = format!("{url}{client_id}", url = self.url, client_id = self.client_id);
        tracing::debug!(endpoint = %endpoint, "opening channel");

        let (stream, _) = connect_async(endpoint.as_str()).await?;
        let (mut write, mut read) = stream.split();

        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<OutboundFrame>();
        self.outbound = Some(outbound_tx);

        self.worker = Some(tokio::spawn(async move {
            sink.send(AdapterEvent::ChannelOpened);

            loop {
                tokio::select! {
                    inbound = read.next() => {
                        match inbound {
                            Some(Ok(WsMessage::Text(raw))) => {
                                match InboundFrame::parse(&raw) {
                                    Ok(frame) => sink.send(AdapterEvent::Frame(frame)),
                                    Err(err) => {
                                        tracing::warn!(error = ?err, "dropping malformed frame");
                                    }
                                }
                            }
                            Some(Ok(WsMessage::Ping(payload))) => {
                                if write.send(WsMessage::Pong(payload)).await.is_err() {
                                    break;
                                }
                            }
                            Some(Ok(WsMessage::Close(_))) => break,
                            Some(Ok(_)) => {}
                            Some(Err(err)) => {
                                tracing::warn!(error = ?err, "channel read failed");
                                break;
                            }
                            None => break,
                        }
                    }
                    frame = outbound_rx.recv() => {
                        match frame {
                            Some(frame) => {
                                match serde_json::to_string(&frame) {
                                    Ok(payload) => {
                                        if write.send(WsMessage::Text(payload)).await.is_err() {
                                            break;
                                        }
                                    }
                                    Err(err) => {
                                        tracing::error!(error = ?err, "failed to serialize outbound frame");
                                    }
                                }
                            }
                            None => break,
                        }
                    }
                }
            }

            let _ = write.send(WsMessage::Close(None)).await;
            sink.send(AdapterEvent::ChannelClosed);
        }));

        return Ok(());
    }

    async fn close(&mut self) {
        self.outbound = None;
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }

    #[allow(clippy::implicit_return)]
    async fn initial_messages(&self) -> Result<Vec<Message>> {
        // The backend replays nothing; it opens with its own welcome frame.
        return Ok(vec![]);
    }

    #[allow(clippy::implicit_return)]
    async fn send_message(&mut self, text: &str, sink: EventSink) -> Result<()> {
        if let Some(outbound) = &self.outbound {
            if !outbound.is_closed() {
                outbound.send(OutboundFrame {
                    message: text.to_string(),
                    user_id: self.client_id.clone(),
                    session_id: self.session_id.clone(),
                })?;

                return Ok(());
            }
        }

        // No realtime channel right now. The widget still answers, with a
        // canned reply, instead of dropping the send on the floor.
        sink.send(AdapterEvent::Frame(InboundFrame::assistant(&format!(
            "Thanks for your message: \"{text}\". The realtime channel is offline, so this is a canned reply."
        ))));

        return Ok(());
    }
}
