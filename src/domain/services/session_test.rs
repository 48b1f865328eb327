use std::collections::HashSet;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::time;

use super::SessionClient;
use crate::domain::models::Adapter;
use crate::domain::models::AdapterEvent;
use crate::domain::models::AdapterName;
use crate::domain::models::Author;
use crate::domain::models::ConnectionStatus;
use crate::domain::models::EventSink;
use crate::domain::models::FrameKind;
use crate::domain::models::InboundFrame;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::infrastructure::adapters::mock::Mock;

const RECONNECT_DELAY: Duration = Duration::from_millis(3000);

#[derive(Default)]
struct FakeHandles {
    opens: AtomicUsize,
    closes: AtomicUsize,
    sink: Mutex<Option<EventSink>>,
}

impl FakeHandles {
    fn emit(&self, event: AdapterEvent) {
        self.sink.lock().unwrap().as_ref().unwrap().send(event);
    }
}

struct FakeAdapter {
    handles: Arc<FakeHandles>,
    fail_open: bool,
}

#[async_trait]
impl Adapter for FakeAdapter {
    fn name(&self) -> AdapterName {
        return AdapterName::Remote;
    }

    #[allow(clippy::implicit_return)]
    async fn open(&mut self, sink: EventSink) -> Result<()> {
        self.handles.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            bail!("connection refused");
        }

        sink.send(AdapterEvent::ChannelOpened);
        *self.handles.sink.lock().unwrap() = Some(sink);
        return Ok(());
    }

    async fn close(&mut self) {
        self.handles.closes.fetch_add(1, Ordering::SeqCst);
    }

    #[allow(clippy::implicit_return)]
    async fn initial_messages(&self) -> Result<Vec<Message>> {
        return Ok(vec![]);
    }

    #[allow(clippy::implicit_return)]
    async fn send_message(&mut self, _text: &str, _sink: EventSink) -> Result<()> {
        return Ok(());
    }
}

fn fake_session(fail_open: bool) -> (SessionClient, Arc<FakeHandles>) {
    let handles = Arc::new(FakeHandles::default());
    let adapter = FakeAdapter {
        handles: handles.clone(),
        fail_open,
    };

    return (
        SessionClient::new(Box::new(adapter), RECONNECT_DELAY),
        handles,
    );
}

fn mock_session(fault_rate: f64) -> SessionClient {
    let adapter = Mock::new("Welcome!", fault_rate);
    return SessionClient::new(Box::new(adapter), RECONNECT_DELAY);
}

async fn open_and_seed(session: &mut SessionClient) -> Result<usize> {
    session.open().await?;
    session.tick().await?;
    return Ok(session.state().messages.len());
}

#[tokio::test(start_paused = true)]
async fn it_appends_two_messages_per_successful_round_trip() -> Result<()> {
    let mut session = mock_session(0.0);
    let seeded = open_and_seed(&mut session).await?;
    assert_eq!(seeded, 4);

    session.send("Hello").await?;
    assert!(session.state().awaiting_reply);
    assert_eq!(session.state().messages.len(), seeded + 1);
    assert_eq!(session.state().messages[seeded].author, Author::User);
    assert_eq!(session.state().messages[seeded].text, "Hello");

    session.tick().await?;
    assert!(!session.state().awaiting_reply);
    assert_eq!(session.state().messages.len(), seeded + 2);

    let reply = session.state().messages.last().unwrap();
    assert_eq!(reply.author, Author::Assistant);
    assert!(reply.text.contains("Hello"));

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_appends_two_messages_per_failed_round_trip() -> Result<()> {
    let mut session = mock_session(1.0);
    let seeded = open_and_seed(&mut session).await?;

    session.send("Hello").await?;
    session.tick().await?;

    assert_eq!(session.state().messages.len(), seeded + 2);
    assert!(!session.state().awaiting_reply);
    assert!(session.state().last_error.is_some());

    let bubble = session.state().messages.last().unwrap();
    assert_eq!(bubble.author, Author::System);
    assert_eq!(bubble.message_type(), MessageType::Error);

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_ignores_blank_sends() -> Result<()> {
    let mut session = mock_session(0.0);
    let seeded = open_and_seed(&mut session).await?;

    session.send("").await?;
    session.send("   ").await?;

    assert_eq!(session.state().messages.len(), seeded);
    assert!(!session.state().awaiting_reply);

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_stays_inert_after_close() -> Result<()> {
    let mut session = mock_session(0.0);
    open_and_seed(&mut session).await?;

    session.send("Hello").await?;
    let count = session.state().messages.len();
    session.close().await;

    // The mock's delayed reply fires after the close. The generation guard
    // has to swallow it without touching the message list.
    let _ = time::timeout(Duration::from_secs(5), session.tick()).await;

    assert_eq!(session.state().messages.len(), count);
    assert!(!session.state().awaiting_reply);
    assert_eq!(
        session.state().connection_status,
        ConnectionStatus::Disconnected
    );

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_reconnects_after_the_fixed_delay() -> Result<()> {
    let (mut session, handles) = fake_session(false);
    session.open().await?;
    session.tick().await?;
    assert_eq!(
        session.state().connection_status,
        ConnectionStatus::Connected
    );
    assert_eq!(handles.opens.load(Ordering::SeqCst), 1);

    handles.emit(AdapterEvent::ChannelClosed);
    session.tick().await?;
    assert_eq!(
        session.state().connection_status,
        ConnectionStatus::Disconnected
    );
    assert_eq!(handles.opens.load(Ordering::SeqCst), 1);

    let started = time::Instant::now();
    session.tick().await?;
    assert!(started.elapsed() >= RECONNECT_DELAY);
    assert_eq!(handles.opens.load(Ordering::SeqCst), 2);

    session.tick().await?;
    assert_eq!(
        session.state().connection_status,
        ConnectionStatus::Connected
    );

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_cancels_the_reconnect_on_close() -> Result<()> {
    let (mut session, handles) = fake_session(false);
    session.open().await?;
    session.tick().await?;

    handles.emit(AdapterEvent::ChannelClosed);
    session.tick().await?;
    session.close().await;

    // Nothing should wake the session any more, no matter how long we wait.
    let res = time::timeout(Duration::from_secs(10), session.tick()).await;

    assert!(res.is_err());
    assert_eq!(handles.opens.load(Ordering::SeqCst), 1);
    assert_eq!(handles.closes.load(Ordering::SeqCst), 1);

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_retries_when_the_first_connect_fails() -> Result<()> {
    let (mut session, handles) = fake_session(true);
    session.open().await?;

    assert_eq!(
        session.state().connection_status,
        ConnectionStatus::Disconnected
    );
    assert!(session.state().last_error.is_some());
    assert_eq!(handles.opens.load(Ordering::SeqCst), 1);

    session.tick().await?;
    assert_eq!(handles.opens.load(Ordering::SeqCst), 2);

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_ignores_duplicate_open_calls() -> Result<()> {
    let (mut session, handles) = fake_session(false);
    session.open().await?;
    session.open().await?;
    assert_eq!(handles.opens.load(Ordering::SeqCst), 1);

    session.tick().await?;
    session.open().await?;
    assert_eq!(handles.opens.load(Ordering::SeqCst), 1);

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_keeps_message_ids_unique_across_many_sends() -> Result<()> {
    let mut session = mock_session(0.0);
    open_and_seed(&mut session).await?;

    for i in 0..100 {
        session.send(&format!("message {i}")).await?;
        session.tick().await?;
    }

    let ids = session
        .state()
        .messages
        .iter()
        .map(|message| return message.id.clone())
        .collect::<HashSet<String>>();

    assert_eq!(ids.len(), session.state().messages.len());

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_strips_markup_from_replies() -> Result<()> {
    let (mut session, handles) = fake_session(false);
    session.open().await?;
    session.tick().await?;

    handles.emit(AdapterEvent::Frame(InboundFrame::assistant("**Hi** there")));
    session.tick().await?;

    let reply = session.state().messages.last().unwrap();
    assert_eq!(reply.author, Author::Assistant);
    assert_eq!(reply.text, "Hi there");

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_discards_user_echo_frames() -> Result<()> {
    let (mut session, handles) = fake_session(false);
    session.open().await?;
    session.tick().await?;

    session.send("Hello").await?;
    let count = session.state().messages.len();

    handles.emit(AdapterEvent::Frame(InboundFrame {
        kind: FrameKind::User,
        message: "Hello".to_string(),
        timestamp: None,
    }));
    session.tick().await?;

    assert_eq!(session.state().messages.len(), count);

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_tracks_typing_frames() -> Result<()> {
    let (mut session, handles) = fake_session(false);
    session.open().await?;
    session.tick().await?;
    assert!(!session.state().awaiting_reply);

    handles.emit(AdapterEvent::Frame(InboundFrame {
        kind: FrameKind::Typing,
        message: "Assistant is typing...".to_string(),
        timestamp: None,
    }));
    session.tick().await?;
    assert!(session.state().awaiting_reply);

    handles.emit(AdapterEvent::Frame(InboundFrame::assistant("All set.")));
    session.tick().await?;
    assert!(!session.state().awaiting_reply);

    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_turns_error_frames_into_error_bubbles() -> Result<()> {
    let (mut session, handles) = fake_session(false);
    session.open().await?;
    session.tick().await?;

    handles.emit(AdapterEvent::Frame(InboundFrame {
        kind: FrameKind::Error,
        message: "Sorry, I encountered an error".to_string(),
        timestamp: None,
    }));
    session.tick().await?;

    let bubble = session.state().messages.last().unwrap();
    assert_eq!(bubble.author, Author::System);
    assert_eq!(bubble.message_type(), MessageType::Error);
    assert!(!session.state().awaiting_reply);

    return Ok(());
}
