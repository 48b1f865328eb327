use super::Message;

#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// Live state of one widget session. Owned and mutated exclusively by the
/// session client; the presentation layer only reads it.
#[derive(Debug)]
pub struct SessionState {
    pub connection_status: ConnectionStatus,
    pub messages: Vec<Message>,
    pub awaiting_reply: bool,
    pub last_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> SessionState {
        return SessionState {
            connection_status: ConnectionStatus::Disconnected,
            messages: vec![],
            awaiting_reply: false,
            last_error: None,
        };
    }
}
