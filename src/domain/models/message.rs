#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::Author;
use crate::domain::services::identity;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    Normal,
    Error,
}

/// One bubble in the widget's conversation. Immutable once created; ids are
/// assigned by whichever side produced the message.
#[derive(Clone, Debug)]
pub struct Message {
    pub id: String,
    pub author: Author,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    mtype: MessageType,
}

impl Message {
    pub fn new(author: Author, text: &str) -> Message {
        return Message::new_with_type(author, MessageType::Normal, text);
    }

    pub fn new_with_type(author: Author, mtype: MessageType, text: &str) -> Message {
        return Message {
            id: identity::message_id(),
            author,
            text: text.to_string(),
            timestamp: Utc::now(),
            mtype,
        };
    }

    /// Seed bubbles carry fixed ids so replaying the seed conversation after
    /// a reconnect cannot duplicate them.
    pub fn seeded(id: &str, author: Author, text: &str, age_seconds: i64) -> Message {
        return Message {
            id: id.to_string(),
            author,
            text: text.to_string(),
            timestamp: Utc::now() - Duration::seconds(age_seconds),
            mtype: MessageType::Normal,
        };
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }
}
