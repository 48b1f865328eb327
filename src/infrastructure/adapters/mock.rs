#[cfg(test)]
#[path = "mock_test.rs"]
mod tests;

use std::ops::RangeInclusive;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use tokio::time;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Adapter;
use crate::domain::models::AdapterEvent;
use crate::domain::models::AdapterName;
use crate::domain::models::Author;
use crate::domain::models::EventSink;
use crate::domain::models::InboundFrame;
use crate::domain::models::Message;

const HISTORY_DELAY_MS: RangeInclusive<u64> = 300..=500;
const REPLY_DELAY_MS: RangeInclusive<u64> = 500..=1200;

/// Roughly one send in sixteen fails on purpose, so integrators see the
/// widget's error path without having to unplug anything.
const FAULT_RATE: f64 = 0.06;

fn seed_conversation(welcome_message: &str) -> Vec<Message> {
    return vec![
        Message::seeded("seed-1", Author::Assistant, "Hi! How can I help you today?", 10),
        Message::seeded("seed-2", Author::User, "I need help with my account", 8),
        Message::seeded(
            "seed-3",
            Author::Assistant,
            "I'd be happy to help you with your account. What specific issue are you experiencing?",
            5,
        ),
        Message::seeded("seed-welcome", Author::Assistant, welcome_message, 0),
    ];
}

/// Offline reply source: canned history, synthesized replies, simulated
/// latency. Lets the widget run as a demo with no backend at all.
pub struct Mock {
    welcome_message: String,
    fault_rate: f64,
}

impl Mock {
    pub fn new(welcome_message: &str, fault_rate: f64) -> Mock {
        return Mock {
            welcome_message: welcome_message.to_string(),
            fault_rate,
        };
    }
}

impl Default for Mock {
    fn default() -> Mock {
        return Mock::new(&Config::get(ConfigKey::AgentWelcomeMessage), FAULT_RATE);
    }
}

#[async_trait]
impl Adapter for Mock {
    fn name(&self) -> AdapterName {
        return AdapterName::Mock;
    }

    #[allow(clippy::implicit_return)]
    async fn open(&mut self, sink: EventSink) -> Result<()> {
        // There is no channel to establish; the mock is always reachable.
        sink.send(AdapterEvent::ChannelOpened);
        return Ok(());
    }

    async fn close(&mut self) {}

    #[allow(clippy::implicit_return)]
    async fn initial_messages(&self) -> Result<Vec<Message>> {
        let delay = rand::thread_rng().gen_range(HISTORY_DELAY_MS);
        time::sleep(Duration::from_millis(delay)).await;

        return Ok(seed_conversation(&self.welcome_message));
    }

    #[allow(clippy::implicit_return)]
    async fn send_message(&mut self, text: &str, sink: EventSink) -> Result<()> {
        let (delay, fault) = {
            let mut rng = rand::thread_rng();
            (
                Duration::from_millis(rng.gen_range(REPLY_DELAY_MS)),
                rng.gen_bool(self.fault_rate),
            )
        };

        let text = text.to_string();
        tokio::spawn(async move {
            time::sleep(delay).await;

            if fault {
                sink.send(AdapterEvent::SendFailed(
                    "simulated transient network failure".to_string(),
                ));
                return;
            }

            sink.send(AdapterEvent::Frame(InboundFrame::assistant(&format!(
                "Thanks for your message: \"{text}\". This is a demo reply."
            ))));
        });

        return Ok(());
    }
}
