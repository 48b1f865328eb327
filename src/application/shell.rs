use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AgentProfile;
use crate::domain::models::Author;
use crate::domain::models::ConnectionStatus;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::SessionState;
use crate::domain::models::SlashCommand;
use crate::domain::services::SessionClient;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /open (/o) - Open the realtime channel, like expanding the widget.
- /close - Close the channel without quitting.
- /status (/s) - Show the connection status and widget configuration.
- /agent (/a) - Show the assistant profile configured for this project.
- /help (/h) - Provides this help menu.
- /quit /exit (/q) - Exit Parley.

Anything else you type is sent to the assistant.
    "#;

    return text.trim().to_string();
}

fn format_message(message: &Message) -> String {
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    let prefix = format!("[{time}] {}:", message.author.to_string());

    let styled_prefix = match message.author {
        Author::User => prefix.blue().to_string(),
        Author::Assistant => prefix.green().to_string(),
        Author::System => prefix.yellow().to_string(),
    };

    if message.message_type() == MessageType::Error {
        return format!("{styled_prefix} {}", message.text.red());
    }

    return format!("{styled_prefix} {}", message.text);
}

fn print_status(session: &SessionClient) {
    let state = session.state();

    println!("Connection: {}", state.connection_status);
    if let Some(err) = &state.last_error {
        println!("Last error: {err}");
    }
    println!("Adapter: {}", session.adapter_name());
    println!(
        "Widget: title=\"{}\" position={} primary-color={} default-open={}",
        Config::get(ConfigKey::Title),
        Config::get(ConfigKey::Position),
        Config::get(ConfigKey::PrimaryColor),
        Config::get(ConfigKey::DefaultOpen),
    );
}

fn print_agent_profile() {
    for line in AgentProfile::from_config().as_display_lines() {
        println!("{line}");
    }
}

/// Tracks how much of the session state has already been printed, so each
/// pass only appends what changed.
struct Renderer {
    rendered: usize,
    typing_shown: bool,
    last_status: ConnectionStatus,
}

impl Renderer {
    fn new(state: &SessionState) -> Renderer {
        return Renderer {
            rendered: 0,
            typing_shown: false,
            last_status: state.connection_status,
        };
    }

    fn render(&mut self, state: &SessionState) {
        if state.connection_status != self.last_status {
            self.last_status = state.connection_status;
            println!("{}", format!("[channel {}]", state.connection_status).dimmed());
        }

        while self.rendered < state.messages.len() {
            println!("{}", format_message(&state.messages[self.rendered]));
            self.rendered += 1;
        }

        if state.awaiting_reply && !self.typing_shown {
            println!("{}", "Assistant is typing...".dimmed());
            self.typing_shown = true;
        }
        if !state.awaiting_reply {
            self.typing_shown = false;
        }
    }
}

async fn handle_line(session: &mut SessionClient, line: &str) -> Result<bool> {
    if let Some(command) = SlashCommand::parse(line) {
        if command.is_quit() {
            return Ok(true);
        }
        if command.is_open() {
            session.open().await?;
            return Ok(false);
        }
        if command.is_close() {
            session.close().await;
            return Ok(false);
        }
        if command.is_status() {
            print_status(session);
            return Ok(false);
        }
        if command.is_agent() {
            print_agent_profile();
            return Ok(false);
        }
        if command.is_help() {
            println!("{}", help_text());
            return Ok(false);
        }
    }

    session.send(line).await?;
    return Ok(false);
}

pub async fn start(mut session: SessionClient) -> Result<()> {
    println!("{}", Config::get(ConfigKey::Title).bold());
    println!(
        "{}",
        format!("{} Run /help for commands.", Config::get(ConfigKey::Placeholder)).dimmed()
    );

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if input_tx.send(line).is_err() {
                return;
            }
        }
    });

    if Config::get(ConfigKey::DefaultOpen) == "true" {
        session.open().await?;
    }

    let mut renderer = Renderer::new(session.state());

    loop {
        renderer.render(session.state());

        tokio::select! {
            line = input_rx.recv() => {
                match line {
                    Some(line) => {
                        if handle_line(&mut session, &line).await? {
                            break;
                        }
                    }
                    // stdin is gone; treat it like closing the widget.
                    None => break,
                }
            }
            res = session.tick() => {
                res?;
            }
        }
    }

    session.close().await;
    return Ok(());
}
