#[cfg(test)]
#[path = "frame_test.rs"]
mod tests;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

static BOLD: Lazy<Regex> = Lazy::new(|| return Regex::new(r"\*\*(.*?)\*\*").unwrap());
static EMPHASIS: Lazy<Regex> = Lazy::new(|| return Regex::new(r"\*(.*?)\*").unwrap());
static CODE: Lazy<Regex> = Lazy::new(|| return Regex::new(r"`(.*?)`").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| return Regex::new(r"#{1,6}\s").unwrap());

/// Discriminator on frames arriving over the realtime channel. Kinds this
/// client does not recognize map to `Unknown` rather than failing the parse.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    Typing,
    User,
    Assistant,
    System,
    Error,
    Unknown,
}

impl<'de> Deserialize<'de> for FrameKind {
    fn deserialize<D>(deserializer: D) -> Result<FrameKind, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        let kind = match raw.as_str() {
            "typing" => FrameKind::Typing,
            "user" => FrameKind::User,
            "assistant" => FrameKind::Assistant,
            "system" => FrameKind::System,
            "error" => FrameKind::Error,
            _ => FrameKind::Unknown,
        };

        return Ok(kind);
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InboundFrame {
    #[serde(rename = "type")]
    pub kind: FrameKind,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl InboundFrame {
    pub fn parse(raw: &str) -> serde_json::Result<InboundFrame> {
        return serde_json::from_str(raw);
    }

    pub fn assistant(message: &str) -> InboundFrame {
        return InboundFrame {
            kind: FrameKind::Assistant,
            message: message.to_string(),
            timestamp: None,
        };
    }

    /// Replies may carry light markdown the widget has no renderer for.
    /// Emphasis, inline code, and heading markers are stripped down to plain
    /// text before display.
    pub fn display_text(&self) -> String {
        let text = BOLD.replace_all(&self.message, "$1");
        let text = EMPHASIS.replace_all(&text, "$1");
        let text = CODE.replace_all(&text, "$1");
        let text = HEADING.replace_all(&text, "");

        return text.trim().to_string();
    }
}

/// What the widget puts on the wire for every user message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundFrame {
    pub message: String,
    pub user_id: String,
    pub session_id: String,
}
