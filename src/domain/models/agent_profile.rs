use crate::configuration::Config;
use crate::configuration::ConfigKey;

/// Assistant settings configured from the project dashboard. The widget
/// carries these through without validating or interpreting them; the reply
/// source is what acts on them.
#[derive(Clone, Debug)]
pub struct AgentProfile {
    pub welcome_message: String,
    pub system_prompt: String,
    pub model: String,
    pub temperature: String,
    pub max_tokens: String,
    pub top_p: String,
}

impl AgentProfile {
    pub fn from_config() -> AgentProfile {
        return AgentProfile {
            welcome_message: Config::get(ConfigKey::AgentWelcomeMessage),
            system_prompt: Config::get(ConfigKey::AgentSystemPrompt),
            model: Config::get(ConfigKey::AgentModel),
            temperature: Config::get(ConfigKey::AgentTemperature),
            max_tokens: Config::get(ConfigKey::AgentMaxTokens),
            top_p: Config::get(ConfigKey::AgentTopP),
        };
    }

    pub fn as_display_lines(&self) -> Vec<String> {
        return vec![
            format!("Model: {}", self.model),
            format!(
                "Temperature: {}, Max tokens: {}, Top-p: {}",
                self.temperature, self.max_tokens, self.top_p
            ),
            format!("System prompt: {}", self.system_prompt),
            format!("Welcome message: {}", self.welcome_message),
        ];
    }
}
