use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::Arg;
use clap::Command;
use owo_colors::OwoColorize;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::shell;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AdapterName;
use crate::domain::services::identity;

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if !config_file_path.parent().unwrap().exists() {
        fs::create_dir_all(config_file_path.parent().unwrap()).await?;
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    let config_path_display = config_file_path.as_os_str().to_str().unwrap();
    println!("Created default config file at {config_path_display}");
    return Ok(());
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for Parley")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running Parley with environment variable RUST_LOG=parley")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn arg_adapter() -> Arg {
    return Arg::new(ConfigKey::Adapter.to_string())
        .short('a')
        .long(ConfigKey::Adapter.to_string())
        .env("PARLEY_ADAPTER")
        .num_args(1)
        .help(format!(
            "The transport adapter the widget talks through: the realtime channel, or the offline demo source. [default: {}]",
            Config::default(ConfigKey::Adapter)
        ))
        .value_parser(PossibleValuesParser::new(AdapterName::VARIANTS));
}

fn arg_remote_url() -> Arg {
    return Arg::new(ConfigKey::RemoteUrl.to_string())
        .long(ConfigKey::RemoteUrl.to_string())
        .env("PARLEY_REMOTE_URL")
        .num_args(1)
        .help(format!(
            "WebSocket endpoint of the assistant backend when using the remote adapter. The client id is appended per session. [default: {}]",
            Config::default(ConfigKey::RemoteUrl)
        ));
}

fn arg_reconnect_delay_ms() -> Arg {
    return Arg::new(ConfigKey::ReconnectDelayMs.to_string())
        .long(ConfigKey::ReconnectDelayMs.to_string())
        .env("PARLEY_RECONNECT_DELAY_MS")
        .num_args(1)
        .help(format!(
            "Time to wait in milliseconds before retrying a dropped channel. [default: {}]",
            Config::default(ConfigKey::ReconnectDelayMs)
        ));
}

fn arg_title() -> Arg {
    return Arg::new(ConfigKey::Title.to_string())
        .short('t')
        .long(ConfigKey::Title.to_string())
        .env("PARLEY_TITLE")
        .num_args(1)
        .help(format!(
            "Widget title shown above the conversation. [default: {}]",
            Config::default(ConfigKey::Title)
        ));
}

fn arg_placeholder() -> Arg {
    return Arg::new(ConfigKey::Placeholder.to_string())
        .long(ConfigKey::Placeholder.to_string())
        .env("PARLEY_PLACEHOLDER")
        .num_args(1)
        .help(format!(
            "Input hint shown before the first message. [default: {}]",
            Config::default(ConfigKey::Placeholder)
        ));
}

fn arg_position() -> Arg {
    return Arg::new(ConfigKey::Position.to_string())
        .long(ConfigKey::Position.to_string())
        .env("PARLEY_POSITION")
        .num_args(1)
        .help(format!(
            "Corner the widget anchors to when embedded. Carried through to hosts; a terminal has no corners. [default: {}]",
            Config::default(ConfigKey::Position)
        ))
        .value_parser(PossibleValuesParser::new([
            "bottom-right",
            "bottom-left",
            "top-right",
            "top-left",
        ]));
}

fn arg_primary_color() -> Arg {
    return Arg::new(ConfigKey::PrimaryColor.to_string())
        .long(ConfigKey::PrimaryColor.to_string())
        .env("PARLEY_PRIMARY_COLOR")
        .num_args(1)
        .help(format!(
            "Accent color hosts use when embedding the widget. Carried through untouched. [default: {}]",
            Config::default(ConfigKey::PrimaryColor)
        ));
}

fn arg_default_open() -> Arg {
    return Arg::new(ConfigKey::DefaultOpen.to_string())
        .long(ConfigKey::DefaultOpen.to_string())
        .env("PARLEY_DEFAULT_OPEN")
        .num_args(1)
        .help(format!(
            "Whether the channel opens as soon as the widget starts, or waits for /open. [default: {}]",
            Config::default(ConfigKey::DefaultOpen)
        ))
        .value_parser(PossibleValuesParser::new(["true", "false"]));
}

fn arg_username() -> Arg {
    return Arg::new(ConfigKey::Username.to_string())
        .short('u')
        .long(ConfigKey::Username.to_string())
        .env("PARLEY_USERNAME")
        .num_args(1)
        .help("Your user name displayed in all chat bubbles.");
}

fn arg_agent_welcome_message() -> Arg {
    return Arg::new(ConfigKey::AgentWelcomeMessage.to_string())
        .long(ConfigKey::AgentWelcomeMessage.to_string())
        .env("PARLEY_AGENT_WELCOME_MESSAGE")
        .num_args(1)
        .help(format!(
            "Welcome message the assistant greets with. [default: {}]",
            Config::default(ConfigKey::AgentWelcomeMessage)
        ));
}

fn arg_agent_system_prompt() -> Arg {
    return Arg::new(ConfigKey::AgentSystemPrompt.to_string())
        .long(ConfigKey::AgentSystemPrompt.to_string())
        .env("PARLEY_AGENT_SYSTEM_PROMPT")
        .num_args(1)
        .help(format!(
            "System prompt configured for the assistant. Carried through to the reply source. [default: {}]",
            Config::default(ConfigKey::AgentSystemPrompt)
        ));
}

fn arg_agent_model() -> Arg {
    return Arg::new(ConfigKey::AgentModel.to_string())
        .long(ConfigKey::AgentModel.to_string())
        .env("PARLEY_AGENT_MODEL")
        .num_args(1)
        .help(format!(
            "Model identifier configured for the assistant. Carried through to the reply source. [default: {}]",
            Config::default(ConfigKey::AgentModel)
        ));
}

fn arg_agent_temperature() -> Arg {
    return Arg::new(ConfigKey::AgentTemperature.to_string())
        .long(ConfigKey::AgentTemperature.to_string())
        .env("PARLEY_AGENT_TEMPERATURE")
        .num_args(1)
        .help(format!(
            "Sampling temperature configured for the assistant. Carried through to the reply source. [default: {}]",
            Config::default(ConfigKey::AgentTemperature)
        ));
}

fn arg_agent_max_tokens() -> Arg {
    return Arg::new(ConfigKey::AgentMaxTokens.to_string())
        .long(ConfigKey::AgentMaxTokens.to_string())
        .env("PARLEY_AGENT_MAX_TOKENS")
        .num_args(1)
        .help(format!(
            "Reply token budget configured for the assistant. Carried through to the reply source. [default: {}]",
            Config::default(ConfigKey::AgentMaxTokens)
        ));
}

fn arg_agent_top_p() -> Arg {
    return Arg::new(ConfigKey::AgentTopP.to_string())
        .long(ConfigKey::AgentTopP.to_string())
        .env("PARLEY_AGENT_TOP_P")
        .num_args(1)
        .help(format!(
            "Nucleus sampling parameter configured for the assistant. Carried through to the reply source. [default: {}]",
            Config::default(ConfigKey::AgentTopP)
        ));
}

pub fn build() -> Command {
    let commands_text = shell::help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") {
                return format!("CHAT {line}").bold().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("parley")
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .arg(arg_adapter())
        .arg(arg_remote_url())
        .arg(arg_reconnect_delay_ms())
        .arg(arg_title())
        .arg(arg_placeholder())
        .arg(arg_position())
        .arg(arg_primary_color())
        .arg(arg_default_open())
        .arg(arg_username())
        .arg(arg_agent_welcome_message())
        .arg(arg_agent_system_prompt())
        .arg(arg_agent_model())
        .arg(arg_agent_temperature())
        .arg(arg_agent_max_tokens())
        .arg(arg_agent_top_p())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("PARLEY_CONFIG_FILE")
                .num_args(1)
                .help(format!(
                    "Path to configuration file [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                ))
                .global(true),
        );
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = dirs::cache_dir().unwrap().join("parley/debug.log");
                    println!("{}", log_path.to_str().unwrap());
                }
                Some(("enum-config", _)) => {
                    println!("{}", ConfigKey::VARIANTS.join("\n"));
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    Config::set(ConfigKey::ClientId, &identity::client_id());

    return Ok(true);
}
