#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;
use std::time::Duration;

use anyhow::Error;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::application::cli;
use crate::application::shell;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AdapterName;
use crate::domain::services::SessionClient;
use crate::infrastructure::adapters::AdapterManager;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        format!(
            "Oh no! Parley has failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        )
        .red()
    );

    process::exit(1);
}

async fn run() -> Result<()> {
    let adapter_name = AdapterName::parse(&Config::get(ConfigKey::Adapter))?;
    let adapter = AdapterManager::get(adapter_name)?;
    let reconnect_delay =
        Duration::from_millis(Config::get(ConfigKey::ReconnectDelayMs).parse::<u64>()?);
    let session = SessionClient::new(adapter, reconnect_delay);

    return shell::start(session).await;
}

#[tokio::main]
async fn main() {
    let debug_log_dir = env::var("PARLEY_LOG_DIR").unwrap_or_else(|_| {
        return dirs::cache_dir()
            .unwrap()
            .join("parley")
            .to_string_lossy()
            .to_string();
    });

    let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("parley")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    let ready_res = cli::parse().await;
    if let Err(ready_err) = ready_res {
        handle_error(ready_err);
        return;
    }
    if !ready_res.unwrap() {
        process::exit(0);
    }

    if let Err(err) = run().await {
        handle_error(err);
    }

    process::exit(0);
}
