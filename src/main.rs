//! Multi-provider chat server and terminal client
//!
//! Entry point: `serve` runs the reply server (default), `chat` runs the
//! widget in the terminal against a running server.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use multi_ai_chat::config::{AppConfig, Cli, Command};
use multi_ai_chat::server::start_server;
use multi_ai_chat::widget::{
    ChatWidget, HttpTransport, SELECT_COMMAND, TerminalView, WidgetSettings, spawn_stdin_events,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let cli = Cli::parse();
    let config = match AppConfig::load_from_cli(&cli) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let command = cli.command.unwrap_or(Command::Serve);
    let default_level = match command {
        Command::Serve => "info",
        Command::Chat => "warn",
    };
    init_tracing(config.logging.json, default_level);

    match command {
        Command::Serve => start_server(config).await,
        Command::Chat => run_terminal_chat(&config).await,
    }
}

/// Initialize tracing (M-LOG-STRUCTURED). Logs go to stderr so the chat view owns stdout.
fn init_tracing(json: bool, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

async fn run_terminal_chat(config: &AppConfig) -> anyhow::Result<()> {
    let transport = Arc::new(HttpTransport::new(&config.widget.server_url)?);
    let view = TerminalView::new(std::io::stdout(), config.widget.provider.clone());
    let widget = ChatWidget::new(view, transport, WidgetSettings::from(&config.widget));

    eprintln!(
        "Conectado a {} (IA: {}). Escribe `{SELECT_COMMAND} <nombre>` para cambiar de IA.",
        config.widget.server_url, config.widget.provider
    );

    let (events_tx, events_rx) = mpsc::channel(32);
    let reader = spawn_stdin_events(events_tx);

    widget.run(events_rx).await;
    reader.abort();
    Ok(())
}
