//! chatmux - Entry Point

use chatmux::config::{KeyBindings, ResolvedConfig};
use chatmux::dispatch::{Dispatcher, HistoryLimits};
use chatmux::messaging::{MessagingClient, OfflineClient};
use chatmux::model::AppError;
use chatmux::source::{
    event_bridge, spawn_terminal_reader, spawn_ticker, MediaDownloads, NetworkProducer,
};
use chatmux::state::SessionModel;
use chatmux::store::SqliteStore;
use chatmux::view::{ColorConfig, PaneStyles};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// chatmux - terminal client for many chat conversations at once
#[derive(Parser, Debug)]
#[command(name = "chatmux")]
#[command(version)]
#[command(about = "Terminal session multiplexer for a multi-conversation chat client")]
pub struct Args {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to the message history database
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Directory where received media is saved
    #[arg(long)]
    pub downloads_dir: Option<PathBuf>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = chatmux::config::load_config_with_precedence(args.config.clone())
            .map_err(AppError::from)?;
        let merged = chatmux::config::merge_config(config_file);
        let with_env = chatmux::config::apply_env_overrides(merged);
        chatmux::config::apply_cli_overrides(with_env, args.db.clone(), args.downloads_dir.clone())
    };
    config.validate().map_err(AppError::from)?;

    chatmux::logging::init(&config.log_file_path).map_err(AppError::from)?;

    info!(config = ?config, "Configuration loaded and resolved");

    run(config, ColorConfig::from_env_and_args(args.no_color))?;
    Ok(())
}

/// Wire the collaborators and run one interactive session.
fn run(config: ResolvedConfig, colors: ColorConfig) -> Result<(), AppError> {
    let store = SqliteStore::open(&config.database_path)?;

    let client: Arc<dyn MessagingClient> = Arc::new(OfflineClient::new());
    client.connect()?;

    let mut dispatcher = Dispatcher::new(
        Arc::clone(&client),
        Box::new(store),
        HistoryLimits {
            window: config.history_window,
            recent_conversations: config.recent_conversations,
        },
    );
    let settings = dispatcher.load_settings();
    let mut model = SessionModel::new(settings, config.contact_order, config.input_char_limit);
    dispatcher.seed(&mut model);

    let (sender, bridge) = event_bridge();
    NetworkProducer::new(
        &client,
        sender.clone(),
        MediaDownloads::new(config.downloads_dir.clone()),
    )
    .register(&client);
    // Detached: exits on its own once the bridge is dropped.
    spawn_ticker(sender.clone(), config.tick_interval()).map_err(chatmux::view::TuiError::from)?;
    let reader = spawn_terminal_reader(sender).map_err(chatmux::view::TuiError::from)?;
    drop(client);

    let result = chatmux::view::run_session(
        model,
        dispatcher,
        &bridge,
        KeyBindings::default(),
        PaneStyles::with_color_config(colors),
    );

    reader.stop();
    if let Err(e) = &result {
        warn!(error = %e, "Session ended with error");
    }
    info!("Session closed");
    result.map_err(AppError::from)
}
