mod common;
mod config;
mod network;
mod notify;
mod ui;

use clap::Parser;
use dotenvy::dotenv;
use network::{ApiClient, ChatClient};
use notify::{Chime, Notifier, Silent};
use tokio::sync::mpsc;
use ui::ChatApp;
use ui::state::AppState;

#[derive(Parser)]
#[command(
    name = "private_chat",
    version,
    about = "Desktop client for one-to-one chat"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Chat server base URL, e.g. http://127.0.0.1:5000
    #[arg(long, value_name = "URL")]
    server: Option<String>,
    /// Username of the signed-in account
    #[arg(long, value_name = "NAME")]
    user: Option<String>,
    /// Session cookie issued by the server at login (`session=...`)
    #[arg(long, value_name = "COOKIE")]
    cookie: Option<String>,
    /// Disable the incoming-message chime
    #[arg(long)]
    mute: bool,
    /// Write the effective settings back to the config file
    #[arg(long)]
    remember: bool,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    // 1. Resolve settings: config file, then command-line overrides
    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    if let Some(server) = cli.server {
        app_config.server_url = server;
    }
    if let Some(user) = cli.user {
        app_config.username = Some(user);
    }
    if let Some(cookie) = cli.cookie {
        app_config.session_cookie = Some(cookie);
    }
    if cli.mute {
        app_config.notification_sound = false;
    }

    if cli.remember {
        match config::save_config(&cli.config, &app_config) {
            Ok(()) => log::info!("Saved settings to {}", cli.config),
            Err(err) => log::error!("Failed to write config {}: {err}", cli.config),
        }
    }

    let Some(local_user) = app_config.username.clone() else {
        log::error!("No username configured; pass --user or set it in {}", cli.config);
        return Ok(());
    };

    let api = match ApiClient::new(app_config.base_url(), app_config.session_cookie.as_deref()) {
        Ok(api) => api,
        Err(err) => {
            log::error!("Failed to build HTTP client: {err}");
            return Ok(());
        }
    };

    // 2. Create channels
    // UI -> Network
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Network -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    // 3. Start the network task in the background
    let client = ChatClient::new(api, app_config.session_cookie.clone(), event_tx, cmd_rx);
    tokio::spawn(client.run());

    // 4. Run the UI on the main thread

    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let base_url = app_config.base_url().to_string();
    let notifier: Box<dyn Notifier> = if app_config.notification_sound {
        Box::new(Chime)
    } else {
        Box::new(Silent)
    };
    let mut notifier = Some(notifier);
    let state = AppState::new(local_user.clone(), app_config.foreign_messages);
    let mut state = Some(state);

    eframe::run_native(
        "Private Chat",
        options,
        Box::new(move |cc| {
            let (Some(event_receiver), Some(notifier), Some(state)) =
                (event_rx.take(), notifier.take(), state.take())
            else {
                return Err("ChatApp should only be initialized once".into());
            };

            log::info!("Client started for {local_user} against {base_url}");

            Ok(Box::new(ChatApp::new(
                cc,
                state,
                base_url.clone(),
                notifier,
                cmd_tx.clone(),
                event_receiver,
            )))
        }),
    )
}
