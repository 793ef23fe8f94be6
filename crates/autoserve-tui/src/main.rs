use anyhow::{Context, Result};
use autoserve_core::{ApiClient, Config, DashboardData};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_or_init()
        .unwrap_or_else(|_| Config::new())
        .with_env();

    let log_path = logging::init(config.log_level())?;
    tracing::info!(
        log = %log_path.display(),
        api = config.api_base_url(),
        vehicle_id = config.vehicle_id(),
        app_id_set = config.app_id.is_some(),
        auth_config_set = config.auth_config.is_some(),
        auth_token_set = config.auth_token.is_some(),
        "autoserve starting"
    );

    let data = match &config.dashboard_file {
        Some(path) => DashboardData::load(path)?,
        None => DashboardData::default(),
    };
    let api = ApiClient::http(config.api_base_url(), config.request_timeout())
        .context("Failed to build API client")?;

    let mut app = App::new(&config, data, api);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    tracing::info!("autoserve exiting");
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}
