mod audio;
mod config;
mod controller;
mod logging;
mod model;
mod settings;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use audio::AudioBackend;
use config::Config;
use controller::AppController;
use model::{AppModel, CatalogClient, PlaybackController};
use settings::{FileStorage, MemoryStorage, SettingsStore, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Jamendo-RS Starting ===");

    let app_dir = config::app_dir();
    let config = match &app_dir {
        Some(dir) => config::load_config(dir)?,
        None => {
            tracing::warn!("No config directory available, using defaults");
            Config::default()
        }
    };

    let settings = SettingsStore::load(open_storage(app_dir.as_deref()));

    let http = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let catalog = CatalogClient::new(http.clone(), config.api_url.as_str());

    let audio_backend = AudioBackend::new(http);
    let player_events = audio_backend.subscribe();

    let player = PlaybackController::new(Box::new(audio_backend));
    let model = Arc::new(AppModel::new(player));
    model.set_volume(config.volume).await;
    let controller = AppController::new(model.clone(), catalog, settings, config);

    controller.start_player_event_listener(player_events);
    controller.spawn_popular_fetch();

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Jamendo-RS shutting down");
    Ok(())
}

/// File-backed storage in the app directory, or an in-memory map when the
/// directory is unavailable.
fn open_storage(dir: Option<&std::path::Path>) -> Box<dyn Storage> {
    match dir.map(FileStorage::open) {
        Some(Ok(storage)) => Box::new(storage),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Could not open storage, settings will not persist");
            Box::new(MemoryStorage::default())
        }
        None => Box::new(MemoryStorage::default()),
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<AppModel>,
    controller: AppController,
) -> Result<()> {
    loop {
        let playback = model.get_playback_info().await;
        let ui_state = model.get_ui_state().await;
        let content_state = model.get_content_state().await;

        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state, &content_state);
        })?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && let Err(e) = controller.handle_key_event(key).await
        {
            tracing::warn!(error = %e, "Key handling failed");
        }

        if model.should_quit().await {
            break;
        }
    }

    Ok(())
}
