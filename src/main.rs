mod audio;
mod controller;
mod logging;
mod model;
mod player;
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
use tokio::sync::Mutex;

use audio::{NullOutput, RodioOutput};
use controller::AppController;
use model::{AppModel, DjClient, FileKvStore};
use view::AppView;

const CACHE_DIR: &str = ".cache";
const DEFAULT_VOLUME: f32 = 1.0;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== MoodPlay Starting ===");

    let store = Arc::new(FileKvStore::open(CACHE_DIR));
    let dj = DjClient::new(std::env::var("GEMINI_API_KEY").ok());
    let app_model = AppModel::new(store, dj);

    let initial_queue = app_model.catalog_tracks().await;
    let model = Arc::new(Mutex::new(app_model));

    // The playback engine's input channel exists before the engine so the
    // media output can report into it.
    let (engine_tx, engine_rx) = player::channel();
    let (player, mut failures) = match RodioOutput::start(engine_tx.clone()) {
        Ok(output) => player::spawn(output, engine_tx, engine_rx, initial_queue, DEFAULT_VOLUME),
        Err(e) => {
            tracing::warn!(error = %e, "No audio device, playback requests will fail visibly");
            model
                .lock()
                .await
                .set_error(format!("No audio output device: {e}"))
                .await;
            let output = NullOutput::new(engine_tx.clone());
            player::spawn(output, engine_tx, engine_rx, initial_queue, DEFAULT_VOLUME)
        }
    };

    // Playback failures show up as transient notifications.
    let model_for_failures = model.clone();
    tokio::spawn(async move {
        while let Some(message) = failures.recv().await {
            model_for_failures.lock().await.set_error(message).await;
        }
    });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let controller = AppController::new(model.clone(), player.clone());
    controller.start_connectivity_monitor();

    let res = run_app(&mut terminal, model, controller).await;

    player.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("MoodPlay shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        // Get current state
        let (catalog, ui_state, chat, ratings, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (
                model_guard.catalog_tracks().await,
                model_guard.get_ui_state().await,
                model_guard.chat_snapshot().await,
                model_guard.rating_snapshot().await,
                model_guard.should_quit().await,
            )
        };
        let playback = controller.player.snapshot();

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &catalog, &playback, &ui_state, &chat, &ratings);
        })?;

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let _ = controller.handle_key_event(key).await;
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
