mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::Config;
use view::AppView;
use controller::AppController;
use model::{AppModel, TmdbClient};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Flixter Starting ===");

    // Fail before touching the terminal so the message stays readable
    let config = Config::from_env()?;
    tracing::info!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "Configuration loaded");

    let client = TmdbClient::new(&config)?;

    let model = Arc::new(Mutex::new(AppModel::new()));
    let revisions = model.lock().await.subscribe();
    let controller = AppController::new(model.clone(), Arc::new(client));

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    controller.initial_load().await;

    let res = run_app(&mut terminal, model, controller, revisions).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Flixter shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
    mut revisions: watch::Receiver<u64>,
) -> io::Result<()> {
    let mut needs_redraw = true;

    loop {
        let should_quit = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            let changed = revisions.has_changed().unwrap_or(false);
            if changed || needs_redraw {
                let _ = revisions.borrow_and_update();
                needs_redraw = false;

                let ui_state = model_guard.get_ui_state().await;
                let browse = model_guard.get_browse_state().await;
                terminal.draw(|f| {
                    AppView::render(f, &ui_state, &browse);
                })?;
            }

            model_guard.should_quit().await
        };

        if should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if let Err(e) = controller.handle_key_event(key).await {
                        controller.report_error(&e).await;
                    }
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
    }

    Ok(())
}
