pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod logging;
pub mod ui;

use std::io::{self, Stdout};

use anyhow::Result;
use app::events::{AppEvent, spawn_input_task};
use app::settings::load_runtime_settings;
use app::state::{AppMode, AppState};
use cli::Cli;
use crossterm::{
    event::DisableMouseCapture,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use data::{
    api::ApiClient,
    cache::{ApiCache, default_cache_dir},
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

pub async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    logging::init_logging(cli.log_file.as_deref())?;

    let (settings, settings_path) = load_runtime_settings(&cli, true);
    let client = ApiClient::with_cache(settings.api_url.clone(), open_cache(&cli))?;
    info!("starting skycast against {}", client.base_url());
    let app = AppState::with_client(&cli, settings, settings_path, client);

    let mut terminal = setup_terminal()?;
    let result = run_inner(&mut terminal, app, cli).await;
    restore_terminal(&mut terminal)?;
    result
}

fn open_cache(cli: &Cli) -> ApiCache {
    let Some(dir) = cli.cache_dir.clone().or_else(default_cache_dir) else {
        return ApiCache::in_memory();
    };
    match ApiCache::open(&dir) {
        Ok(cache) => cache,
        Err(err) => {
            warn!("offline cache disabled: {err:#}");
            ApiCache::in_memory()
        }
    }
}

async fn run_inner(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: AppState,
    cli: Cli,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(256);
    let input_stream = spawn_input_task();
    tokio::pin!(input_stream);

    let size = terminal.size()?;
    app.resize_viewport(size.width, size.height);
    tx.send(AppEvent::Bootstrap).await?;

    while app.running {
        tokio::select! {
            maybe_input = input_stream.next() => {
                if let Some(input) = maybe_input {
                    app.handle_event(AppEvent::Input(input), &tx, &cli).await?;
                }
            }
            maybe_event = rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event, &tx, &cli).await?;
                }
            }
        }

        terminal.draw(|frame| ui::render(frame, &app))?;

        if app.mode == AppMode::Quit {
            app.running = false;
        }
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn install_panic_hook() {
    let existing = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        existing(panic);
    }));
}
