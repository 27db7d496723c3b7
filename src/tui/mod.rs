//! Terminal UI for Oracle Chess

mod app;
mod input;
mod ui;

use crate::config::ClientConfig;
use crate::controller::{BoardUpdate, ChannelBoard, ControllerHandle, TurnController};
use crate::oracle::{HttpOracle, OracleClient};
use anyhow::Result;
use app::{App, AppAction};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Run the terminal client against the oracle named in `config`
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    // Log to a file so the terminal stays clean
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,oracle_chess=debug")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(oracle_url = %config.oracle_url(), human = %config.human_color(), "Starting Oracle Chess TUI");

    let oracle = HttpOracle::new(config.oracle_url(), config.request_timeout())?
        .with_difficulty(*config.difficulty());

    let mut app = App::new(*config.human_color(), oracle.name());
    if let Err(e) = oracle.health().await {
        // Play can still start; the first oracle turn will surface the error
        warn!(error = %e, "Oracle health check failed");
        app.handle_update(BoardUpdate::Error(e.to_string()));
    }

    let (board, mut updates) = ChannelBoard::channel();
    let controller = TurnController::new(board, Arc::new(oracle), *config.human_color());
    let handle = controller.handle();
    let controller_task = tokio::spawn(controller.run());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_game_loop(&mut terminal, &mut app, &handle, &mut updates).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if handle.shutdown().is_ok() {
        if let Err(e) = controller_task.await {
            error!(error = %e, "Controller task failed");
        }
    }

    if let Err(err) = res {
        error!(error = ?err, "Game loop error");
        eprintln!("Error: {:?}", err);
    }

    info!("TUI exited");
    Ok(())
}

/// Draws, drains board updates and forwards key presses until the user quits.
#[instrument(skip_all)]
async fn run_game_loop(
    terminal: &mut Tui,
    app: &mut App,
    handle: &ControllerHandle,
    updates: &mut mpsc::UnboundedReceiver<BoardUpdate>,
) -> Result<()> {
    loop {
        while let Ok(update) = updates.try_recv() {
            app.handle_update(update);
        }

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Key polling blocks, so keep it off the async workers
        let key = tokio::task::block_in_place(|| -> io::Result<_> {
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        return Ok(Some(key.code));
                    }
                }
            }
            Ok(None)
        })?;

        let Some(code) = key else {
            continue;
        };

        let sent = match app.handle_key(code) {
            Some(AppAction::Quit) => {
                info!("User quit");
                return Ok(());
            }
            Some(AppAction::Move(origin, destination)) => {
                debug!(%origin, %destination, "Sending move to controller");
                handle.human_move(origin, destination)
            }
            Some(AppAction::NewGame) => handle.new_game(),
            Some(AppAction::RetryOracle) => handle.retry_oracle(),
            None => Ok(()),
        };
        sent?;
    }
}
