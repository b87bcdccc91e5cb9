// ============================================================================
// NiftyWatch - Watchlist NSE dans le terminal
// ============================================================================
// Programme TUI : watchlist de symboles indiens, fil de news, panneau de
// détail avec graphique 30 jours.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère résultats, rendering et événements
// 3. Async dans sync : runtime tokio pour le worker et les timers
// 4. Channels : l'UI ne bloque jamais sur le réseau
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{debug, error, info, warn};

use niftywatch::api::{NewsClient, NseClient};
use niftywatch::app::App;
use niftywatch::config::{self, Config, NEWS_REFRESH, WATCHLIST_REFRESH};
use niftywatch::fetcher::QuoteFetcher;
use niftywatch::market_clock::MarketSession;
use niftywatch::scheduler::{Scheduler, Tick};
use niftywatch::ui::{dashboard, events::EventHandler, render, Event};
use niftywatch::watchlist::WatchlistStore;
use niftywatch::worker::{spawn_worker, AppCommand, AppMessage, Worker};

// ============================================================================
// Logging
// ============================================================================

/// Initialise le logging vers un fichier avec rotation quotidienne
///
/// Les logs sont écrits dans `<data_dir>/niftywatch/logs/niftywatch.log`
/// (ex: ~/.local/share/niftywatch/logs sur Linux), ou `./logs` si ce
/// dossier n'est pas accessible.
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/niftywatch/logs/niftywatch.log
/// RUST_LOG=niftywatch=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let preferred = config::app_data_dir().join("logs");
    let log_dir = match std::fs::create_dir_all(&preferred) {
        Ok(()) => preferred,
        Err(_) => {
            let fallback = PathBuf::from("./logs");
            std::fs::create_dir_all(&fallback).context("Failed to create log directory")?;
            fallback
        }
    };

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "niftywatch.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // Utile pour suivre les tâches tokio
                .with_line_number(true),
        )
        .with(
            // RUST_LOG prioritaire ; sinon debug pour niftywatch, info pour le reste
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "niftywatch=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialized");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================
// CONCEPT RUST : Async dans sync
// - main() est synchrone (boucle TUI)
// - Le worker et le scheduler tournent sur un runtime tokio
// - Les deux mondes communiquent par channels
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    // Un .env absent n'est pas une erreur
    dotenv::dotenv().ok();
    let config = Config::from_env();
    info!(quote_api = %config.quote_api, watchlist = ?config.watchlist_path, "NiftyWatch starting up");

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    let store = WatchlistStore::load(config.watchlist_path.clone());
    let mut app = App::new(store);

    // Worker : exécute les appels réseau, renvoie des AppMessage
    let (message_tx, message_rx) = mpsc::channel::<AppMessage>();
    let fetcher = QuoteFetcher::new(NseClient::new(&config)?);
    let news = NewsClient::new(&config)?;
    let worker = spawn_worker(runtime.handle(), fetcher, news, message_tx.clone(), MarketSession::current);

    // Scheduler : premier tick immédiat = chargement initial
    let tick_tx = message_tx;
    let mut scheduler = Scheduler::start(runtime.handle(), WATCHLIST_REFRESH, NEWS_REFRESH, move |tick| {
        tick_tx.send(AppMessage::Tick(tick)).is_ok()
    });

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();
    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &worker, &message_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    scheduler.shutdown();
    worker.shutdown();
    runtime.shutdown_timeout(Duration::from_secs(1));

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event loop
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    worker: &Worker,
    messages: &mpsc::Receiver<AppMessage>,
) -> Result<()> {
    while app.is_running() {
        // 0. RÉSULTATS : on vide le channel sans bloquer
        loop {
            match messages.try_recv() {
                Ok(message) => handle_message(app, message, worker),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    error!("Worker and scheduler disconnected");
                    break;
                }
            }
        }

        // 1. RENDER
        terminal.draw(|frame| render(frame, app))?;

        // 2. INPUT
        match events.next() {
            Ok(event) => {
                let size = terminal.size()?;
                handle_event(app, event, worker, size);
            }
            Err(e) => warn!(error = %e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

/// Lance un cycle de rafraîchissement complet (tick ou touche 'r')
fn refresh_watchlist(app: &mut App, worker: &Worker) {
    let request = app.begin_refresh();
    worker.send(AppCommand::RefreshQuotes {
        generation: request.generation,
        symbols: request.symbols,
    });
}

/// Applique un message du worker ou du scheduler
fn handle_message(app: &mut App, message: AppMessage, worker: &Worker) {
    match message {
        AppMessage::Tick(Tick::Watchlist) => refresh_watchlist(app, worker),
        AppMessage::Tick(Tick::News) => {
            worker.send(AppCommand::LoadNews);
        }
        AppMessage::QuotesRefreshed { generation, resolved } => {
            app.apply_refresh(generation, resolved);
        }
        AppMessage::SymbolResolved { symbol, quote } => app.apply_single(&symbol, quote),
        AppMessage::NewsLoaded(result) => app.apply_news(result),
    }
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement selon l'écran courant
///
/// `size` est la taille du terminal, pour retrouver la ligne cliquée.
fn handle_event(app: &mut App, event: Event, worker: &Worker, size: Rect) {
    use niftywatch::ui::events::{
        get_char_from_event, is_add_event, is_backspace_event, is_clear_event, is_down_event,
        is_enter_event, is_escape_event, is_quit_event, is_refresh_event, is_space_event,
        is_ticker_char_event, is_up_event, is_view_event, is_yes_event,
    };

    if matches!(event, Event::Tick) {
        return;
    }

    // Une alerte se ferme avec n'importe quelle touche ou clic
    if app.has_alert() {
        app.dismiss_alert();
        return;
    }

    if app.is_awaiting_clear_confirmation() {
        if let Event::Key(_) = event {
            let confirmed = is_yes_event(&event);
            if app.answer_clear(confirmed) {
                info!("Watchlist cleared");
            }
        }
        return;
    }

    if app.is_in_input_mode() {
        if is_enter_event(&event) {
            let raw = app.submit_input();
            if let Some(symbol) = app.add_symbol(&raw) {
                info!(symbol = %symbol, "Symbol added");
                worker.send(AppCommand::FetchSymbol { symbol });
            }
        } else if is_escape_event(&event) {
            app.cancel_input();
        } else if is_backspace_event(&event) {
            app.backspace();
        } else if is_ticker_char_event(&event) {
            if let Some(c) = get_char_from_event(&event) {
                app.append_char(c.to_ascii_uppercase());
            }
        }
        return;
    }

    // Two-step quit : toute autre touche annule
    if is_quit_event(&event) {
        if app.is_awaiting_quit_confirmation() {
            info!("User confirmed quit");
            app.quit();
        } else {
            app.request_quit();
        }
        return;
    }
    if app.is_awaiting_quit_confirmation() {
        app.cancel_quit();
        return;
    }

    if app.is_on_details() {
        match event {
            Event::Click { column, row } if !dashboard::contains(dashboard::details_area(size), column, row) => {
                app.close_details();
            }
            _ if is_escape_event(&event) || is_space_event(&event) => app.close_details(),
            _ => {}
        }
        return;
    }

    match event {
        Event::Click { column, row } => {
            let rows = app.quotes().len();
            if let Some(symbol) = dashboard::row_at(size, column, row, rows).and_then(|i| app.select_index(i)) {
                app.on_select(&symbol);
            }
        }
        _ if is_up_event(&event) => app.navigate_up(),
        _ if is_down_event(&event) => app.navigate_down(),
        _ if is_enter_event(&event) || is_view_event(&event) => {
            if let Some(symbol) = app.selected_quote().map(|q| q.symbol.clone()) {
                app.on_select(&symbol);
            }
        }
        _ if is_add_event(&event) => app.start_input("Add symbol: ".to_string()),
        _ if is_clear_event(&event) => app.request_clear(),
        _ if is_refresh_event(&event) => {
            debug!("Manual refresh requested");
            refresh_watchlist(app, worker);
        }
        _ => {}
    }
}

// ============================================================================
// Terminal
// ============================================================================

/// Configure le terminal en mode TUI (raw mode, alternate screen, souris)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
