// ============================================================================
// CryptoTracker - Point d'entrée
// ============================================================================
// Programme TUI : top 50 des cryptomonnaies, recherche, filtres et favoris
// Les données viennent de CoinGecko et sont rafraîchies toutes les 2 minutes
//
// ARCHITECTURE :
// 1. Boucle d'événements synchrone : lit le clavier, dessine, applique les
//    résultats des requêtes (seul endroit qui modifie l'état)
// 2. Runtime tokio : exécute les requêtes HTTP et le timer de rafraîchissement
// 3. Channels tokio mpsc : les tâches envoient, la boucle lit via try_recv()
// ============================================================================

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use cryptotracker::api::{CoinGeckoClient, MarketDataSource};
use cryptotracker::app::App;
use cryptotracker::config::Config;
use cryptotracker::refresh::{spawn_fetch, FetchOutcome, RefreshScheduler, RefreshTrigger};
use cryptotracker::storage::FileStore;
use cryptotracker::tracker::MarketTracker;
use cryptotracker::ui::events::{dashboard_action, search_input_action};
use cryptotracker::ui::{render, Action, Event, EventHandler};
use cryptotracker::view::{Rendered, NO_RESULTS_MESSAGE};

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier avec rotation quotidienne.
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f ./logs/cryptotracker.log.*
/// RUST_LOG=cryptotracker=trace cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config.log_dir.clone();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "cryptotracker.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cryptotracker=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();

    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(?config, "CryptoTracker starting up");

    let runtime = Runtime::new().context("Échec de la création du runtime tokio")?;

    let source: Arc<dyn MarketDataSource> = Arc::new(
        CoinGeckoClient::new(config.api_url.clone()).context("Échec de la création du client HTTP")?,
    );

    let store = FileStore::open(config.store_path());
    debug!(path = %store.path().display(), "Favorites store opened");
    let mut tracker = MarketTracker::initialize(Box::new(store));
    tracker.apply_filter(config.filter);

    if config.once {
        return runtime.block_on(run_once(tracker, source.as_ref(), &config));
    }

    run_tui(&runtime, tracker, source, &config)
}

// ============================================================================
// Mode headless : --once
// ============================================================================

/// Rafraîchit une fois et affiche le tableau sur stdout
async fn run_once(mut tracker: MarketTracker, source: &dyn MarketDataSource, config: &Config) -> Result<()> {
    tracker.refresh(source).await;

    if let Some(reason) = tracker.last_error() {
        anyhow::bail!("Échec du chargement des données : {}", reason);
    }

    if let Some(term) = &config.search {
        tracker.search(term);
    }

    match tracker.render() {
        Rendered::NoResults => println!("{}", NO_RESULTS_MESSAGE),
        Rendered::Cards(cards) => {
            println!(
                "  {:<30} {:>20} {:>10} {:>24} {:>22}  {}",
                "NAME", "PRICE", "24H", "MARKET CAP", "24H VOLUME", "ICON"
            );
            for card in cards {
                let star = if card.favorite { '*' } else { ' ' };
                println!(
                    "{} {:<30} {:>20} {:>10} {:>24} {:>22}  {}",
                    star,
                    format!("{} ({})", card.name, card.symbol),
                    card.price,
                    card.change,
                    card.market_cap,
                    card.volume,
                    card.icon_label()
                );
            }
        }
    }

    Ok(())
}

// ============================================================================
// Mode TUI
// ============================================================================

/// Canaux reliant les tâches tokio à la boucle d'événements
struct Channels {
    fetch_tx: UnboundedSender<FetchOutcome>,
    fetch_rx: UnboundedReceiver<FetchOutcome>,
    trigger_rx: UnboundedReceiver<RefreshTrigger>,
}

fn run_tui(
    runtime: &Runtime,
    tracker: MarketTracker,
    source: Arc<dyn MarketDataSource>,
    config: &Config,
) -> Result<()> {
    let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
    let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
    let mut channels = Channels {
        fetch_tx,
        fetch_rx,
        trigger_rx,
    };

    let mut app = App::new(tracker);

    // Chargement initial + timer de rafraîchissement
    start_refresh(&mut app, runtime, &source, &channels, RefreshTrigger::Startup);
    let mut scheduler = RefreshScheduler::start(runtime.handle(), config.refresh_interval(), trigger_tx);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    info!("Starting event loop");
    let events = EventHandler::new();
    let result = run(&mut terminal, &mut app, &events, runtime, &source, &mut channels);

    scheduler.stop();

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Lance un rafraîchissement : indicateur de chargement + requête en tâche
fn start_refresh(
    app: &mut App,
    runtime: &Runtime,
    source: &Arc<dyn MarketDataSource>,
    channels: &Channels,
    trigger: RefreshTrigger,
) {
    info!(?trigger, "Refresh requested");
    app.tracker.begin_refresh();
    spawn_fetch(runtime.handle(), Arc::clone(source), trigger, channels.fetch_tx.clone());
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. Demandes du timer et résultats des requêtes (non bloquant)
//   1. Rendu
//   2. Entrée clavier (poll 250ms)
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    runtime: &Runtime,
    source: &Arc<dyn MarketDataSource>,
    channels: &mut Channels,
) -> Result<()> {
    while app.is_running() {
        // ========================================
        // 0. TÂCHES : timer et résultats
        // ========================================
        while let Ok(trigger) = channels.trigger_rx.try_recv() {
            start_refresh(app, runtime, source, channels, trigger);
        }

        // Résultats appliqués dans l'ordre d'arrivée : le dernier gagne
        while let Ok(outcome) = channels.fetch_rx.try_recv() {
            debug!(trigger = ?outcome.trigger, ok = outcome.result.is_ok(), "Fetch completed");
            app.tracker.complete_refresh(outcome.result);
            app.clamp_selection();
        }

        // ========================================
        // 1. RENDER
        // ========================================
        terminal.draw(|frame| render(frame, app))?;

        // ========================================
        // 2. INPUT
        // ========================================
        match events.next() {
            Ok(Event::Key(key)) => {
                let action = if app.is_in_search_input() {
                    search_input_action(&key)
                } else {
                    dashboard_action(&key)
                };
                handle_action(app, action, runtime, source, channels);
            }
            Ok(Event::Tick) => {}
            Err(e) => {
                error!(error = ?e, "Failed to read terminal event");
            }
        }
    }

    Ok(())
}

/// Applique une action utilisateur
fn handle_action(
    app: &mut App,
    action: Action,
    runtime: &Runtime,
    source: &Arc<dyn MarketDataSource>,
    channels: &Channels,
) {
    match action {
        Action::Quit => {
            info!("User requested quit");
            app.quit();
        }
        Action::Refresh => start_refresh(app, runtime, source, channels, RefreshTrigger::Manual),
        Action::Up => app.navigate_up(),
        Action::Down => app.navigate_down(),
        Action::ToggleFavorite => {
            if let Some((id, favorite)) = app.toggle_selected_favorite() {
                debug!(id = %id, favorite, "User toggled favorite");
            }
        }
        Action::Filter(mode) => {
            info!(filter = %mode, "User selected filter");
            app.select_filter(mode);
        }
        Action::StartSearch => app.start_search(),
        Action::SearchChar(c) => app.append_char(c),
        Action::SearchBackspace => app.backspace(),
        Action::FinishSearch => app.finish_search(),
        Action::None => {}
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Échec de l'activation du raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
