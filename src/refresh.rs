// ============================================================================
// Rafraîchissement en arrière-plan
// ============================================================================
// - RefreshScheduler : tâche tokio qui demande un rafraîchissement toutes
//   les N secondes, arrêtée au drop
// - spawn_fetch : lance une requête dans une tâche et renvoie le résultat
//   à la boucle d'événements
//
// CONCEPT : Single-threaded state
// - Le MarketTracker ne quitte jamais le thread de l'UI
// - Les tâches ne font que produire des messages, consommés par try_recv()
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::api::{FetchError, MarketDataSource};
use crate::models::Asset;

/// Intervalle de rafraîchissement automatique par défaut
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(120);

/// Pourquoi un rafraîchissement est demandé
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// Chargement initial
    Startup,
    /// Tick du timer
    Timer,
    /// Touche de rafraîchissement
    Manual,
}

/// Résultat d'une requête, renvoyé à la boucle d'événements
#[derive(Debug)]
pub struct FetchOutcome {
    pub trigger: RefreshTrigger,
    pub result: Result<Vec<Asset>, FetchError>,
}

/// Timer de rafraîchissement automatique
///
/// Le premier tick arrive après `period` (le chargement initial est lancé
/// à part). La tâche est annulée par stop() ou au drop.
pub struct RefreshScheduler {
    handle: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Démarre le timer sur le runtime `runtime`
    pub fn start(runtime: &Handle, period: Duration, tx: UnboundedSender<RefreshTrigger>) -> Self {
        info!(period_secs = period.as_secs(), "Starting refresh scheduler");

        let handle = runtime.spawn(async move {
            let mut tick = time::interval_at(Instant::now() + period, period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tick.tick().await;
                debug!("Refresh timer fired");
                if tx.send(RefreshTrigger::Timer).is_err() {
                    debug!("Refresh receiver dropped, stopping scheduler");
                    break;
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Arrête le timer
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Refresh scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Lance une requête vers `source` dans une tâche
///
/// Aucune sérialisation entre requêtes : plusieurs peuvent être en vol, et
/// leurs résultats arrivent dans l'ordre où elles se terminent.
pub fn spawn_fetch(
    runtime: &Handle,
    source: Arc<dyn MarketDataSource>,
    trigger: RefreshTrigger,
    tx: UnboundedSender<FetchOutcome>,
) -> JoinHandle<()> {
    debug!(?trigger, "Spawning fetch task");

    runtime.spawn(async move {
        let result = source.fetch_top_assets().await;
        // Receiver fermé = l'application se termine, rien à faire
        let _ = tx.send(FetchOutcome { trigger, result });
    })
}
