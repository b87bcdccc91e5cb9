// ============================================================================
// Scheduler : rafraîchissements périodiques
// ============================================================================
// Deux tâches tokio indépendantes :
// - watchlist toutes les 30s
// - news toutes les 60s
// Le premier tick de tokio::time::interval est immédiat : c'est le
// chargement initial.
//
// Le scheduler ne fait aucun appel réseau lui-même : il notifie la boucle
// UI, qui décide quoi lancer.
//
// CONCEPTS RUST :
// 1. JoinHandle::abort() : annulation explicite des tâches (teardown)
// 2. Drop : les tâches sont aussi annulées quand le Scheduler disparaît
// 3. Closure Clone + Send + 'static partagée par les deux tâches
// ============================================================================

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Type de rafraîchissement demandé
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Watchlist,
    News,
}

/// Propriétaire des deux tâches périodiques
pub struct Scheduler {
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Lance les deux timers sur le runtime `handle`
    ///
    /// `notify` est appelé à chaque tick ; s'il retourne false (récepteur
    /// fermé), la tâche concernée s'arrête.
    pub fn start<F>(handle: &Handle, watchlist_every: Duration, news_every: Duration, notify: F) -> Self
    where
        F: Fn(Tick) -> bool + Clone + Send + 'static,
    {
        info!(
            watchlist_secs = watchlist_every.as_secs(),
            news_secs = news_every.as_secs(),
            "Starting scheduler"
        );

        let handles = vec![
            spawn_periodic(handle, Tick::News, news_every, notify.clone()),
            spawn_periodic(handle, Tick::Watchlist, watchlist_every, notify),
        ];

        Self { handles }
    }

    /// Annule les deux tâches
    pub fn shutdown(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        debug!("Scheduler stopped");
    }

    /// Vrai tant qu'au moins une tâche tourne
    pub fn is_running(&self) -> bool {
        self.handles.iter().any(|h| !h.is_finished())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_periodic<F>(handle: &Handle, tick: Tick, period: Duration, notify: F) -> JoinHandle<()>
where
    F: Fn(Tick) -> bool + Send + 'static,
{
    handle.spawn(async move {
        let mut interval = tokio::time::interval(period);
        // Pas de rafale de ticks après une pause
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            debug!(?tick, "Scheduler tick");
            if !notify(tick) {
                debug!(?tick, "Tick receiver closed, stopping task");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<Tick>>>, impl Fn(Tick) -> bool + Clone + Send + 'static) {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let sink = ticks.clone();
        (ticks, move |tick| {
            sink.lock().unwrap().push(tick);
            true
        })
    }

    fn count(ticks: &Arc<Mutex<Vec<Tick>>>, kind: Tick) -> usize {
        ticks.lock().unwrap().iter().filter(|t| **t == kind).count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_then_periodic() {
        let (ticks, notify) = recorder();
        let mut scheduler = Scheduler::start(
            &Handle::current(),
            Duration::from_secs(30),
            Duration::from_secs(60),
            notify,
        );

        // Chargement initial immédiat
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count(&ticks, Tick::Watchlist), 1);
        assert_eq!(count(&ticks, Tick::News), 1);

        // t = 65s : watchlist à 0, 30, 60 ; news à 0, 60
        tokio::time::sleep(Duration::from_secs(65)).await;
        assert_eq!(count(&ticks, Tick::Watchlist), 3);
        assert_eq!(count(&ticks, Tick::News), 2);

        scheduler.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticks() {
        let (ticks, notify) = recorder();
        let mut scheduler = Scheduler::start(
            &Handle::current(),
            Duration::from_secs(30),
            Duration::from_secs(60),
            notify,
        );
        tokio::time::sleep(Duration::from_millis(1)).await;

        scheduler.shutdown();
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert_eq!(count(&ticks, Tick::Watchlist), 1);
        assert_eq!(count(&ticks, Tick::News), 1);
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_receiver_ends_task() {
        let mut scheduler = Scheduler::start(
            &Handle::current(),
            Duration::from_secs(30),
            Duration::from_secs(60),
            |_| false,
        );

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(!scheduler.is_running());
        scheduler.shutdown();
    }
}
