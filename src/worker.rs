// ============================================================================
// Worker : exécution des tâches async en arrière-plan
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - La boucle UI envoie des AppCommand au worker (tokio mpsc)
// - Le worker lance une tâche tokio par commande
// - Les résultats reviennent à la boucle UI sous forme d'AppMessage
//   (std mpsc, lu sans bloquer avec try_recv)
//
// Une tâche par commande : un rafraîchissement lent ne retarde ni les news
// ni l'ajout d'un symbole.
// ============================================================================

use std::sync::mpsc;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{NewsSource, QuoteSource};
use crate::fetcher::{QuoteFetcher, Resolved};
use crate::market_clock::MarketSession;
use crate::models::{NewsArticle, Quote};
use crate::scheduler::Tick;

/// Commandes envoyées au worker
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Résoudre toute la watchlist (cycle numéroté)
    RefreshQuotes { generation: u64, symbols: Vec<String> },

    /// Résoudre un seul symbole qui vient d'être ajouté
    FetchSymbol { symbol: String },

    /// Recharger le fil de news
    LoadNews,
}

/// Messages reçus par la boucle UI
#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    /// Tick du scheduler
    Tick(Tick),

    /// Cycle de rafraîchissement terminé
    QuotesRefreshed { generation: u64, resolved: Vec<Resolved> },

    /// Symbole ajouté résolu (None si aucune donnée)
    SymbolResolved { symbol: String, quote: Option<Quote> },

    /// Résultat du chargement des news (None = échec)
    NewsLoaded(Option<Vec<NewsArticle>>),
}

/// Poignée sur le worker
pub struct Worker {
    commands: UnboundedSender<AppCommand>,
    handle: JoinHandle<()>,
}

impl Worker {
    /// Envoie une commande ; false si le worker est arrêté
    pub fn send(&self, command: AppCommand) -> bool {
        match self.commands.send(command) {
            Ok(()) => true,
            Err(e) => {
                warn!(command = ?e.0, "Worker is gone, command dropped");
                false
            }
        }
    }

    /// Arrête la boucle de commandes (les tâches en vol se terminent seules)
    pub fn shutdown(self) {
        drop(self.commands);
        self.handle.abort();
    }
}

/// Lance le worker sur le runtime `runtime`
///
/// `session` donne l'état du marché au moment où une commande s'exécute.
pub fn spawn_worker<S, N>(
    runtime: &Handle,
    fetcher: QuoteFetcher<S>,
    news: N,
    results: mpsc::Sender<AppMessage>,
    session: fn() -> MarketSession,
) -> Worker
where
    S: QuoteSource + Send + Sync + 'static,
    N: NewsSource + Send + Sync + 'static,
{
    let (commands, mut command_rx) = unbounded_channel::<AppCommand>();
    let fetcher = Arc::new(fetcher);
    let news = Arc::new(news);
    let spawner = runtime.clone();

    let handle = runtime.spawn(async move {
        while let Some(command) = command_rx.recv().await {
            debug!(?command, "Worker received command");

            let fetcher = fetcher.clone();
            let news = news.clone();
            let results = results.clone();

            spawner.spawn(async move {
                let message = execute(command, &fetcher, &*news, session()).await;
                if results.send(message).is_err() {
                    debug!("UI loop gone, result dropped");
                }
            });
        }
        info!("Worker exiting (command channel closed)");
    });

    Worker { commands, handle }
}

/// Exécute une commande et produit le message pour l'UI
async fn execute<S, N>(command: AppCommand, fetcher: &QuoteFetcher<S>, news: &N, session: MarketSession) -> AppMessage
where
    S: QuoteSource,
    N: NewsSource,
{
    match command {
        AppCommand::RefreshQuotes { generation, symbols } => {
            let resolved = fetcher.resolve_all(&symbols, session).await;
            AppMessage::QuotesRefreshed { generation, resolved }
        }
        AppCommand::FetchSymbol { symbol } => {
            let quote = fetcher.resolve(&symbol, session).await;
            AppMessage::SymbolResolved { symbol, quote }
        }
        AppCommand::LoadNews => match news.fetch_latest().await {
            Ok(articles) => AppMessage::NewsLoaded(Some(articles)),
            Err(e) => {
                warn!(error = %e, "News loading failed");
                AppMessage::NewsLoaded(None)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::time::Duration;

    struct OfflineQuotes;

    impl QuoteSource for OfflineQuotes {
        async fn fetch_quote(&self, _symbol: &str) -> Result<Quote> {
            anyhow::bail!("offline")
        }
    }

    struct StaticNews(Option<Vec<NewsArticle>>);

    impl NewsSource for StaticNews {
        async fn fetch_latest(&self) -> Result<Vec<NewsArticle>> {
            match &self.0 {
                Some(articles) => Ok(articles.clone()),
                None => anyhow::bail!("HTTP 401"),
            }
        }
    }

    fn article(title: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            description: "N/A".to_string(),
            published: "27/12/2025".to_string(),
        }
    }

    async fn next_message(rx: &mpsc::Receiver<AppMessage>) -> AppMessage {
        for _ in 0..200 {
            if let Ok(message) = rx.try_recv() {
                return message;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("no message from worker");
    }

    fn spawn(news: StaticNews) -> (Worker, mpsc::Receiver<AppMessage>) {
        let (tx, rx) = mpsc::channel();
        let worker = spawn_worker(
            &Handle::current(),
            QuoteFetcher::new(OfflineQuotes),
            news,
            tx,
            || MarketSession::Open,
        );
        (worker, rx)
    }

    #[tokio::test]
    async fn test_refresh_falls_back_when_offline() {
        let (worker, rx) = spawn(StaticNews(None));

        assert!(worker.send(AppCommand::RefreshQuotes {
            generation: 7,
            symbols: vec!["INFY".to_string(), "AAPL".to_string()],
        }));

        match next_message(&rx).await {
            AppMessage::QuotesRefreshed { generation, resolved } => {
                assert_eq!(generation, 7);
                assert_eq!(resolved[0].quote.as_ref().unwrap().price, 1842.10);
                assert!(resolved[1].quote.is_none());
            }
            other => panic!("unexpected message: {other:?}"),
        }
        worker.shutdown();
    }

    #[tokio::test]
    async fn test_fetch_symbol() {
        let (worker, rx) = spawn(StaticNews(None));
        worker.send(AppCommand::FetchSymbol { symbol: "DRREDDY".to_string() });

        match next_message(&rx).await {
            AppMessage::SymbolResolved { symbol, quote } => {
                assert_eq!(symbol, "DRREDDY");
                assert_eq!(quote.unwrap().price, 6523.50);
            }
            other => panic!("unexpected message: {other:?}"),
        }
        worker.shutdown();
    }

    #[tokio::test]
    async fn test_news_success_and_failure() {
        let (worker, rx) = spawn(StaticNews(Some(vec![article("Sensex up")])));
        worker.send(AppCommand::LoadNews);
        assert_eq!(
            next_message(&rx).await,
            AppMessage::NewsLoaded(Some(vec![article("Sensex up")]))
        );
        worker.shutdown();

        let (worker, rx) = spawn(StaticNews(None));
        worker.send(AppCommand::LoadNews);
        assert_eq!(next_message(&rx).await, AppMessage::NewsLoaded(None));
        worker.shutdown();
    }
}
