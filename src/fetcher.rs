// ============================================================================
// Quote Fetcher : résolution d'une cotation par symbole
// ============================================================================
// 1. Marché ouvert → tentative live ; prix > 0 → on la garde
// 2. Échec live OU marché fermé → table de clôture
// 3. Rien nulle part → None (le symbole n'est pas affiché)
//
// Les échecs live ne remontent jamais : ils sont loggés puis absorbés.
//
// CONCEPTS RUST :
// 1. Generics : QuoteFetcher<S: QuoteSource>
// 2. futures::future::join_all : toutes les requêtes en parallèle, résultats
//    dans l'ordre d'entrée (pas dans l'ordre d'arrivée)
// ============================================================================

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::market_clock::MarketSession;
use crate::models::Quote;
use crate::price_cache;
use crate::api::QuoteSource;

/// Résultat de la résolution d'un symbole
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub symbol: String,
    /// None si aucune source n'a de données
    pub quote: Option<Quote>,
}

/// Résout les cotations à partir d'une source live et de la table locale
#[derive(Debug, Clone)]
pub struct QuoteFetcher<S> {
    source: S,
}

impl<S: QuoteSource> QuoteFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Résout un symbole pour la session donnée
    pub async fn resolve(&self, symbol: &str, session: MarketSession) -> Option<Quote> {
        if session.is_open() {
            match self.source.fetch_quote(symbol).await {
                Ok(quote) if quote.price > 0.0 => {
                    debug!(symbol = %symbol, price = quote.price, "Using live quote");
                    return Some(quote);
                }
                Ok(quote) => {
                    warn!(symbol = %symbol, price = quote.price, "Live quote has non-positive price");
                }
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "Live quote failed, using last close");
                }
            }
        }

        let fallback = price_cache::lookup(symbol);
        if fallback.is_none() {
            debug!(symbol = %symbol, "No quote available");
        }
        fallback
    }

    /// Résout tous les symboles en parallèle
    ///
    /// Le Vec retourné suit l'ordre de `symbols`, quel que soit l'ordre
    /// dans lequel les requêtes se terminent.
    pub async fn resolve_all(&self, symbols: &[String], session: MarketSession) -> Vec<Resolved> {
        let pending = symbols.iter().map(|symbol| async move {
            Resolved {
                symbol: symbol.clone(),
                quote: self.resolve(symbol, session).await,
            }
        });

        let resolved = join_all(pending).await;
        info!(
            requested = symbols.len(),
            found = resolved.iter().filter(|r| r.quote.is_some()).count(),
            session = ?session,
            "Watchlist quotes resolved"
        );
        resolved
    }
}
