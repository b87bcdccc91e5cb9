// ============================================================================
// Detail View : contenu du panneau de détail d'un symbole
// ============================================================================
// Le panneau utilise TOUJOURS la table de clôture (jamais la cotation live)
// et un historique synthétique de 30 jours (voir models::history).
//
// Si le symbole n'a pas de données, le panneau s'ouvre quand même avec un
// message d'erreur à la place de la grille et du graphique.
// ============================================================================

use chrono::NaiveDate;
use rand::Rng;
use tracing::{debug, warn};

use crate::models::{synthesize_history, HistoryPoint, Quote};
use crate::price_cache;

/// Message affiché dans le panneau quand les données manquent
pub const DETAIL_ERROR: &str = "Error loading data";

/// Contenu du panneau de détail
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub symbol: String,

    /// Cotation de clôture ; None en cas d'erreur
    pub quote: Option<Quote>,

    /// Série du graphique (vide en cas d'erreur)
    pub history: Vec<HistoryPoint>,

    /// Message d'erreur affiché à la place des données
    pub error: Option<String>,
}

impl DetailView {
    /// Construit le panneau pour `symbol`
    pub fn build<R: Rng>(symbol: &str, today: NaiveDate, rng: &mut R) -> Self {
        let Some(quote) = price_cache::lookup(symbol) else {
            warn!(symbol = %symbol, "No closing data for detail view");
            return Self {
                symbol: symbol.to_string(),
                quote: None,
                history: Vec::new(),
                error: Some(DETAIL_ERROR.to_string()),
            };
        };

        let history = synthesize_history(price_cache::base_price(symbol), today, rng);
        debug!(symbol = %symbol, points = history.len(), "Detail view built");

        Self {
            symbol: symbol.to_string(),
            quote: Some(quote),
            history,
            error: None,
        }
    }

    /// Titre du panneau (ex: "TCS Details")
    pub fn title(&self) -> String {
        format!("{} Details", self.symbol)
    }

    /// Points (x, y) pour le widget Chart
    pub fn chart_points(&self) -> Vec<(f64, f64)> {
        self.history
            .iter()
            .enumerate()
            .map(|(i, point)| (i as f64, point.price))
            .collect()
    }

    /// Nom de la série pour la légende (ex: "TCS Price")
    pub fn series_name(&self) -> String {
        format!("{} Price", self.symbol)
    }
}
