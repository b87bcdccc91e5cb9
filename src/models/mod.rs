// ============================================================================
// Module : models
// ============================================================================
// Structures de données de l'application : cotations, historique
// synthétique, articles de news
// ============================================================================

pub mod article; // Articles et état du fil de news
pub mod history; // Historique synthétique pour le graphique de détail
pub mod quote;   // Cotation d'un symbole

// Re-exports pour simplifier les imports
pub use article::{NewsArticle, NewsFeed};
pub use history::{synthesize_history, HistoryPoint};
pub use quote::{format_rupees, normalize_symbol, Quote, QuoteOrigin};
