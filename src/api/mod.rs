// ============================================================================
// Module : api
// ============================================================================
// Clients des deux services externes : cotations live et news
// ============================================================================

pub mod news;  // API de news
pub mod quote; // API de cotations

// Re-export des types principaux
pub use news::{NewsClient, NewsSource};
pub use quote::{NseClient, QuoteSource};
