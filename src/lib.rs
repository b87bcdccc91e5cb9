// ============================================================================
// NiftyWatch - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;          // APIs de cotations et de news
pub mod app;          // État de l'application
pub mod config;       // Configuration (variables d'environnement)
pub mod detail;       // Contenu du panneau de détail
pub mod fetcher;      // Résolution live / dernier cours de clôture
pub mod market_clock; // Heures d'ouverture du marché (IST)
pub mod models;       // Structures de données
pub mod price_cache;  // Table des derniers cours de clôture
pub mod scheduler;    // Timers de rafraîchissement
pub mod ui;           // Interface utilisateur
pub mod watchlist;    // Watchlist persistée
pub mod worker;       // Tâches async en arrière-plan
