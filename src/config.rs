// ============================================================================
// Configuration
// ============================================================================
// Lue depuis les variables d'environnement (un fichier .env est chargé par
// main avant l'appel à Config::from_env)
//
// | Variable                      | Défaut                                   |
// |-------------------------------|------------------------------------------|
// | NIFTYWATCH_QUOTE_API          | http://nse-api-khaki.vercel.app:5000     |
// | NIFTYWATCH_NEWS_API           | https://api.marketaux.com/v1/news/all    |
// | NIFTYWATCH_NEWS_TOKEN         | (vide)                                   |
// | NIFTYWATCH_WATCHLIST          | <data_dir>/niftywatch/watchlist.json     |
// | NIFTYWATCH_HTTP_TIMEOUT_SECS  | 10                                       |
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_QUOTE_API: &str = "http://nse-api-khaki.vercel.app:5000";
pub const DEFAULT_NEWS_API: &str = "https://api.marketaux.com/v1/news/all";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Période de rafraîchissement de la watchlist
pub const WATCHLIST_REFRESH: Duration = Duration::from_secs(30);

/// Période de rafraîchissement des news
pub const NEWS_REFRESH: Duration = Duration::from_secs(60);

/// Nom du dossier applicatif (logs, watchlist)
pub const APP_DIR: &str = "niftywatch";

/// Configuration de l'application
#[derive(Debug, Clone)]
pub struct Config {
    /// Base de l'API de cotations (sans slash final)
    pub quote_api: String,

    /// Endpoint complet de l'API de news
    pub news_api: String,

    /// Token de l'API de news
    pub news_token: String,

    /// Fichier de persistance de la watchlist
    pub watchlist_path: PathBuf,

    /// Timeout de chaque requête HTTP
    pub http_timeout: Duration,
}

impl Config {
    /// Construit la configuration depuis l'environnement du processus
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la configuration à partir d'une fonction de lecture
    ///
    /// Permet de tester sans toucher à l'environnement global.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let http_timeout = match non_empty("NIFTYWATCH_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(value = %raw, "Invalid NIFTYWATCH_HTTP_TIMEOUT_SECS, using default");
                    Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)
                }
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Self {
            quote_api: non_empty("NIFTYWATCH_QUOTE_API")
                .unwrap_or_else(|| DEFAULT_QUOTE_API.to_string())
                .trim_end_matches('/')
                .to_string(),
            news_api: non_empty("NIFTYWATCH_NEWS_API").unwrap_or_else(|| DEFAULT_NEWS_API.to_string()),
            news_token: lookup("NIFTYWATCH_NEWS_TOKEN").unwrap_or_default(),
            watchlist_path: non_empty("NIFTYWATCH_WATCHLIST")
                .map(PathBuf::from)
                .unwrap_or_else(default_watchlist_path),
            http_timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Dossier de données de l'application, ou "." si introuvable
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_watchlist_path() -> PathBuf {
    app_data_dir().join("watchlist.json")
}
