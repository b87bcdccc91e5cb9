// ============================================================================
// Watchlist Store : liste ordonnée de symboles, persistée sur disque
// ============================================================================
// Le fichier contient un simple tableau JSON : ["RELIANCE","TCS",...]
//
// Règles :
// - fichier absent ou illisible → liste par défaut
// - ajout seulement si le symbole est connu de la table de clôture
// - ajout d'un symbole déjà présent → rien ne change
// - clear supprime le fichier (le prochain load redonne la liste par défaut)
//
// CONCEPTS RUST :
// 1. thiserror : enum d'erreurs typées avec messages
// 2. Ownership : le store possède la liste ET le chemin du fichier
// 3. FnOnce : la confirmation est une capacité fournie par l'appelant
// ============================================================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::normalize_symbol;
use crate::price_cache;

/// Liste utilisée quand rien n'est persisté
pub const DEFAULT_WATCHLIST: [&str; 4] = ["RELIANCE", "TCS", "INFY", "HDFCBANK"];

/// Erreurs possibles lors de l'ajout d'un symbole
#[derive(Debug, Error)]
pub enum WatchlistError {
    /// Le symbole n'existe pas dans la table de clôture
    #[error("Unknown symbol '{symbol}'. Add these: {supported}")]
    UnknownSymbol { symbol: String, supported: String },

    /// Écriture du fichier impossible
    #[error("failed to persist watchlist to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Résultat d'un ajout réussi
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Symbole ajouté en fin de liste
    Added(String),
    /// Déjà présent, rien n'a changé
    AlreadyPresent(String),
}

/// Watchlist persistée
#[derive(Debug)]
pub struct WatchlistStore {
    symbols: Vec<String>,
    path: PathBuf,
}

impl WatchlistStore {
    /// Charge la watchlist depuis `path`
    ///
    /// Ne peut pas échouer : toute erreur de lecture ou de parsing
    /// redonne la liste par défaut.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let symbols = match read_symbols(&path) {
            Some(symbols) => {
                info!(path = %path.display(), count = symbols.len(), "Watchlist loaded");
                symbols
            }
            None => {
                info!(path = %path.display(), "Using default watchlist");
                default_symbols()
            }
        };

        Self { symbols, path }
    }

    /// Symboles dans l'ordre d'ajout
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ajoute un symbole saisi par l'utilisateur
    ///
    /// Le symbole est normalisé (trim + majuscules). En cas d'erreur la
    /// liste en mémoire et le fichier restent inchangés.
    pub fn add(&mut self, raw: &str) -> Result<AddOutcome, WatchlistError> {
        let symbol = normalize_symbol(raw);

        if !price_cache::contains(&symbol) {
            warn!(symbol = %symbol, "Rejected unknown symbol");
            return Err(WatchlistError::UnknownSymbol {
                symbol,
                supported: price_cache::supported_symbols_display(),
            });
        }

        if self.contains(&symbol) {
            debug!(symbol = %symbol, "Symbol already in watchlist");
            return Ok(AddOutcome::AlreadyPresent(symbol));
        }

        self.symbols.push(symbol.clone());
        if let Err(source) = self.persist() {
            // Annule l'ajout pour garder mémoire et disque cohérents
            self.symbols.pop();
            return Err(WatchlistError::Persist {
                path: self.path.clone(),
                source,
            });
        }

        info!(symbol = %symbol, count = self.symbols.len(), "Symbol added to watchlist");
        Ok(AddOutcome::Added(symbol))
    }

    /// Vide la watchlist si `confirm` répond oui
    ///
    /// Retourne true si la liste a été vidée. Le fichier est supprimé, pas
    /// réécrit avec un tableau vide.
    pub fn clear(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            debug!("Clear cancelled");
            return false;
        }

        self.symbols.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove watchlist file"),
        }

        info!("Watchlist cleared");
        true
    }

    /// Écrit la liste courante
    fn persist(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(&self.symbols)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "Watchlist persisted");
        Ok(())
    }
}

fn default_symbols() -> Vec<String> {
    DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect()
}

/// Lit le fichier ; None si absent ou invalide
fn read_symbols(path: &Path) -> Option<Vec<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "Failed to read watchlist file");
            }
            return None;
        }
    };

    let raw: Vec<String> = match serde_json::from_str(&content) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Invalid watchlist file, falling back to default");
            return None;
        }
    };

    // Normalise et retire les doublons en gardant l'ordre
    let mut symbols: Vec<String> = Vec::with_capacity(raw.len());
    for symbol in raw.iter().map(|s| normalize_symbol(s)) {
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    Some(symbols)
}
