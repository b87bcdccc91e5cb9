// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état de l'application TUI : watchlist, cotations affichées, news,
// panneau de détail, saisie et confirmations.
//
// PATTERN : "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Pas d'état global : la watchlist et le panneau de détail sont des
//   champs de App
// ============================================================================

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::detail::DetailView;
use crate::fetcher::Resolved;
use crate::models::{NewsArticle, NewsFeed, Quote};
use crate::watchlist::{AddOutcome, WatchlistStore};

// ============================================================================
// Enum : Screen
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul écran actif à la fois
// - Le compilateur force à gérer tous les cas
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : watchlist + news
    Dashboard,

    /// Saisie d'un symbole à ajouter
    InputMode,

    /// Attente de la confirmation pour vider la watchlist
    ConfirmClear,

    /// Panneau de détail ouvert par-dessus le dashboard
    Details,
}

/// Demande de rafraîchissement complet, à transmettre au worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRequest {
    pub generation: u64,
    pub symbols: Vec<String>,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Watchlist persistée (seule propriétaire de la liste de symboles)
    store: WatchlistStore,

    /// Cotations affichées, dans l'ordre de la watchlist
    quotes: Vec<Quote>,

    /// Index de la ligne sélectionnée dans `quotes`
    pub selected_index: usize,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Fil de news affiché
    pub news: NewsFeed,

    /// Panneau de détail courant ; remplacé en entier à chaque ouverture
    details: Option<DetailView>,

    /// Message bloquant (ex: symbole inconnu), fermé par n'importe quelle touche
    pub alert: Option<String>,

    /// Two-step quit : première pression de 'q' = confirm_quit
    pub confirm_quit: bool,

    /// Buffer de saisie pour le mode Input
    pub input_buffer: String,

    /// Prompt affiché en mode Input
    pub input_prompt: String,

    /// Dernier numéro de cycle distribué
    issued_generation: u64,

    /// Numéro du dernier cycle appliqué à l'affichage
    applied_generation: u64,

    /// Au moins un cycle a été appliqué
    loaded: bool,
}

impl App {
    /// Crée l'état à partir d'une watchlist chargée
    pub fn new(store: WatchlistStore) -> Self {
        Self {
            running: true,
            store,
            quotes: Vec::new(),
            selected_index: 0,
            current_screen: Screen::Dashboard,
            news: NewsFeed::default(),
            details: None,
            alert: None,
            confirm_quit: false,
            input_buffer: String::new(),
            input_prompt: String::new(),
            issued_generation: 0,
            applied_generation: 0,
            loaded: false,
        }
    }

    // ========================================================================
    // Accès en lecture
    // ========================================================================

    pub fn watchlist(&self) -> &[String] {
        self.store.symbols()
    }

    /// Cotations affichées (ordre de la watchlist)
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn details(&self) -> Option<&DetailView> {
        self.details.as_ref()
    }

    pub fn selected_quote(&self) -> Option<&Quote> {
        self.quotes.get(self.selected_index)
    }

    /// Vrai tant qu'aucun cycle n'a été appliqué (watchlist non vide)
    pub fn is_loading(&self) -> bool {
        !self.loaded && !self.store.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    // ========================================================================
    // Rafraîchissement de la watchlist
    // ========================================================================

    /// Prépare un nouveau cycle de rafraîchissement
    ///
    /// Le numéro de cycle permet d'ignorer un cycle lent qui se termine
    /// après un cycle plus récent.
    pub fn begin_refresh(&mut self) -> RefreshRequest {
        self.issued_generation += 1;
        debug!(generation = self.issued_generation, symbols = self.store.len(), "Refresh cycle issued");
        RefreshRequest {
            generation: self.issued_generation,
            symbols: self.store.symbols().to_vec(),
        }
    }

    /// Applique un cycle terminé ; false s'il est périmé
    ///
    /// La liste affichée est reconstruite en une passe, dans l'ordre de la
    /// watchlist ; les symboles sans données sont omis. Les symboles
    /// retirés entre-temps (clear) sont ignorés, et ceux ajoutés après le
    /// lancement du cycle gardent leur cotation déjà affichée.
    pub fn apply_refresh(&mut self, generation: u64, resolved: Vec<Resolved>) -> bool {
        if generation <= self.applied_generation {
            warn!(
                generation,
                applied = self.applied_generation,
                "Ignoring stale refresh cycle"
            );
            return false;
        }

        self.applied_generation = generation;
        self.loaded = true;

        let mut fresh: HashMap<String, Option<Quote>> =
            resolved.into_iter().map(|r| (r.symbol, r.quote)).collect();
        let previous = std::mem::take(&mut self.quotes);

        self.quotes = self
            .store
            .symbols()
            .iter()
            .filter_map(|symbol| match fresh.remove(symbol) {
                // La clé reste le symbole de la watchlist, pas celui de l'API
                Some(quote) => quote.map(|q| Quote { symbol: symbol.clone(), ..q }),
                // Absent du cycle : ajouté après son lancement
                None => previous.iter().find(|q| &q.symbol == symbol).cloned(),
            })
            .collect();
        self.clamp_selection();

        info!(generation, shown = self.quotes.len(), "Watchlist rendered");
        true
    }

    /// Ajoute à l'affichage le résultat d'un symbole qui vient d'être ajouté
    pub fn apply_single(&mut self, symbol: &str, quote: Option<Quote>) {
        if !self.store.contains(symbol) {
            debug!(symbol = %symbol, "Symbol no longer in watchlist, result dropped");
            return;
        }
        if self.quotes.iter().any(|q| q.symbol == symbol) {
            debug!(symbol = %symbol, "Symbol already displayed");
            return;
        }
        match quote {
            Some(quote) => self.quotes.push(Quote {
                symbol: symbol.to_string(),
                ..quote
            }),
            None => debug!(symbol = %symbol, "No data for added symbol"),
        }
    }

    // ========================================================================
    // News
    // ========================================================================

    /// Applique un résultat de chargement des news
    ///
    /// - None (échec) → entrée statique unique
    /// - liste vide → le fil précédent reste affiché
    pub fn apply_news(&mut self, result: Option<Vec<NewsArticle>>) {
        match result {
            None => self.news = NewsFeed::Unavailable,
            Some(articles) if articles.is_empty() => debug!("Empty news response, keeping previous feed"),
            Some(articles) => self.news = NewsFeed::Articles(articles),
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.quotes.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    /// Sélectionne une ligne par index (clic souris)
    pub fn select_index(&mut self, index: usize) -> Option<String> {
        let symbol = self.quotes.get(index)?.symbol.clone();
        self.selected_index = index;
        Some(symbol)
    }

    fn clamp_selection(&mut self) {
        if self.selected_index >= self.quotes.len() {
            self.selected_index = self.quotes.len().saturating_sub(1);
        }
    }

    // ========================================================================
    // Panneau de détail
    // ========================================================================

    /// Point d'entrée unique de la sélection d'un symbole (clic ou touche)
    pub fn on_select(&mut self, symbol: &str) {
        let today = Local::now().date_naive();
        self.show_details(symbol, today, &mut rand::thread_rng());
    }

    /// Ouvre le panneau de détail ; remplace le précédent
    pub fn show_details<R: Rng>(&mut self, symbol: &str, today: NaiveDate, rng: &mut R) {
        if let Some(previous) = self.details.take() {
            debug!(symbol = %previous.symbol, "Disposing previous chart");
        }
        self.details = Some(DetailView::build(symbol, today, rng));
        self.current_screen = Screen::Details;
        info!(symbol = %symbol, "Detail view opened");
    }

    pub fn close_details(&mut self) {
        self.current_screen = Screen::Dashboard;
    }

    pub fn is_on_details(&self) -> bool {
        self.current_screen == Screen::Details
    }

    pub fn is_on_dashboard(&self) -> bool {
        self.current_screen == Screen::Dashboard
    }

    // ========================================================================
    // Quit two-step
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Input Mode : ajout d'un symbole
    // ========================================================================

    pub fn start_input(&mut self, prompt: String) {
        self.current_screen = Screen::InputMode;
        self.input_buffer.clear();
        self.input_prompt = prompt;
    }

    pub fn cancel_input(&mut self) {
        self.current_screen = Screen::Dashboard;
        self.input_buffer.clear();
        self.input_prompt.clear();
    }

    /// Récupère la valeur saisie et retourne au dashboard
    pub fn submit_input(&mut self) -> String {
        let value = std::mem::take(&mut self.input_buffer);
        self.current_screen = Screen::Dashboard;
        self.input_prompt.clear();
        value
    }

    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.current_screen == Screen::InputMode
    }

    /// Tente d'ajouter un symbole saisi
    ///
    /// Retourne le symbole à résoudre si l'ajout a réussi. Un symbole
    /// inconnu (ou une erreur d'écriture) ouvre une alerte ; un symbole
    /// déjà présent ne fait rien.
    pub fn add_symbol(&mut self, raw: &str) -> Option<String> {
        match self.store.add(raw) {
            Ok(AddOutcome::Added(symbol)) => Some(symbol),
            Ok(AddOutcome::AlreadyPresent(_)) => None,
            Err(e) => {
                self.alert = Some(e.to_string());
                None
            }
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn has_alert(&self) -> bool {
        self.alert.is_some()
    }

    // ========================================================================
    // Clear avec confirmation
    // ========================================================================

    pub fn request_clear(&mut self) {
        self.current_screen = Screen::ConfirmClear;
    }

    pub fn is_awaiting_clear_confirmation(&self) -> bool {
        self.current_screen == Screen::ConfirmClear
    }

    /// Répond à la confirmation ; true si la liste a été vidée
    pub fn answer_clear(&mut self, confirmed: bool) -> bool {
        self.current_screen = Screen::Dashboard;
        let cleared = self.store.clear(|| confirmed);
        if cleared {
            self.quotes.clear();
            self.selected_index = 0;
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuoteOrigin;
    use crate::price_cache;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        App::new(WatchlistStore::load(dir.path().join("watchlist.json")))
    }

    fn resolved(symbols: &[&str]) -> Vec<Resolved> {
        symbols
            .iter()
            .map(|s| Resolved {
                symbol: s.to_string(),
                quote: price_cache::lookup(s),
            })
            .collect()
    }

    fn shown(app: &App) -> Vec<&str> {
        app.quotes().iter().map(|q| q.symbol.as_str()).collect()
    }

    #[test]
    fn test_app_creation() {
        let dir = TempDir::new().unwrap();
        let app = app_in(&dir);
        assert!(app.is_running());
        assert_eq!(app.watchlist().len(), 4);
        assert!(app.quotes().is_empty());
        assert!(app.is_loading());
        assert_eq!(app.news, NewsFeed::Loading);
    }

    #[test]
    fn test_refresh_renders_in_watchlist_order() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        let request = app.begin_refresh();
        assert_eq!(request.generation, 1);
        assert_eq!(request.symbols, ["RELIANCE", "TCS", "INFY", "HDFCBANK"]);

        assert!(app.apply_refresh(request.generation, resolved(&["RELIANCE", "TCS", "INFY", "HDFCBANK"])));
        assert_eq!(shown(&app), ["RELIANCE", "TCS", "INFY", "HDFCBANK"]);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_missing_quotes_are_omitted() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let request = app.begin_refresh();

        let mut results = resolved(&["RELIANCE", "TCS"]);
        results[0].quote = None;
        app.apply_refresh(request.generation, results);

        assert_eq!(shown(&app), ["TCS"]);
    }

    #[test]
    fn test_stale_cycle_is_dropped() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        let old = app.begin_refresh();
        let new = app.begin_refresh();

        assert!(app.apply_refresh(new.generation, resolved(&["TCS"])));
        // Le cycle 1 arrive en retard : ignoré
        assert!(!app.apply_refresh(old.generation, resolved(&["RELIANCE", "TCS"])));
        assert_eq!(shown(&app), ["TCS"]);
    }

    #[test]
    fn test_add_symbol_flow() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let request = app.begin_refresh();
        app.apply_refresh(request.generation, resolved(&["RELIANCE", "TCS", "INFY", "HDFCBANK"]));

        let symbol = app.add_symbol("sunpharma").unwrap();
        assert_eq!(symbol, "SUNPHARMA");
        app.apply_single(&symbol, price_cache::lookup(&symbol));
        assert_eq!(shown(&app).last(), Some(&"SUNPHARMA"));

        // Déjà présent : rien ne change, pas d'alerte
        assert!(app.add_symbol("SUNPHARMA").is_none());
        assert!(!app.has_alert());
        assert_eq!(app.watchlist().len(), 5);
    }

    #[test]
    fn test_unknown_symbol_raises_alert() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        assert!(app.add_symbol("AAPL").is_none());
        let alert = app.alert.clone().unwrap();
        assert!(alert.contains("RELIANCE, TCS, INFY, HDFCBANK, SUNPHARMA, DRREDDY"));
        assert_eq!(app.watchlist().len(), 4);

        app.dismiss_alert();
        assert!(!app.has_alert());
    }

    #[test]
    fn test_clear_flow() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let request = app.begin_refresh();
        app.apply_refresh(request.generation, resolved(&["RELIANCE", "TCS", "INFY", "HDFCBANK"]));

        app.request_clear();
        assert!(app.is_awaiting_clear_confirmation());
        assert!(!app.answer_clear(false));
        assert_eq!(app.quotes().len(), 4);

        app.request_clear();
        assert!(app.answer_clear(true));
        assert!(app.watchlist().is_empty());
        assert!(app.quotes().is_empty());
        assert!(app.is_on_dashboard());
        assert!(!app.is_loading());
    }

    #[test]
    fn test_results_for_cleared_symbols_are_dropped() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let request = app.begin_refresh();
        app.request_clear();
        app.answer_clear(true);

        // Cycle lancé avant le clear
        app.apply_refresh(request.generation, resolved(&["RELIANCE", "TCS"]));
        assert!(app.quotes().is_empty());

        app.apply_single("TCS", price_cache::lookup("TCS"));
        assert!(app.quotes().is_empty());
    }

    #[test]
    fn test_added_symbol_survives_older_cycle() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        // Cycle lancé avant l'ajout, terminé après
        let request = app.begin_refresh();
        let symbol = app.add_symbol("SUNPHARMA").unwrap();
        app.apply_single(&symbol, price_cache::lookup(&symbol));
        assert!(app.apply_refresh(request.generation, resolved(&["RELIANCE", "TCS", "INFY", "HDFCBANK"])));

        assert_eq!(shown(&app), ["RELIANCE", "TCS", "INFY", "HDFCBANK", "SUNPHARMA"]);
    }

    #[test]
    fn test_displayed_symbol_is_watchlist_symbol() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let request = app.begin_refresh();

        let mut results = resolved(&["TCS"]);
        if let Some(quote) = results[0].quote.as_mut() {
            quote.symbol = "tcs".to_string();
            quote.origin = QuoteOrigin::Live;
        }
        app.apply_refresh(request.generation, results);

        let selected = app.select_index(0).unwrap();
        assert_eq!(selected, "TCS");
        app.on_select(&selected);
        assert!(app.details().unwrap().error.is_none());

        let mut single = price_cache::lookup("INFY");
        if let Some(quote) = single.as_mut() {
            quote.symbol = "Infy".to_string();
        }
        app.apply_single("INFY", single);
        assert_eq!(shown(&app), ["TCS", "INFY"]);
    }

    #[test]
    fn test_navigation() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let request = app.begin_refresh();
        app.apply_refresh(request.generation, resolved(&["RELIANCE", "TCS", "INFY"]));

        app.navigate_down();
        app.navigate_down();
        app.navigate_down();
        assert_eq!(app.selected_index, 2);
        app.navigate_up();
        assert_eq!(app.selected_quote().unwrap().symbol, "TCS");

        assert_eq!(app.select_index(0).as_deref(), Some("RELIANCE"));
        assert!(app.select_index(9).is_none());
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_details_replace_previous() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let mut rng = StdRng::seed_from_u64(11);
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        app.show_details("TCS", today, &mut rng);
        assert!(app.is_on_details());
        assert_eq!(app.details().unwrap().symbol, "TCS");

        app.show_details("INFY", today, &mut rng);
        assert_eq!(app.details().unwrap().symbol, "INFY");

        app.close_details();
        assert!(app.is_on_dashboard());
    }

    #[test]
    fn test_details_error_still_opens() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.on_select("WIPRO");

        assert!(app.is_on_details());
        assert!(app.details().unwrap().error.is_some());
    }

    #[test]
    fn test_news_updates() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let article = NewsArticle {
            title: "Nifty closes higher".to_string(),
            description: "N/A".to_string(),
            published: "27/12/2025".to_string(),
        };

        app.apply_news(Some(vec![article.clone()]));
        assert_eq!(app.news, NewsFeed::Articles(vec![article.clone()]));

        // Réponse vide : on garde le fil
        app.apply_news(Some(Vec::new()));
        assert_eq!(app.news, NewsFeed::Articles(vec![article]));

        app.apply_news(None);
        assert_eq!(app.news, NewsFeed::Unavailable);
    }

    #[test]
    fn test_input_mode() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        app.start_input("Add symbol: ".to_string());
        assert!(app.is_in_input_mode());
        app.append_char('t');
        app.append_char('c');
        app.append_char('x');
        app.backspace();
        app.append_char('s');

        assert_eq!(app.submit_input(), "tcs");
        assert!(app.is_on_dashboard());
        assert!(app.input_buffer.is_empty());
    }
}
