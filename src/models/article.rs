// ============================================================================
// Structure : NewsArticle
// ============================================================================
// Un article du fil d'actualités financières, prêt à être affiché
// ============================================================================

/// Texte affiché quand l'article n'a ni description ni résumé
pub const MISSING_DESCRIPTION: &str = "N/A";

/// Article de news
#[derive(Debug, Clone, PartialEq)]
pub struct NewsArticle {
    pub title: String,

    /// Description, ou "N/A"
    pub description: String,

    /// Date de publication déjà localisée (ex: "16/10/2026")
    pub published: String,
}

/// État du fil de news affiché
///
/// CONCEPT RUST : Enum pour un état d'affichage
/// - Le renderer n'a qu'à matcher les trois cas
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NewsFeed {
    /// Aucun chargement terminé pour l'instant
    #[default]
    Loading,

    /// Derniers articles reçus
    Articles(Vec<NewsArticle>),

    /// Le dernier chargement a échoué : une seule entrée statique
    Unavailable,
}

impl NewsFeed {
    /// Texte de l'entrée unique affichée quand rien n'est disponible
    pub const PLACEHOLDER: &'static str = "News loading...";
}
