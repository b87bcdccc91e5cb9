// ============================================================================
// Structure : Quote
// ============================================================================
// Cotation d'un symbole à un instant donné (prix, variation, volume, etc.)
//
// CONCEPTS RUST :
// 1. Valeurs immuables : une Quote n'est jamais modifiée, on la remplace
// 2. Option<T> : les champs que l'API live ne renvoie pas toujours
// 3. Enum simple (Copy) pour l'origine de la donnée
// ============================================================================

/// Origine d'une cotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteOrigin {
    /// Récupérée depuis l'API pendant les heures de marché
    Live,
    /// Dernier prix de clôture connu (table locale)
    LastClose,
}

/// Cotation d'un symbole
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Symbole (ex: "RELIANCE"), toujours en majuscules
    pub symbol: String,

    /// Nom de la société (ex: "Reliance Industries")
    pub company: String,

    /// Prix en roupies
    pub price: f64,

    /// Variation en pourcentage
    pub change: f64,

    /// Volume, déjà formaté pour l'affichage (ex: "11.8M")
    pub volume: Option<String>,

    /// Plus haut sur 52 semaines
    pub high_52w: Option<f64>,

    /// Label de la date de clôture (ex: "27-Dec")
    pub close_date: Option<String>,

    /// D'où vient cette cotation
    pub origin: QuoteOrigin,
}

impl Quote {
    /// Vrai si la variation est strictement positive
    ///
    /// Une variation nulle est affichée comme une baisse.
    pub fn is_up(&self) -> bool {
        self.change > 0.0
    }

    /// Prix formaté avec le symbole monétaire (ex: "₹2942.60")
    pub fn price_display(&self) -> String {
        format_rupees(self.price)
    }

    /// Variation formatée (ex: "-0.85%")
    pub fn change_display(&self) -> String {
        format!("{:.2}%", self.change)
    }

    /// Vrai si la cotation provient de la table de clôture
    pub fn is_last_close(&self) -> bool {
        self.origin == QuoteOrigin::LastClose
    }
}

/// Formate un montant en roupies avec 2 décimales
pub fn format_rupees(amount: f64) -> String {
    format!("₹{:.2}", amount)
}

/// Normalise un symbole saisi : espaces retirés, majuscules
///
/// # Exemple
/// `normalize_symbol("  tcs ")` → `"TCS"`
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}
