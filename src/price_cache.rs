// ============================================================================
// Price Cache : derniers prix de clôture connus
// ============================================================================
// Table statique (clôture du 27-Dec), utilisée :
// - hors heures de marché comme source unique
// - pendant les heures de marché quand l'API live échoue
// - toujours pour le panneau de détail
//
// CONCEPT RUST : données statiques
// - Un tableau `static` de structs avec des &'static str
// - Aucune allocation tant qu'on ne construit pas de Quote
// ============================================================================

use crate::models::{Quote, QuoteOrigin};

/// Label de la date de clôture de la table
pub const CLOSE_DATE: &str = "27-Dec";

/// Prix de base de l'historique synthétique pour un symbole inconnu
pub const DEFAULT_BASE_PRICE: f64 = 2000.0;

/// Une ligne de la table
struct ClosedPrice {
    symbol: &'static str,
    company: &'static str,
    price: f64,
    change: f64,
    volume: &'static str,
    high_52w: f64,
    /// Point de départ de l'historique synthétique
    base_price: f64,
}

static LAST_CLOSED_PRICES: [ClosedPrice; 6] = [
    ClosedPrice { symbol: "RELIANCE", company: "Reliance Industries", price: 2942.60, change: -0.85, volume: "11.8M", high_52w: 3205.00, base_price: 2942.0 },
    ClosedPrice { symbol: "TCS", company: "Tata Consultancy", price: 4178.25, change: 1.12, volume: "7.9M", high_52w: 4520.00, base_price: 4178.0 },
    ClosedPrice { symbol: "INFY", company: "Infosys Ltd", price: 1842.10, change: -0.45, volume: "14.7M", high_52w: 2015.00, base_price: 1842.0 },
    ClosedPrice { symbol: "HDFCBANK", company: "HDFC Bank", price: 1648.75, change: 0.65, volume: "21.2M", high_52w: 1820.00, base_price: 1648.0 },
    ClosedPrice { symbol: "SUNPHARMA", company: "Sun Pharma", price: 1712.40, change: 1.85, volume: "9.5M", high_52w: 1925.00, base_price: 1712.0 },
    ClosedPrice { symbol: "DRREDDY", company: "Dr Reddy Labs", price: 6523.50, change: -1.20, volume: "2.1M", high_52w: 6800.00, base_price: 6523.0 },
];

fn find(symbol: &str) -> Option<&'static ClosedPrice> {
    LAST_CLOSED_PRICES.iter().find(|row| row.symbol == symbol)
}

/// Cotation de clôture d'un symbole (déjà normalisé)
pub fn lookup(symbol: &str) -> Option<Quote> {
    find(symbol).map(|row| Quote {
        symbol: row.symbol.to_string(),
        company: row.company.to_string(),
        price: row.price,
        change: row.change,
        volume: Some(row.volume.to_string()),
        high_52w: Some(row.high_52w),
        close_date: Some(CLOSE_DATE.to_string()),
        origin: QuoteOrigin::LastClose,
    })
}

/// Vrai si le symbole est dans la table
pub fn contains(symbol: &str) -> bool {
    find(symbol).is_some()
}

/// Symboles supportés, dans l'ordre de la table
pub fn supported_symbols() -> impl Iterator<Item = &'static str> {
    LAST_CLOSED_PRICES.iter().map(|row| row.symbol)
}

/// Liste lisible des symboles supportés (ex: "RELIANCE, TCS, ...")
pub fn supported_symbols_display() -> String {
    supported_symbols().collect::<Vec<_>>().join(", ")
}

/// Prix de base pour l'historique synthétique
pub fn base_price(symbol: &str) -> f64 {
    find(symbol).map(|row| row.base_price).unwrap_or(DEFAULT_BASE_PRICE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_tcs() {
        let quote = lookup("TCS").unwrap();
        assert_eq!(quote.price, 4178.25);
        assert_eq!(quote.change, 1.12);
        assert_eq!(quote.company, "Tata Consultancy");
        assert_eq!(quote.close_date.as_deref(), Some("27-Dec"));
        assert_eq!(quote.origin, QuoteOrigin::LastClose);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        // Les symboles sont normalisés en amont
        assert!(lookup("tcs").is_none());
        assert!(lookup("AAPL").is_none());
    }

    #[test]
    fn test_supported_symbols_display() {
        assert_eq!(
            supported_symbols_display(),
            "RELIANCE, TCS, INFY, HDFCBANK, SUNPHARMA, DRREDDY"
        );
    }

    #[test]
    fn test_base_price() {
        assert_eq!(base_price("DRREDDY"), 6523.0);
        assert_eq!(base_price("UNKNOWN"), DEFAULT_BASE_PRICE);
    }
}
