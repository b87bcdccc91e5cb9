// ============================================================================
// Market Clock : heures d'ouverture du marché
// ============================================================================
// Le marché est ouvert de 09:15 à 15:45 (bornes incluses) dans un fuseau
// fixe UTC+05:30, quel que soit le fuseau de la machine hôte.
//
// CONCEPTS RUST :
// 1. Fonctions pures : l'instant est un paramètre, testable sans horloge
// 2. Décalage fixe appliqué à l'instant UTC, sans base de fuseaux
// ============================================================================

use chrono::{DateTime, Duration, Timelike, Utc};

/// Décalage du fuseau simulé : +5h30
const MARKET_OFFSET_SECS: i64 = 5 * 3600 + 30 * 60;

/// Ouverture : 09:15 en minutes depuis minuit
pub const OPEN_MINUTE: u32 = 9 * 60 + 15;

/// Fermeture : 15:45 en minutes depuis minuit
pub const CLOSE_MINUTE: u32 = 15 * 60 + 45;

/// Session de marché, dérivée de l'horloge (jamais stockée)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketSession {
    Open,
    Closed,
}

impl MarketSession {
    /// Session à un instant donné
    pub fn at(instant: DateTime<Utc>) -> Self {
        if is_market_open_at(instant) {
            MarketSession::Open
        } else {
            MarketSession::Closed
        }
    }

    /// Session maintenant
    pub fn current() -> Self {
        if is_market_open() {
            MarketSession::Open
        } else {
            MarketSession::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        *self == MarketSession::Open
    }

    /// Texte de l'indicateur de statut
    pub fn label(&self) -> &'static str {
        match self {
            MarketSession::Open => "Market Open - Live",
            MarketSession::Closed => "Last Close Prices",
        }
    }
}

/// Minutes écoulées depuis minuit dans le fuseau du marché
pub fn market_minutes(instant: DateTime<Utc>) -> u32 {
    let local = instant + Duration::seconds(MARKET_OFFSET_SECS);
    local.hour() * 60 + local.minute()
}

/// Vrai si `minutes` tombe dans [OPEN_MINUTE, CLOSE_MINUTE]
pub fn is_open_minute(minutes: u32) -> bool {
    (OPEN_MINUTE..=CLOSE_MINUTE).contains(&minutes)
}

/// Vrai si le marché est ouvert à l'instant donné
pub fn is_market_open_at(instant: DateTime<Utc>) -> bool {
    is_open_minute(market_minutes(instant))
}

/// Vrai si le marché est ouvert maintenant
pub fn is_market_open() -> bool {
    is_market_open_at(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Instant UTC dont l'heure de marché vaut `minutes`
    fn utc_for_market_minutes(minutes: u32) -> DateTime<Utc> {
        // 00:00 marché = 18:30 UTC la veille
        let midnight_market = Utc.with_ymd_and_hms(2025, 12, 28, 18, 30, 0).unwrap();
        midnight_market + chrono::Duration::minutes(minutes as i64)
    }

    #[test]
    fn test_market_minutes_offset() {
        let instant = Utc.with_ymd_and_hms(2025, 12, 29, 3, 45, 0).unwrap();
        assert_eq!(market_minutes(instant), 555);
    }

    #[test]
    fn test_open_boundaries() {
        assert!(!is_market_open_at(utc_for_market_minutes(554)));
        assert!(is_market_open_at(utc_for_market_minutes(555)));
        assert!(is_market_open_at(utc_for_market_minutes(945)));
        assert!(!is_market_open_at(utc_for_market_minutes(946)));
    }

    #[test]
    fn test_whole_day() {
        for minutes in 0..(24 * 60) {
            let expected = (555..=945).contains(&minutes);
            assert_eq!(is_market_open_at(utc_for_market_minutes(minutes)), expected, "minute {}", minutes);
        }
    }

    #[test]
    fn test_session_label() {
        let open = MarketSession::at(utc_for_market_minutes(600));
        assert!(open.is_open());
        assert_eq!(open.label(), "Market Open - Live");

        let closed = MarketSession::at(utc_for_market_minutes(1000));
        assert_eq!(closed, MarketSession::Closed);
        assert_eq!(closed.label(), "Last Close Prices");
    }
}
