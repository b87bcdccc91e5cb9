// ============================================================================
// Historique de prix SYNTHÉTIQUE
// ============================================================================
// ATTENTION : ces points ne viennent d'aucune API d'historique.
// C'est une marche aléatoire cosmétique autour d'un prix de base, régénérée
// à chaque ouverture du panneau de détail. Ne pas la présenter comme des
// données réelles.
//
// CONCEPTS RUST :
// 1. Generics avec trait bound : R: Rng (le générateur est injecté)
// 2. Iterators : (0..n).rev() pour compter les jours à rebours
// ============================================================================

use chrono::{Duration, NaiveDate};
use rand::Rng;

/// Nombre de points générés (un par jour)
pub const HISTORY_DAYS: usize = 30;

/// Plancher appliqué à chaque point
pub const PRICE_FLOOR: f64 = 100.0;

/// Amplitude d'un pas : ±0.75% du prix de base
const STEP_FRACTION: f64 = 0.015;

/// Un point du graphique
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    /// Date du point (ex: "16/10/2026")
    pub label: String,
    pub price: f64,
}

/// Génère 30 jours d'historique synthétique à partir d'un prix de base
///
/// Le dernier point correspond à `today`. La marche elle-même n'est pas
/// bornée, seul le prix rapporté est ramené à `PRICE_FLOOR`.
pub fn synthesize_history<R: Rng>(base: f64, today: NaiveDate, rng: &mut R) -> Vec<HistoryPoint> {
    let mut price = base;

    (0..HISTORY_DAYS)
        .rev()
        .map(|days_ago| {
            price += (rng.gen::<f64>() - 0.5) * (base * STEP_FRACTION);
            let date = today - Duration::days(days_ago as i64);
            HistoryPoint {
                label: date.format("%d/%m/%Y").to_string(),
                price: price.max(PRICE_FLOOR),
            }
        })
        .collect()
}
