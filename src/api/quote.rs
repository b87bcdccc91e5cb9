// ============================================================================
// API Client : cotations live (NSE)
// ============================================================================
// GET {base}/quote/{symbol}
// → {"price": 2950.1, "change": -0.4, "company": "...", "volume": "...",
//    "52W High": 3205.0, ...}
//
// L'API est considérée comme peu fiable : prix absent ou <= 0 = échec.
//
// CONCEPTS RUST :
// 1. Trait QuoteSource : la source live est injectable (tests sans réseau)
// 2. impl Future dans un trait : méthode async sans crate supplémentaire
// 3. #[serde(rename = "...")] pour les clés JSON non idiomatiques
// ============================================================================

use std::future::Future;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::config::Config;
use crate::models::{Quote, QuoteOrigin};

/// Source de cotations live
///
/// CONCEPT RUST : Trait comme point d'injection
/// - Production : `NseClient` (HTTP)
/// - Tests : une implémentation en mémoire
pub trait QuoteSource {
    /// Récupère la cotation live d'un symbole
    fn fetch_quote(&self, symbol: &str) -> impl Future<Output = Result<Quote>> + Send;
}

/// Réponse JSON de l'API de cotations
///
/// Tous les champs sont optionnels : l'API ne garantit rien.
#[derive(Debug, Deserialize)]
struct LiveQuote {
    price: Option<f64>,
    change: Option<f64>,
    symbol: Option<String>,
    company: Option<String>,
    volume: Option<String>,
    #[serde(rename = "52W High")]
    high_52w: Option<f64>,
}

impl LiveQuote {
    /// Valide la réponse et la convertit en Quote
    fn into_quote(self, requested: &str) -> Result<Quote> {
        let price = match self.price {
            Some(price) if price > 0.0 => price,
            other => anyhow::bail!("invalid live price for {}: {:?}", requested, other),
        };

        // Le symbole renvoyé par l'API ne sert qu'au texte affiché
        let company = [self.company, self.symbol]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
            .unwrap_or_else(|| requested.to_string());

        Ok(Quote {
            symbol: requested.to_string(),
            company,
            price,
            change: self.change.unwrap_or(0.0),
            volume: self.volume,
            high_52w: self.high_52w,
            close_date: None,
            origin: QuoteOrigin::Live,
        })
    }
}

/// Client HTTP de l'API de cotations
#[derive(Debug, Clone)]
pub struct NseClient {
    client: reqwest::Client,
    base_url: String,
}

impl NseClient {
    /// Crée le client à partir de la configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("niftywatch/", env!("CARGO_PKG_VERSION")))
            .timeout(config.http_timeout)
            .build()
            .context("Failed to build HTTP client for quote API")?;

        Ok(Self {
            client,
            base_url: config.quote_api.clone(),
        })
    }

    fn quote_url(&self, symbol: &str) -> String {
        format!("{}/quote/{}", self.base_url, symbol)
    }
}

impl QuoteSource for NseClient {
    #[instrument(skip(self))]
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        let url = self.quote_url(symbol);
        debug!(url = %url, "Requesting live quote");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("HTTP request to quote API failed")?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Quote API returned error status");
            anyhow::bail!("quote API returned HTTP {}", status);
        }

        let live: LiveQuote = response
            .json()
            .await
            .context("Failed to parse quote API response")?;

        let quote = live.into_quote(symbol)?;
        debug!(price = quote.price, change = quote.change, "Live quote received");
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str, symbol: &str) -> Result<Quote> {
        let live: LiveQuote = serde_json::from_str(json)?;
        live.into_quote(symbol)
    }

    #[test]
    fn test_quote_url() {
        let config = Config {
            quote_api: "http://localhost:5000".to_string(),
            ..Config::default()
        };
        let client = NseClient::new(&config).unwrap();
        assert_eq!(client.quote_url("TCS"), "http://localhost:5000/quote/TCS");
    }

    #[test]
    fn test_full_response() {
        let quote = parse(
            r#"{"price": 4190.5, "change": 0.3, "symbol": "TCS", "company": "TCS Ltd",
                "volume": "8.1M", "series": "EQ", "52W High": 4520.0}"#,
            "TCS",
        )
        .unwrap();

        assert_eq!(quote.price, 4190.5);
        assert_eq!(quote.company, "TCS Ltd");
        assert_eq!(quote.high_52w, Some(4520.0));
        assert_eq!(quote.origin, QuoteOrigin::Live);
    }

    #[test]
    fn test_minimal_response_uses_requested_symbol() {
        let quote = parse(r#"{"price": 1850.0, "change": -0.2}"#, "INFY").unwrap();
        assert_eq!(quote.symbol, "INFY");
        assert_eq!(quote.company, "INFY");
        assert!(quote.volume.is_none());
    }

    #[test]
    fn test_symbol_is_always_the_requested_one() {
        let quote = parse(r#"{"price": 4190.5, "change": 0.3, "symbol": "tcs"}"#, "TCS").unwrap();
        assert_eq!(quote.symbol, "TCS");
        assert_eq!(quote.company, "tcs");

        let quote = parse(
            r#"{"price": 4190.5, "symbol": "TCS.NS", "company": "TCS Ltd"}"#,
            "TCS",
        )
        .unwrap();
        assert_eq!(quote.symbol, "TCS");
        assert_eq!(quote.company, "TCS Ltd");
    }

    #[test]
    fn test_missing_or_non_positive_price_is_failure() {
        assert!(parse(r#"{"change": 1.0}"#, "INFY").is_err());
        assert!(parse(r#"{"price": 0, "change": 1.0}"#, "INFY").is_err());
        assert!(parse(r#"{"price": -3.5}"#, "INFY").is_err());
    }

    #[test]
    fn test_malformed_json_is_failure() {
        assert!(parse(r#"{"price": "abc"}"#, "INFY").is_err());
        assert!(parse("<html>", "INFY").is_err());
    }
}
