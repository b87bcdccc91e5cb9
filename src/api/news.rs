// ============================================================================
// API Client : actualités financières
// ============================================================================
// GET {endpoint}?countries=in&topics=finance&limit=6&api_token={token}
// → {"data": [{"title": "...", "description": "...", "published_at": "..."}]}
// ============================================================================

use std::future::Future;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::config::Config;
use crate::models::article::MISSING_DESCRIPTION;
use crate::models::NewsArticle;

/// Nombre maximum d'articles affichés
pub const NEWS_LIMIT: usize = 6;

/// Source du fil de news (HTTP en production, en mémoire dans les tests)
pub trait NewsSource {
    /// Derniers articles, au plus NEWS_LIMIT
    fn fetch_latest(&self) -> impl Future<Output = Result<Vec<NewsArticle>>> + Send;
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    data: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    #[serde(default)]
    title: String,
    description: Option<String>,
    summary: Option<String>,
    #[serde(default)]
    published_at: String,
}

impl RawArticle {
    fn into_article(self) -> NewsArticle {
        // description, puis summary, puis "N/A"
        let description = [self.description, self.summary]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
            .unwrap_or_else(|| MISSING_DESCRIPTION.to_string());

        NewsArticle {
            title: self.title,
            description,
            published: localize_date(&self.published_at),
        }
    }
}

/// Convertit une date RFC 3339 en date locale lisible
///
/// Une valeur illisible est renvoyée telle quelle.
pub fn localize_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.with_timezone(&Local).format("%d/%m/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Client HTTP de l'API de news
#[derive(Debug, Clone)]
pub struct NewsClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl NewsClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("niftywatch/", env!("CARGO_PKG_VERSION")))
            .timeout(config.http_timeout)
            .build()
            .context("Failed to build HTTP client for news API")?;

        Ok(Self {
            client,
            endpoint: config.news_api.clone(),
            token: config.news_token.clone(),
        })
    }
}

impl NewsSource for NewsClient {
    /// Une liste vide est un succès : c'est à l'appelant de décider s'il
    /// garde l'ancien fil.
    #[instrument(skip(self))]
    async fn fetch_latest(&self) -> Result<Vec<NewsArticle>> {
        let limit = NEWS_LIMIT.to_string();
        debug!(endpoint = %self.endpoint, "Requesting news");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("countries", "in"),
                ("topics", "finance"),
                ("limit", limit.as_str()),
                ("api_token", self.token.as_str()),
            ])
            .send()
            .await
            .context("HTTP request to news API failed")?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "News API returned error status");
            anyhow::bail!("news API returned HTTP {}", status);
        }

        let body: NewsResponse = response
            .json()
            .await
            .context("Failed to parse news API response")?;

        let articles = parse_articles(body);
        info!(count = articles.len(), "News fetched");
        Ok(articles)
    }
}

fn parse_articles(body: NewsResponse) -> Vec<NewsArticle> {
    body.data
        .into_iter()
        .take(NEWS_LIMIT)
        .map(RawArticle::into_article)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<NewsArticle> {
        parse_articles(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_description_fallbacks() {
        let articles = parse(
            r#"{"data": [
                {"title": "A", "description": "desc", "published_at": "x"},
                {"title": "B", "description": "  ", "summary": "sum", "published_at": "x"},
                {"title": "C", "published_at": "x"}
            ]}"#,
        );

        assert_eq!(articles[0].description, "desc");
        assert_eq!(articles[1].description, "sum");
        assert_eq!(articles[2].description, "N/A");
    }

    #[test]
    fn test_caps_at_six() {
        let items: Vec<String> = (0..9)
            .map(|i| format!(r#"{{"title": "t{}", "published_at": ""}}"#, i))
            .collect();
        let json = format!(r#"{{"data": [{}]}}"#, items.join(","));

        let articles = parse(&json);
        assert_eq!(articles.len(), NEWS_LIMIT);
        assert_eq!(articles[5].title, "t5");
    }

    #[test]
    fn test_missing_data_is_empty() {
        assert!(parse(r#"{"meta": {}}"#).is_empty());
    }

    #[test]
    fn test_localize_date() {
        // Midi UTC tombe le même jour pour tous les fuseaux entre -11h et +11h
        let localized = localize_date("2025-12-27T12:00:00.000000Z");
        assert!(localized.ends_with("/12/2025"), "{}", localized);

        assert_eq!(localize_date("yesterday"), "yesterday");
    }
}
