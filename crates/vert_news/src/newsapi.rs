use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;
use vert_core::{Article, ArticleSource, HeadlinesProvider, PageQuery, Result};

use crate::mock::sample_articles;

const PLACEHOLDER_REMOVED: &str = "[Removed]";

/// Wire shape of the headlines listing, before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHeadlines {
    #[allow(dead_code)]
    status: String,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<DateTime<Utc>>,
    source: Option<RawSource>,
    author: Option<String>,
}

#[derive(Deserialize)]
struct RawSource {
    id: Option<String>,
    name: Option<String>,
}

impl RawArticle {
    /// Validate one wire row into a typed article. Rows missing an image,
    /// title, or description, carrying the upstream removal placeholder, or
    /// with an unparseable URL are dropped.
    fn validate(self) -> Option<Article> {
        let title = non_empty(self.title)?;
        let description = non_empty(self.description)?;
        let image_url = non_empty(self.url_to_image)?;
        if title == PLACEHOLDER_REMOVED || description == PLACEHOLDER_REMOVED {
            return None;
        }
        let url = non_empty(self.url)?;
        Url::parse(&url).ok()?;

        let source = match self.source {
            Some(raw) => ArticleSource {
                id: raw.id,
                name: raw.name.unwrap_or_else(|| "Unknown".to_string()),
            },
            None => ArticleSource {
                id: None,
                name: "Unknown".to_string(),
            },
        };

        Some(Article {
            url,
            title,
            description,
            content: self.content.filter(|c| !c.is_empty()),
            image_url: Some(image_url),
            published_at: self.published_at?,
            source,
            author: self.author.filter(|a| !a.is_empty()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Client for a NewsAPI-compatible top-headlines endpoint.
///
/// Missing credential and upstream failure both degrade to the fixed sample
/// set; callers always receive renderable articles, never an error.
pub struct NewsApiClient {
    client: Arc<Client>,
    api_key: Option<String>,
    base_url: String,
}

impl NewsApiClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://newsapi.org/v2";

    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn request(&self, key: &str, query: &PageQuery) -> Result<Vec<Article>> {
        let raw = self
            .client
            .get(format!("{}/top-headlines", self.base_url))
            .query(&[
                ("apiKey", key),
                ("category", query.category.as_str()),
                ("country", query.country.as_str()),
                ("page", query.page.to_string().as_str()),
                ("pageSize", query.page_size.to_string().as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<RawHeadlines>()
            .await?;

        let total = raw.articles.len();
        let articles: Vec<Article> = raw
            .articles
            .into_iter()
            .filter_map(RawArticle::validate)
            .collect();
        if articles.len() < total {
            info!(
                "dropped {} unrenderable articles out of {}",
                total - articles.len(),
                total
            );
        }
        Ok(articles)
    }
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl HeadlinesProvider for NewsApiClient {
    fn name(&self) -> &str {
        "newsapi"
    }

    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Article>> {
        let Some(key) = self.api_key.as_deref() else {
            info!("news credential not configured, serving sample headlines");
            return Ok(sample_articles());
        };

        match self.request(key, query).await {
            Ok(articles) => Ok(articles),
            Err(e) => {
                warn!("headlines request failed, serving sample headlines: {}", e);
                Ok(sample_articles())
            }
        }
    }

    fn configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, description: &str, image: Option<&str>) -> RawArticle {
        RawArticle {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            content: Some("Body".to_string()),
            url: Some("https://example.com/story".to_string()),
            url_to_image: image.map(|i| i.to_string()),
            published_at: Some(Utc::now()),
            source: Some(RawSource {
                id: None,
                name: Some("Wire".to_string()),
            }),
            author: Some("Reporter".to_string()),
        }
    }

    #[test]
    fn validation_accepts_complete_rows() {
        let article = raw("Title", "Description", Some("https://img/x.jpg"))
            .validate()
            .unwrap();
        assert_eq!(article.title, "Title");
        assert_eq!(article.source.name, "Wire");
        assert_eq!(article.image_url.as_deref(), Some("https://img/x.jpg"));
    }

    #[test]
    fn validation_drops_missing_image_title_description() {
        assert!(raw("Title", "Description", None).validate().is_none());

        let mut no_title = raw("", "Description", Some("https://img/x.jpg"));
        no_title.title = None;
        assert!(no_title.validate().is_none());

        let empty_description = raw("Title", "", Some("https://img/x.jpg"));
        assert!(empty_description.validate().is_none());
    }

    #[test]
    fn validation_drops_removal_placeholders() {
        assert!(raw("[Removed]", "Description", Some("https://img/x.jpg"))
            .validate()
            .is_none());
        assert!(raw("Title", "[Removed]", Some("https://img/x.jpg"))
            .validate()
            .is_none());
    }

    #[test]
    fn validation_drops_unparseable_urls() {
        let mut bad = raw("Title", "Description", Some("https://img/x.jpg"));
        bad.url = Some("not a url".to_string());
        assert!(bad.validate().is_none());
    }

    #[test]
    fn missing_source_defaults_to_unknown() {
        let mut row = raw("Title", "Description", Some("https://img/x.jpg"));
        row.source = None;
        assert_eq!(row.validate().unwrap().source.name, "Unknown");
    }

    #[tokio::test]
    async fn missing_credential_serves_samples_not_errors() {
        let client = NewsApiClient::new(None);
        assert!(!client.configured());

        let articles = client.fetch_page(&PageQuery::default()).await.unwrap();
        assert!(!articles.is_empty());
        assert_eq!(articles[0].title, "Sample News Article Title");
    }

    #[tokio::test]
    async fn unreachable_upstream_serves_samples() {
        // No listener on this port; the request fails at the transport level.
        let client = NewsApiClient::new(Some("k".to_string()))
            .with_base_url("http://127.0.0.1:9/v2");
        let articles = client.fetch_page(&PageQuery::default()).await.unwrap();
        assert_eq!(articles.len(), 5);
    }

    #[test]
    fn wire_shape_parses_camel_case() {
        let payload = r#"{
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "title": "T",
                "description": "D",
                "content": "C",
                "url": "https://example.com/t",
                "urlToImage": "https://img/t.jpg",
                "publishedAt": "2026-08-01T12:00:00Z",
                "source": {"id": null, "name": "Wire"},
                "author": null
            }]
        }"#;
        let raw: RawHeadlines = serde_json::from_str(payload).unwrap();
        assert_eq!(raw.articles.len(), 1);
        let article = raw
            .articles
            .into_iter()
            .next()
            .unwrap()
            .validate()
            .unwrap();
        assert!(article.author.is_none());
        assert_eq!(article.url, "https://example.com/t");
    }
}
