use chrono::{Duration, Utc};
use vert_core::{Article, ArticleSource};

/// Fixed sample headlines served whenever the upstream news provider is
/// unconfigured or unreachable, so the feed always has renderable content.
pub fn sample_articles() -> Vec<Article> {
    let now = Utc::now();
    vec![
        Article {
            title: "Sample News Article Title".to_string(),
            description: "This is a sample news article description. In a real deployment, \
                          this would be fetched from the headlines provider."
                .to_string(),
            content: Some(
                "Sample content for the news article. This would normally contain the full \
                 article text."
                    .to_string(),
            ),
            url: "https://example.com/sample-1".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1504711434969-e33886168f5c?w=800".to_string(),
            ),
            published_at: now,
            source: ArticleSource {
                id: Some("sample-source".to_string()),
                name: "Sample News Source".to_string(),
            },
            author: Some("Sample Author".to_string()),
        },
        Article {
            title: "Another Sample Article".to_string(),
            description: "This is another sample article to demonstrate the scrolling \
                          functionality."
                .to_string(),
            content: Some("More sample content for demonstration purposes.".to_string()),
            url: "https://example.com/sample-2".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1611273426858-450d8e3c9fce?w=800".to_string(),
            ),
            published_at: now - Duration::hours(1),
            source: ArticleSource {
                id: Some("sample-source-2".to_string()),
                name: "Another News Source".to_string(),
            },
            author: Some("Another Author".to_string()),
        },
        Article {
            title: "Technology News Update".to_string(),
            description: "Latest developments in technology and innovation around the world."
                .to_string(),
            content: Some("Technology continues to evolve at a rapid pace...".to_string()),
            url: "https://example.com/sample-3".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1518770660439-4636190af475?w=800".to_string(),
            ),
            published_at: now - Duration::hours(2),
            source: ArticleSource {
                id: Some("tech-source".to_string()),
                name: "Tech News".to_string(),
            },
            author: Some("Tech Reporter".to_string()),
        },
        Article {
            title: "Breaking News: AI Developments".to_string(),
            description: "Recent breakthroughs in artificial intelligence and machine learning \
                          technologies."
                .to_string(),
            content: Some(
                "Artificial intelligence continues to advance rapidly with new developments..."
                    .to_string(),
            ),
            url: "https://example.com/sample-4".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1677442136019-21780ecad995?w=800".to_string(),
            ),
            published_at: now - Duration::hours(3),
            source: ArticleSource {
                id: Some("ai-news".to_string()),
                name: "AI News Daily".to_string(),
            },
            author: Some("AI Reporter".to_string()),
        },
        Article {
            title: "Climate Change Summit Results".to_string(),
            description: "Global leaders reach new agreements on climate action and \
                          sustainability goals."
                .to_string(),
            content: Some(
                "The international climate summit concluded with significant commitments..."
                    .to_string(),
            ),
            url: "https://example.com/sample-5".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1473341304170-971dccb5ac1e?w=800".to_string(),
            ),
            published_at: now - Duration::hours(4),
            source: ArticleSource {
                id: Some("climate-news".to_string()),
                name: "Environmental Times".to_string(),
            },
            author: Some("Climate Correspondent".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_set_is_renderable() {
        let articles = sample_articles();
        assert_eq!(articles.len(), 5);
        for article in &articles {
            assert!(!article.title.is_empty());
            assert!(!article.description.is_empty());
            assert!(article.image_url.is_some());
        }
    }

    #[test]
    fn sample_urls_are_distinct() {
        let articles = sample_articles();
        let mut urls: Vec<&str> = articles.iter().map(|a| a.url.as_str()).collect();
        urls.sort_unstable();
        urls.dedup();
        assert_eq!(urls.len(), articles.len());
    }
}
