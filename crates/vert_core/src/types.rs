use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub url: String,
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source: ArticleSource,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: String,
}

impl Article {
    /// Article body handed to a QA collaborator; falls back to the
    /// description when the upstream truncated the content away.
    pub fn context(&self) -> ArticleContext {
        ArticleContext {
            title: self.title.clone(),
            description: Some(self.description.clone()),
            content: self.content.clone().or_else(|| Some(self.description.clone())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleContext {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub is_from_user: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn from_user(content: impl Into<String>) -> Self {
        Self::new(content, true)
    }

    pub fn from_assistant(content: impl Into<String>) -> Self {
        Self::new(content, false)
    }

    fn new(content: impl Into<String>, is_from_user: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            is_from_user,
            timestamp: Utc::now(),
        }
    }
}

/// What a QA collaborator returns. `fallback` marks locally substituted
/// content produced when the upstream provider was unreachable or
/// unconfigured; it is still valid conversational content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    pub fallback: bool,
}

impl ChatReply {
    pub fn answered(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fallback: false,
        }
    }

    pub fn substituted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fallback: true,
        }
    }
}

/// Cursor for one page of headlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub category: String,
    pub country: String,
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            category: "general".to_string(),
            country: "us".to_string(),
            page: 1,
            page_size: 10,
        }
    }
}

impl PageQuery {
    pub fn for_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(content: Option<&str>) -> Article {
        Article {
            url: "https://example.com/a".to_string(),
            title: "Test Article".to_string(),
            description: "A description.".to_string(),
            content: content.map(|c| c.to_string()),
            image_url: Some("https://example.com/a.jpg".to_string()),
            published_at: Utc::now(),
            source: ArticleSource {
                id: None,
                name: "test".to_string(),
            },
            author: None,
        }
    }

    #[test]
    fn context_falls_back_to_description() {
        let ctx = article(None).context();
        assert_eq!(ctx.content.as_deref(), Some("A description."));

        let ctx = article(Some("Full body")).context();
        assert_eq!(ctx.content.as_deref(), Some("Full body"));
    }

    #[test]
    fn article_serializes_camel_case() {
        let json = serde_json::to_value(article(None)).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("publishedAt").is_some());
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn chat_messages_get_unique_ids() {
        let a = ChatMessage::from_user("hi");
        let b = ChatMessage::from_user("hi");
        assert_ne!(a.id, b.id);
        assert!(a.is_from_user);
        assert!(!ChatMessage::from_assistant("hello").is_from_user);
    }

    #[test]
    fn page_query_defaults() {
        let q = PageQuery::default();
        assert_eq!(q.category, "general");
        assert_eq!(q.country, "us");
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, 10);

        let next = q.for_page(3);
        assert_eq!(next.page, 3);
        assert_eq!(next.category, "general");
    }
}
