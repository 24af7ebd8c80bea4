use std::fmt;

use async_trait::async_trait;
use vert_core::{AnswerProvider, ArticleContext, ChatReply, Result};

/// Offline QA provider: answers from the article text alone. Useful for
/// development and demos with no upstream credential at all.
pub struct CannedAnswerer;

impl CannedAnswerer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CannedAnswerer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CannedAnswerer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CannedAnswerer").finish()
    }
}

#[async_trait]
impl AnswerProvider for CannedAnswerer {
    fn name(&self) -> &str {
        "canned"
    }

    async fn answer(&self, _question: &str, article: &ArticleContext) -> Result<ChatReply> {
        // Take the first 30 words of whatever text the article carries
        let body = article
            .content
            .as_deref()
            .or(article.description.as_deref())
            .unwrap_or_default();
        let excerpt: Vec<&str> = body.split_whitespace().take(30).collect();

        let text = if excerpt.is_empty() {
            format!(
                "The article \"{}\" has no text I can quote, but I'd start with its headline.",
                article.title
            )
        } else {
            format!(
                "Here is what \"{}\" says: {}",
                article.title,
                excerpt.join(" ")
            )
        };
        Ok(ChatReply::substituted(text))
    }
}
