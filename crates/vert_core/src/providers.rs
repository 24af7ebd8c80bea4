use async_trait::async_trait;

use crate::types::{Article, ArticleContext, ChatReply, PageQuery};
use crate::Result;

#[async_trait]
pub trait HeadlinesProvider: Send + Sync {
    /// Returns the name of the headlines source
    fn name(&self) -> &str;

    /// Fetch one page of articles for the given cursor
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Article>>;

    /// Whether an upstream credential is configured
    fn configured(&self) -> bool {
        false
    }
}

#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Returns the name of the QA provider
    fn name(&self) -> &str;

    /// Answer a question about the given article
    async fn answer(&self, question: &str, article: &ArticleContext) -> Result<ChatReply>;

    /// Whether an upstream credential is configured
    fn configured(&self) -> bool {
        false
    }
}
