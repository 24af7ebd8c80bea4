use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vert_core::{AnswerProvider, ArticleContext, ChatReply, Error, Result};

use crate::fallback::{pick_upstream_fallback, uniform_picker, Picker};

#[derive(Serialize)]
struct QaMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct QaRequest {
    model: String,
    messages: Vec<QaMessage>,
    max_tokens: u32,
    temperature: f32,
    return_citations: bool,
    return_images: bool,
    return_related_questions: bool,
}

#[derive(Deserialize)]
struct QaResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

/// Client for a Perplexity-compatible conversational search endpoint.
///
/// Missing credential and upstream failure both degrade to a canned reply
/// marked `fallback`; callers never see an error.
pub struct SonarClient {
    client: Arc<Client>,
    api_key: Option<String>,
    base_url: String,
    picker: Picker,
}

impl SonarClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.perplexity.ai";

    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            picker: uniform_picker(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_picker(mut self, picker: Picker) -> Self {
        self.picker = picker;
        self
    }

    fn system_prompt(article: &ArticleContext) -> String {
        format!(
            "You are a helpful AI assistant that answers questions about news articles \
             and can access real-time information from the web when needed.\n\n\
             You have access to the following article:\n\
             Title: {}\n\
             Description: {}\n\
             Content: {}\n\n\
             Please provide informative, accurate responses about this article. If the \
             user asks about information not covered in the article, you can search the \
             web for the latest information. Keep responses concise but helpful.",
            article.title,
            article.description.as_deref().unwrap_or_default(),
            article.content.as_deref().unwrap_or("Content not available"),
        )
    }

    async fn request(&self, key: &str, question: &str, article: &ArticleContext) -> Result<String> {
        let request = QaRequest {
            model: "sonar".to_string(),
            messages: vec![
                QaMessage {
                    role: "system".to_string(),
                    content: Self::system_prompt(article),
                },
                QaMessage {
                    role: "user".to_string(),
                    content: question.to_string(),
                },
            ],
            max_tokens: 300,
            temperature: 0.7,
            return_citations: true,
            return_images: false,
            return_related_questions: false,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", key))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<QaResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::Answer("empty response from QA upstream".to_string()))
    }
}

impl fmt::Debug for SonarClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SonarClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl AnswerProvider for SonarClient {
    fn name(&self) -> &str {
        "sonar"
    }

    async fn answer(&self, question: &str, article: &ArticleContext) -> Result<ChatReply> {
        let Some(key) = self.api_key.as_deref() else {
            info!("QA credential not configured, serving canned reply");
            return Ok(ChatReply::substituted(pick_upstream_fallback(&self.picker)));
        };

        match self.request(key, question, article).await {
            Ok(text) => Ok(ChatReply::answered(text)),
            Err(e) => {
                warn!("QA request failed, serving canned reply: {}", e);
                Ok(ChatReply::substituted(pick_upstream_fallback(&self.picker)))
            }
        }
    }

    fn configured(&self) -> bool {
        self.api_key.is_some()
    }
}
