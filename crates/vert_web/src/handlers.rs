use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use vert_core::{Article, ArticleContext, PageQuery};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsParams {
    category: String,
    country: String,
    page: u32,
    page_size: u32,
}

impl Default for NewsParams {
    fn default() -> Self {
        let defaults = PageQuery::default();
        Self {
            category: defaults.category,
            country: defaults.country,
            page: defaults.page,
            page_size: defaults.page_size,
        }
    }
}

impl From<NewsParams> for PageQuery {
    fn from(params: NewsParams) -> Self {
        Self {
            category: params.category,
            country: params.country,
            page: params.page,
            page_size: params.page_size,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    pub total_results: usize,
    pub articles: Vec<Article>,
}

pub async fn list_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NewsParams>,
) -> Json<NewsResponse> {
    let query: PageQuery = params.into();
    let articles = match state.headlines.fetch_page(&query).await {
        Ok(articles) => articles,
        Err(e) => {
            // Collaborators normally substitute on their own; keep the
            // endpoint renderable even for one that doesn't.
            warn!("headlines provider failed, serving sample headlines: {}", e);
            vert_news::mock::sample_articles()
        }
    };

    Json(NewsResponse {
        status: "ok".to_string(),
        total_results: articles.len(),
        articles,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub article_title: String,
    pub article_content: Option<String>,
    pub article_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(skip_serializing_if = "is_false")]
    pub fallback: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::MissingMessage);
    }

    let context = ArticleContext {
        title: request.article_title,
        description: request.article_description,
        content: request.article_content,
    };

    let reply = match state.answers.answer(message, &context).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("answer provider failed, serving canned reply: {}", e);
            let picker = vert_chat::fallback::uniform_picker();
            vert_core::ChatReply::substituted(vert_chat::fallback::pick_upstream_fallback(&picker))
        }
    };

    Ok(Json(ChatResponse {
        response: reply.text,
        fallback: reply.fallback,
    }))
}

#[derive(Debug, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub configured: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub headlines: ProviderStatus,
    pub answers: ProviderStatus,
}

pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        headlines: ProviderStatus {
            name: state.headlines.name().to_string(),
            configured: state.headlines.configured(),
        },
        answers: ProviderStatus {
            name: state.answers.name().to_string(),
            configured: state.answers.configured(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use vert_chat::fallback::UPSTREAM_FALLBACKS;
    use vert_chat::SonarClient;
    use vert_core::{
        AnswerProvider, ChatReply, Error, HeadlinesProvider, Result,
    };
    use vert_news::NewsApiClient;

    struct FailingHeadlines;

    #[async_trait]
    impl HeadlinesProvider for FailingHeadlines {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch_page(&self, _query: &PageQuery) -> Result<Vec<Article>> {
            Err(Error::Headlines("down".to_string()))
        }
    }

    struct FailingAnswers;

    #[async_trait]
    impl AnswerProvider for FailingAnswers {
        fn name(&self) -> &str {
            "failing"
        }

        async fn answer(&self, _q: &str, _a: &ArticleContext) -> Result<ChatReply> {
            Err(Error::Answer("down".to_string()))
        }
    }

    fn unconfigured_state() -> Arc<AppState> {
        Arc::new(AppState {
            headlines: Arc::new(NewsApiClient::new(None)),
            answers: Arc::new(SonarClient::new(None)),
        })
    }

    fn chat_request(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            article_title: "Summit".to_string(),
            article_content: Some("Leaders met.".to_string()),
            article_description: Some("A summit.".to_string()),
        }
    }

    #[tokio::test]
    async fn news_without_credential_is_ok_and_non_empty() {
        let Json(response) =
            list_news(State(unconfigured_state()), Query(NewsParams::default())).await;
        assert_eq!(response.status, "ok");
        assert!(!response.articles.is_empty());
        assert_eq!(response.total_results, response.articles.len());
    }

    #[tokio::test]
    async fn news_survives_a_failing_provider() {
        let state = Arc::new(AppState {
            headlines: Arc::new(FailingHeadlines),
            answers: Arc::new(SonarClient::new(None)),
        });
        let Json(response) = list_news(State(state), Query(NewsParams::default())).await;
        assert_eq!(response.status, "ok");
        assert!(!response.articles.is_empty());
    }

    #[tokio::test]
    async fn chat_with_provider_down_returns_fallback_from_fixed_set() {
        let Json(response) = chat(State(unconfigured_state()), Json(chat_request("why?")))
            .await
            .unwrap();
        assert!(response.fallback);
        assert!(UPSTREAM_FALLBACKS.contains(&response.response.as_str()));
    }

    #[tokio::test]
    async fn chat_survives_an_erroring_provider() {
        let state = Arc::new(AppState {
            headlines: Arc::new(NewsApiClient::new(None)),
            answers: Arc::new(FailingAnswers),
        });
        let Json(response) = chat(State(state), Json(chat_request("why?")))
            .await
            .unwrap();
        assert!(response.fallback);
        assert!(!response.response.is_empty());
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let result = chat(State(unconfigured_state()), Json(chat_request("   "))).await;
        assert!(matches!(result, Err(ApiError::MissingMessage)));
    }

    #[tokio::test]
    async fn fallback_flag_is_omitted_for_real_answers() {
        let value = serde_json::to_value(ChatResponse {
            response: "hi".to_string(),
            fallback: false,
        })
        .unwrap();
        assert!(value.get("fallback").is_none());

        let value = serde_json::to_value(ChatResponse {
            response: "hi".to_string(),
            fallback: true,
        })
        .unwrap();
        assert_eq!(value["fallback"], true);
    }

    #[tokio::test]
    async fn status_reports_provider_names() {
        let Json(response) = status(State(unconfigured_state())).await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.headlines.name, "newsapi");
        assert_eq!(response.answers.name, "sonar");
        assert!(!response.headlines.configured);
    }

    #[test]
    fn query_params_default_like_the_upstream_contract() {
        let params = NewsParams::default();
        let query: PageQuery = params.into();
        assert_eq!(query.category, "general");
        assert_eq!(query.country, "us");
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 10);
    }
}
