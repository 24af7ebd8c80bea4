use tracing::warn;
use vert_core::{AnswerProvider, Article, ArticleContext, ChatMessage, ChatReply, Result};

use crate::fallback::{uniform_picker, Picker, FALLBACK_HINT};
use crate::prompts::suggested_prompts;

/// Conversation about one article.
///
/// The owner calls [`reset_for`] whenever the active article's `url`
/// changes, including on first activation; the whole message sequence is
/// discarded then. A reply that comes back after such a reset belongs to a
/// conversation that no longer exists and is dropped.
///
/// [`reset_for`]: ChatSession::reset_for
pub struct ChatSession {
    article: Option<Article>,
    messages: Vec<ChatMessage>,
    awaiting: bool,
    generation: u64,
    picker: Picker,
}

/// Token for a question handed to the QA collaborator; pairs the request
/// with the conversation it was asked in.
#[derive(Debug, Clone)]
pub struct PendingQuestion {
    generation: u64,
    pub question: String,
    pub context: ArticleContext,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            article: None,
            messages: Vec::new(),
            awaiting: false,
            generation: 0,
            picker: uniform_picker(),
        }
    }

    pub fn with_picker(mut self, picker: Picker) -> Self {
        self.picker = picker;
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting
    }

    pub fn article(&self) -> Option<&Article> {
        self.article.as_ref()
    }

    /// Start a fresh conversation about `article`: clears all messages and
    /// cancels any awaited reply.
    pub fn reset_for(&mut self, article: &Article) {
        self.article = Some(article.clone());
        self.messages.clear();
        self.awaiting = false;
        self.generation += 1;
    }

    /// Starter questions for the current article.
    pub fn suggested_prompts(&self) -> Vec<String> {
        match &self.article {
            Some(article) => {
                let context = article.context();
                suggested_prompts(&article.title, context.content.as_deref().unwrap_or_default())
            }
            None => Vec::new(),
        }
    }

    /// Append the user's message optimistically and hand back the question
    /// to send. `None` when the text is blank, a reply is already awaited,
    /// or no article is active — all silently ignored inputs.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingQuestion> {
        let trimmed = text.trim();
        if trimmed.is_empty() || self.awaiting {
            return None;
        }
        let article = self.article.as_ref()?;

        self.messages.push(ChatMessage::from_user(trimmed));
        self.awaiting = true;
        Some(PendingQuestion {
            generation: self.generation,
            question: trimmed.to_string(),
            context: article.context(),
        })
    }

    /// Deliver the collaborator's outcome for a pending question. Replies
    /// for a conversation that has since been reset are discarded. Returns
    /// whether a message was appended.
    pub fn apply_reply(&mut self, pending: &PendingQuestion, result: Result<ChatReply>) -> bool {
        if pending.generation != self.generation {
            warn!("dropping reply for a conversation that was reset");
            return false;
        }
        self.awaiting = false;

        let content = match result {
            Ok(reply) if reply.fallback => format!("{}{}", reply.text, FALLBACK_HINT),
            Ok(reply) => reply.text,
            Err(e) => {
                warn!("QA collaborator failed: {}", e);
                self.local_fallback(&pending.context.title)
            }
        };
        self.messages.push(ChatMessage::from_assistant(content));
        true
    }

    /// Ask and wait for the reply in one step.
    pub async fn ask(&mut self, text: &str, provider: &dyn AnswerProvider) -> bool {
        let Some(pending) = self.begin_send(text) else {
            return false;
        };
        let result = provider.answer(&pending.question, &pending.context).await;
        self.apply_reply(&pending, result)
    }

    fn local_fallback(&self, title: &str) -> String {
        let replies = [
            format!(
                "I'd be happy to discuss \"{}\" with you, but I'm currently experiencing \
                 technical difficulties. Please try again in a moment.",
                title
            ),
            "That's an interesting question about this article. Unfortunately, I'm having \
             trouble accessing my AI capabilities right now."
                .to_string(),
            "I apologize, but I'm unable to process your question about this news story at \
             the moment. Please try again later."
                .to_string(),
        ];
        let index = (self.picker)(replies.len()).min(replies.len() - 1);
        replies[index].clone()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
