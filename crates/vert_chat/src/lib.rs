pub mod fallback;
pub mod prompts;
pub mod providers;
pub mod session;

pub use providers::{create_provider, CannedAnswerer, SonarClient};
pub use session::{ChatSession, PendingQuestion};

pub mod prelude {
    pub use crate::prompts::suggested_prompts;
    pub use crate::providers::create_provider;
    pub use crate::session::ChatSession;
    pub use vert_core::{AnswerProvider, ChatMessage, ChatReply, Result};
}
