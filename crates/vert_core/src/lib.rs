pub mod error;
pub mod providers;
pub mod types;

pub use error::Error;
pub use providers::{AnswerProvider, HeadlinesProvider};
pub use types::{Article, ArticleContext, ArticleSource, ChatMessage, ChatReply, PageQuery};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::providers::{AnswerProvider, HeadlinesProvider};
    pub use crate::types::{Article, ArticleContext, ChatMessage, ChatReply, PageQuery};
    pub use crate::{Error, Result};
}
