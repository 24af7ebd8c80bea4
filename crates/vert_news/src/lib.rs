pub mod mock;
pub mod newsapi;

pub use newsapi::NewsApiClient;

pub mod prelude {
    pub use crate::mock::sample_articles;
    pub use crate::newsapi::NewsApiClient;
    pub use vert_core::{Article, HeadlinesProvider, PageQuery, Result};
}
