pub mod coalesce;
pub mod controller;
pub mod store;

pub use coalesce::ScrollCoalescer;
pub use controller::{FeedController, FeedKey, ScrollCommand};
pub use store::{ArticleStore, DedupPolicy};

pub mod prelude {
    pub use crate::controller::{FeedController, FeedKey, ScrollCommand};
    pub use crate::store::{ArticleStore, DedupPolicy};
    pub use vert_core::{Article, Error, Result};
}
