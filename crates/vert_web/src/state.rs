use std::sync::Arc;

use vert_core::{AnswerProvider, HeadlinesProvider};

pub struct AppState {
    pub headlines: Arc<dyn HeadlinesProvider>,
    pub answers: Arc<dyn AnswerProvider>,
}
