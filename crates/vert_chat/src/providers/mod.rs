use std::sync::Arc;

use vert_core::{AnswerProvider, Error, Result};

pub mod canned;
pub mod sonar;

pub use canned::CannedAnswerer;
pub use sonar::SonarClient;

/// Build a QA provider by configured name.
pub fn create_provider(kind: &str, api_key: Option<String>) -> Result<Arc<dyn AnswerProvider>> {
    match kind {
        "sonar" => Ok(Arc::new(SonarClient::new(api_key))),
        "canned" => Ok(Arc::new(CannedAnswerer::new())),
        other => Err(Error::Answer(format!("unknown answer provider: {}", other))),
    }
}
