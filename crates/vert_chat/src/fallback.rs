use std::sync::Arc;

use rand::Rng;

/// Canned replies served when the QA upstream is unreachable or
/// unconfigured. Fixed set; selection is uniform.
pub const UPSTREAM_FALLBACKS: [&str; 3] = [
    "I'd be happy to discuss this article with you, but I'm currently experiencing \
     technical difficulties. Please try again in a moment.",
    "That's an interesting question about this article. Unfortunately, I'm having \
     trouble accessing my AI capabilities right now.",
    "I apologize, but I'm unable to process your question about this news story at \
     the moment. Please try again later.",
];

/// Suffix appended to any substituted reply so degraded answers stay
/// distinguishable from real ones.
pub const FALLBACK_HINT: &str = "\n\n💡 Tip: Make sure your answer provider API key is \
     configured to get full AI responses with web search capabilities.";

/// Chooses an index into a fallback set. Injected so tests can pin the
/// choice; correctness never depends on the seed.
pub type Picker = Arc<dyn Fn(usize) -> usize + Send + Sync>;

pub fn uniform_picker() -> Picker {
    Arc::new(|len| rand::thread_rng().gen_range(0..len))
}

pub fn fixed_picker(index: usize) -> Picker {
    Arc::new(move |len| index.min(len.saturating_sub(1)))
}

pub fn pick_upstream_fallback(picker: &Picker) -> &'static str {
    let index = picker(UPSTREAM_FALLBACKS.len()).min(UPSTREAM_FALLBACKS.len() - 1);
    UPSTREAM_FALLBACKS[index]
}
