/// Suggested starter questions for an article, derived from keyword matches
/// against a fixed topic taxonomy.

pub const MAX_PROMPTS: usize = 6;

const GENERIC_PROMPTS: [&str; 4] = [
    "What are the main points of this article?",
    "Can you explain this in simpler terms?",
    "What are the latest developments on this topic?",
    "What are the implications of this news?",
];

struct Topic {
    content_keywords: &'static [&'static str],
    title_keywords: &'static [&'static str],
    prompts: [&'static str; 3],
}

const TOPICS: [Topic; 5] = [
    Topic {
        content_keywords: &["technology"],
        title_keywords: &["tech"],
        prompts: [
            "How might this technology impact society?",
            "What are the latest developments in this technology?",
            "What are the potential risks and benefits?",
        ],
    },
    Topic {
        content_keywords: &["economy", "financial", "market"],
        title_keywords: &[],
        prompts: [
            "What are the economic implications?",
            "What are the latest market reactions to this news?",
            "How might this affect the markets?",
        ],
    },
    Topic {
        content_keywords: &["politics", "government", "policy"],
        title_keywords: &[],
        prompts: [
            "What are the political implications?",
            "What are the latest reactions from political leaders?",
            "How might this affect policy decisions?",
        ],
    },
    Topic {
        content_keywords: &["health", "medical", "covid"],
        title_keywords: &[],
        prompts: [
            "What are the health implications?",
            "What are the latest medical developments on this topic?",
            "How might this affect public health?",
        ],
    },
    Topic {
        content_keywords: &["climate", "environment", "sustainability"],
        title_keywords: &[],
        prompts: [
            "What are the environmental implications?",
            "What are the latest climate science findings on this?",
            "How does this relate to climate change?",
        ],
    },
];

/// Generic prompts first, then prompts for each matched topic in
/// declaration order; duplicates removed, truncated to [`MAX_PROMPTS`].
pub fn suggested_prompts(title: &str, content: &str) -> Vec<String> {
    let title = title.to_lowercase();
    let content = content.to_lowercase();

    let mut prompts: Vec<&str> = GENERIC_PROMPTS.to_vec();
    for topic in &TOPICS {
        let matched = topic.content_keywords.iter().any(|k| content.contains(k))
            || topic.title_keywords.iter().any(|k| title.contains(k));
        if matched {
            prompts.extend_from_slice(&topic.prompts);
        }
    }

    let mut unique: Vec<String> = Vec::with_capacity(MAX_PROMPTS);
    for prompt in prompts {
        if unique.iter().any(|p| p == prompt) {
            continue;
        }
        unique.push(prompt.to_string());
        if unique.len() == MAX_PROMPTS {
            break;
        }
    }
    unique
}
