use std::collections::HashSet;

use vert_core::Article;

/// Policy for articles the upstream repeats across successive pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Keep repeats, matching upstream paging behavior.
    AllowDuplicates,
    /// Drop any article whose `url` is already in the store.
    ByUrl,
}

/// Append-only ordered sequence of articles plus the active index.
///
/// The sequence never shrinks, so the active index stays valid after any
/// mutation. While the store is empty there is no active index.
#[derive(Debug)]
pub struct ArticleStore {
    items: Vec<Article>,
    active: usize,
    dedup: DedupPolicy,
}

impl ArticleStore {
    pub fn new(dedup: DedupPolicy) -> Self {
        Self {
            items: Vec::new(),
            active: 0,
            dedup,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Article] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Article> {
        self.items.get(index)
    }

    pub fn active_index(&self) -> Option<usize> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.active)
        }
    }

    pub fn active_article(&self) -> Option<&Article> {
        self.active_index().and_then(|i| self.items.get(i))
    }

    /// Move the active index. Out-of-range targets are ignored; returns
    /// whether the index actually moved.
    pub fn set_active(&mut self, index: usize) -> bool {
        if index >= self.items.len() || index == self.active {
            return false;
        }
        self.active = index;
        true
    }

    /// Append a batch at the end, order preserved. Returns how many articles
    /// were actually added after applying the dedup policy.
    pub fn append(&mut self, batch: Vec<Article>) -> usize {
        match self.dedup {
            DedupPolicy::AllowDuplicates => {
                let added = batch.len();
                self.items.extend(batch);
                added
            }
            DedupPolicy::ByUrl => {
                let mut seen: HashSet<String> =
                    self.items.iter().map(|a| a.url.clone()).collect();
                let before = self.items.len();
                for article in batch {
                    if seen.insert(article.url.clone()) {
                        self.items.push(article);
                    }
                }
                self.items.len() - before
            }
        }
    }
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self::new(DedupPolicy::AllowDuplicates)
    }
}
