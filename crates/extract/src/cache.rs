use dashmap::DashMap;
use sha2::{Digest, Sha256};

/// Bounded in-memory cache of raw model replies, keyed by prompt hash.
/// Re-analyzing the same text skips the model call entirely.
pub struct ResponseCache {
    replies: DashMap<String, String>,
    max_entries: usize,
}

impl ResponseCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            replies: DashMap::new(),
            max_entries,
        }
    }

    pub fn get(&self, prompt: &str) -> Option<String> {
        let key = hash_prompt(prompt);
        self.replies.get(&key).map(|r| r.value().clone())
    }

    pub fn set(&self, prompt: &str, reply: String) {
        if self.replies.len() >= self.max_entries {
            // Simple eviction: clear 25% when full
            let to_remove: Vec<_> = self
                .replies
                .iter()
                .take(self.max_entries / 4)
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.replies.remove(&key);
            }
        }
        self.replies.insert(hash_prompt(prompt), reply);
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }

    pub fn clear(&self) {
        self.replies.clear();
    }
}

fn hash_prompt(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    hex::encode(hasher.finalize())
}
