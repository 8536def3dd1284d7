//! Cosmetic keyword tags derived from an article's title and description.

use std::{collections::HashSet, sync::OnceLock};

use regex::Regex;

pub const DEFAULT_KEYWORD_LIMIT: usize = 3;

pub const DEFAULT_STOP_WORDS: [&str; 20] = [
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at",
];

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[0-9A-Za-z_]+").expect("static word pattern"))
}

#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stop_words: HashSet<String>,
    limit: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::with_stop_words(DEFAULT_STOP_WORDS)
    }
}

impl KeywordExtractor {
    pub fn with_stop_words<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|word| word.as_ref().to_lowercase())
                .collect(),
            limit: DEFAULT_KEYWORD_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// ASCII word runs, lowercased, minus stop words, first occurrence only, in
    /// reading order, capped at the configured limit.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut seen = HashSet::new();
        word_pattern()
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|word| !self.stop_words.contains(*word))
            .filter(|word| seen.insert(*word))
            .take(self.limit)
            .map(str::to_string)
            .collect()
    }
}
