use serde::{Deserialize, Serialize};

/// A single word of a topic binding pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternWord {
    /// `*` - exactly one word
    One,
    /// `#` - zero or more words
    Any,
    Literal(String),
}

/// Topic-exchange binding pattern, e.g. `new.person.*.*` or `audit.#`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPattern {
    words: Vec<PatternWord>,
}

impl RoutingPattern {
    pub fn parse(pattern: &str) -> Self {
        let words = split_words(pattern)
            .into_iter()
            .map(|w| match w {
                "*" => PatternWord::One,
                "#" => PatternWord::Any,
                other => PatternWord::Literal(other.to_string()),
            })
            .collect();

        Self { words }
    }

    pub fn matches(&self, routing_key: &str) -> bool {
        let key_words = split_words(routing_key);
        match_words(&self.words, &key_words)
    }
}

/// True if any of the patterns accepts the key.
pub fn matches_any(patterns: &[RoutingPattern], routing_key: &str) -> bool {
    patterns.iter().any(|p| p.matches(routing_key))
}

// An empty key has zero words, not one empty word.
fn split_words(s: &str) -> Vec<&str> {
    if s.is_empty() {
        Vec::new()
    } else {
        s.split('.').collect()
    }
}

fn match_words(pattern: &[PatternWord], key: &[&str]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some((PatternWord::Any, rest)) => {
            (0..=key.len()).any(|skip| match_words(rest, &key[skip..]))
        }
        Some((PatternWord::One, rest)) => match key.split_first() {
            Some((_, key_rest)) => match_words(rest, key_rest),
            None => false,
        },
        Some((PatternWord::Literal(word), rest)) => match key.split_first() {
            Some((first, key_rest)) => first == word && match_words(rest, key_rest),
            None => false,
        },
    }
}
