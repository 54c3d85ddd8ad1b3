//! Keep-alive message text.

use rand::seq::SliceRandom;

/// Built-in phrases, used when the config does not override them.
pub const DEFAULT_PHRASES: &[&str] = &[
    "Hey there!",
    "What's new?",
    "How's it going?",
    "Tell me something interesting",
    "What do you think about AI?",
    "Have you heard the latest news?",
    "What's your favorite topic?",
    "Let's discuss something fun",
];

/// Non-empty set of phrases a tick picks from.
#[derive(Debug, Clone)]
pub struct PhraseBook {
    phrases: Vec<String>,
}

impl PhraseBook {
    /// Build from configured phrases, dropping blank entries. Falls back to
    /// [`DEFAULT_PHRASES`] when nothing usable is left.
    pub fn new(phrases: &[String]) -> Self {
        let phrases: Vec<String> = phrases
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect();
        if phrases.is_empty() {
            return Self::default();
        }
        Self { phrases }
    }

    /// Select a phrase uniformly at random.
    pub fn pick(&self) -> &str {
        let mut rng = rand::thread_rng();
        self.phrases
            .choose(&mut rng)
            .map(String::as_str)
            // The book is never empty; the fallback only satisfies the type.
            .unwrap_or(DEFAULT_PHRASES[0])
    }

    /// All phrases in the book.
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}

impl Default for PhraseBook {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_PHRASES.iter().map(|p| (*p).to_owned()).collect(),
        }
    }
}
