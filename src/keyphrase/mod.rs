//! Key-phrase extraction
//!
//! Distills a block of text into a short string of salient entities and
//! phrases, used as compact carried-forward context between summarization
//! calls. Local and pure; no failure mode beyond producing an empty string
//! for unusable input.

/// Extracts a short distilled context string from a summary.
pub trait KeyPhraseExtractor: Send + Sync {
    fn extract(&self, text: &str) -> String;
}

/// Heuristic local extractor: capitalized entity runs first, then the most
/// frequent non-stopword tokens, deduplicated in discovery order and joined
/// by `". "`.
pub struct HeuristicExtractor {
    max_phrases: usize,
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self { max_phrases: 12 }
    }
}

impl HeuristicExtractor {
    pub fn new(max_phrases: usize) -> Self {
        Self { max_phrases }
    }

    /// Runs of consecutive capitalized words, skipping sentence-initial
    /// single words that are stopwords when lowercased ("The", "It", ...).
    fn entity_runs(&self, text: &str) -> Vec<String> {
        let mut runs = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for raw in text.split_whitespace() {
            let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
            let capitalized = word.chars().next().is_some_and(char::is_uppercase);

            if capitalized {
                current.push(word);
            } else {
                Self::flush_run(&mut current, &mut runs);
            }
            // Punctuation after the word ends the run even if the next word
            // is capitalized (it would be sentence-initial).
            if raw.ends_with(['.', '!', '?', ';', ':']) {
                Self::flush_run(&mut current, &mut runs);
            }
        }
        Self::flush_run(&mut current, &mut runs);
        runs
    }

    fn flush_run(current: &mut Vec<&str>, runs: &mut Vec<String>) {
        if current.is_empty() {
            return;
        }
        let run = current.join(" ");
        current.clear();
        // A lone capitalized stopword is almost always sentence case, not a
        // name.
        if run.split_whitespace().count() == 1 && is_stopword(&run.to_lowercase()) {
            return;
        }
        runs.push(run);
    }

    /// Non-stopword tokens ranked by frequency, most frequent first.
    fn frequent_tokens(&self, text: &str) -> Vec<String> {
        let mut counts: Vec<(String, usize)> = Vec::new();

        for raw in text.split_whitespace() {
            let token: String = raw
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            if token.len() < 3 || is_stopword(&token) {
                continue;
            }
            match counts.iter_mut().find(|(t, _)| *t == token) {
                Some((_, n)) => *n += 1,
                None => counts.push((token, 1)),
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.into_iter().map(|(t, _)| t).collect()
    }
}

impl KeyPhraseExtractor for HeuristicExtractor {
    fn extract(&self, text: &str) -> String {
        let mut phrases: Vec<String> = Vec::new();

        for run in self.entity_runs(text) {
            if phrases.len() >= self.max_phrases {
                break;
            }
            if !phrases.iter().any(|p| p.eq_ignore_ascii_case(&run)) {
                phrases.push(run);
            }
        }

        for token in self.frequent_tokens(text) {
            if phrases.len() >= self.max_phrases {
                break;
            }
            let already = phrases
                .iter()
                .any(|p| p.to_lowercase().split_whitespace().any(|w| w == token));
            if !already {
                phrases.push(token);
            }
        }

        phrases.join(". ")
    }
}

/// Common English function words, enough to keep sentence-case words and
/// filler out of the carried context.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "because",
    "been", "before", "being", "but", "by", "can", "could", "did", "do", "does", "for", "from",
    "had", "has", "have", "he", "her", "here", "him", "his", "how", "i", "if", "in", "into", "is",
    "it", "its", "just", "like", "may", "me", "more", "most", "my", "no", "not", "of", "on", "one",
    "only", "or", "other", "our", "out", "over", "said", "she", "should", "so", "some", "such",
    "than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "under", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "why", "will", "with", "would", "you", "your",
];

fn is_stopword(word: &str) -> bool {
    STOPWORDS.binary_search(&word).is_ok()
}
