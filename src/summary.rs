//! Extractive summaries of merged search results.
//!
//! The summary is assembled from the snippets of the top-ranked results:
//! a frequency table over the snippet vocabulary (boosted for terms that
//! match the query) scores every candidate sentence, and the best three
//! sentences are stitched together. When no sentence qualifies, the
//! summary falls back to the leading result titles.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::SearchResult;

/// Sentences this short or shorter are never selected.
const MIN_SENTENCE_CHARS: usize = 20;
/// Tokens this short or shorter are left out of the frequency table.
const MAX_SKIPPED_TOKEN_CHARS: usize = 2;
const MAX_SENTENCES: usize = 3;
const QUERY_TERM_BOOST: u64 = 3;
const QUERY_TERM_BONUS: f64 = 5.0;
const FALLBACK_TITLES: usize = 2;

/// Default number of top results used as evidence.
pub const DEFAULT_MAX_RESULTS: usize = 5;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static regex is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex is valid"));
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("static regex is valid"));

/// Function words ignored when weighting terms.
pub static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "an", "the", "and", "or", "but", "if", "because", "as", "what", "which", "this",
        "that", "these", "those", "then", "just", "so", "than", "such", "can", "now", "for", "is",
        "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
        "to", "at", "in", "on", "by", "about", "against", "between", "into", "through", "during",
        "before", "after", "above", "below", "from", "up", "down", "of", "off", "over", "under",
        "again", "further", "once", "here", "there", "when", "where", "why", "how", "all", "any",
        "both", "each", "few", "more", "most", "other", "some", "no", "nor", "not", "only", "own",
        "same", "too", "very", "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you",
        "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she", "her",
        "hers", "herself", "it", "its", "itself", "they", "them", "their", "theirs", "themselves",
        "whom", "who", "whose", "with",
    ]
    .into_iter()
    .collect()
});

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Lower-cases `text`, turns every character other than letters, digits,
/// underscore and whitespace into a space, then collapses whitespace runs.
///
/// Applying it twice yields the same text as applying it once.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Significant query words: lower-cased, stop words removed, duplicates dropped.
pub fn query_terms(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| !is_stop_word(word))
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

/// Splits after `.`, `!` or `?` when followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_END.find_iter(text) {
        sentences.push(&text[start..boundary.start() + 1]);
        start = boundary.end();
    }
    sentences.push(&text[start..]);
    sentences
}

/// Upper-cases the first character and leaves the rest untouched.
fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Term frequencies over the evidence text, boosted for query matches.
#[derive(Debug, Clone, Default)]
pub struct WeightedTerms {
    weights: HashMap<String, u64>,
}

impl WeightedTerms {
    /// Builds the table from already-cleaned text.
    ///
    /// Stop words and tokens of two characters or fewer are skipped. A token
    /// equal to, or containing, any query term has its count tripled once.
    pub fn build(cleaned: &str, query_terms: &[String]) -> Self {
        let mut weights: HashMap<String, u64> = HashMap::new();
        for token in cleaned.split_whitespace() {
            if is_stop_word(token) || token.chars().count() <= MAX_SKIPPED_TOKEN_CHARS {
                continue;
            }
            *weights.entry(token.to_string()).or_insert(0) += 1;
        }

        for (token, weight) in weights.iter_mut() {
            if query_terms.iter().any(|term| token.contains(term.as_str())) {
                *weight *= QUERY_TERM_BOOST;
            }
        }

        Self { weights }
    }

    /// Weight of `token`, zero when absent.
    pub fn weight(&self, token: &str) -> u64 {
        self.weights.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Scores one raw sentence against the term table and query terms.
pub fn score_sentence(sentence: &str, terms: &WeightedTerms, query_terms: &[String]) -> f64 {
    let cleaned = clean_text(sentence);
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    let mut score: f64 = tokens.iter().map(|token| terms.weight(token) as f64).sum();
    for term in query_terms {
        if cleaned.contains(term.as_str()) {
            score += QUERY_TERM_BONUS;
        }
    }

    if tokens.is_empty() {
        score
    } else {
        score / (tokens.len() as f64).sqrt()
    }
}

/// Extractive summarizer over ranked results.
#[derive(Debug, Clone)]
pub struct Summarizer {
    max_results: usize,
}

impl Summarizer {
    /// Creates a summarizer using the top `max_results` results as evidence.
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    /// Returns the evidence set size.
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Summarizes `results` for `query`, or `None` when nothing usable exists.
    pub fn summarize(&self, query: &str, results: &[SearchResult]) -> Option<String> {
        let evidence = &results[..results.len().min(self.max_results)];
        if evidence.is_empty() {
            return None;
        }

        let snippets: Vec<&str> = evidence
            .iter()
            .map(|result| result.snippet.as_str())
            .filter(|snippet| !snippet.is_empty())
            .collect();

        let terms_in_query = query_terms(query);
        let blob = clean_text(&snippets.join(" "));
        let terms = WeightedTerms::build(&blob, &terms_in_query);

        let mut scored: Vec<(&str, f64)> = snippets
            .iter()
            .flat_map(|snippet| split_sentences(*snippet))
            .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
            .map(|sentence| (sentence, score_sentence(sentence, &terms, &terms_in_query)))
            .collect();

        // stable, so equal scores keep snippet order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(MAX_SENTENCES);

        if !scored.is_empty() {
            debug!("Summarizing '{}' from {} sentences", query, scored.len());
            let body = scored
                .iter()
                .map(|(sentence, _)| *sentence)
                .collect::<Vec<_>>()
                .join(" ");
            let summary = if query.ends_with('?') {
                body
            } else {
                format!("About '{}': {}", capitalize_first(query), body)
            };
            return Some(WHITESPACE.replace_all(&summary, " ").trim().to_string());
        }

        let titles: Vec<&str> = evidence
            .iter()
            .map(|result| result.title.as_str())
            .filter(|title| !title.is_empty())
            .take(FALLBACK_TITLES)
            .collect();
        if titles.is_empty() {
            debug!("No summary material for '{}'", query);
            return None;
        }

        debug!("No sentence qualified for '{}', falling back to titles", query);
        Some(format!("Related to '{}': {}", query, titles.join(". ")))
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESULTS)
    }
}

/// Summarizes the top `max_results` of `results` for `query`.
pub fn summarize(query: &str, results: &[SearchResult], max_results: usize) -> Option<String> {
    Summarizer::new(max_results).summarize(query, results)
}
