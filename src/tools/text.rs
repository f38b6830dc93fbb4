//! Text-analysis tools: sentiment, keyword extraction, current time.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{SecondsFormat, Utc};
use regex::Regex;

use crate::error::Result;

/// Positive marker words for the sentiment classifier.
const POSITIVE_MARKERS: &[&str] = &["good", "great", "support", "excellent", "positive"];

/// Negative marker words for the sentiment classifier.
const NEGATIVE_MARKERS: &[&str] = &["bad", "risk", "concern", "negative", "terrible"];

/// Stop words dropped during keyword extraction.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "to", "in", "is", "are", "it", "that", "for", "on",
    "as", "with", "this", "be", "by",
];

fn word_pattern() -> &'static Regex {
    static WORDS: OnceLock<Regex> = OnceLock::new();
    WORDS.get_or_init(|| Regex::new(r"[A-Za-z]+").expect("static regex"))
}

/// Classify a text's sentiment by counting marker-word occurrences.
///
/// Positive when positive markers outnumber negative ones, negative when the
/// reverse holds, neutral on a tie.
pub fn sentiment(text: &str) -> Result<String> {
    let lower = text.to_lowercase();
    let count = |markers: &[&str]| -> i64 {
        markers.iter().filter(|m| lower.contains(**m)).count() as i64
    };
    let score = count(POSITIVE_MARKERS) - count(NEGATIVE_MARKERS);
    let label = match score {
        s if s > 0 => "positive",
        s if s < 0 => "negative",
        _ => "neutral",
    };
    Ok(format!("sentiment: {label}"))
}

/// Extract the `top_k` most frequent non-stop-word tokens.
///
/// Ties break toward the token seen earlier, keeping output deterministic.
pub fn keyword_extract(text: &str, top_k: usize) -> Result<String> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for (idx, m) in word_pattern().find_iter(text).enumerate() {
        let word = m.as_str().to_lowercase();
        if STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        *freq.entry(word.clone()).or_insert(0) += 1;
        first_seen.entry(word).or_insert(idx);
    }

    let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(first_seen[&a.0].cmp(&first_seen[&b.0])));
    ranked.truncate(top_k);

    let keywords = ranked
        .into_iter()
        .map(|(w, _)| w)
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("keywords: {keywords}"))
}

/// Current instant as an ISO-8601 string, seconds precision.
pub fn current_time() -> Result<String> {
    Ok(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
}
