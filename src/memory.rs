//! Per-persona conversation memory.
//!
//! Each persona owns one [`MemoryStore`]: a short-term FIFO buffer of the last
//! five messages, an append-only long-term buffer of messages classified as
//! important, and two semantic fragment lists (arguments, evidence). The
//! long-term and semantic lists grow unbounded across a run; only a prefix is
//! ever read because [`MemoryStore::summarize`] applies a character budget at
//! read time.

use crate::types::TurnMessage;

/// Short-term buffer capacity (FIFO eviction beyond this).
pub const SHORT_TERM_CAPACITY: usize = 5;

/// Long-term entries considered by the summarizer (most recent first).
const LONG_TERM_SCAN: usize = 25;

/// Character cap applied to semantic fragments at write time.
const FRAGMENT_MAX_CHARS: usize = 100;

/// Default summary budget in characters.
pub const DEFAULT_SUMMARY_BUDGET: usize = 600;

/// Markers that flag a message as important (goes to long-term memory).
const IMPORTANCE_MARKERS: &[&str] = &["data", "core", "essence", "%"];

/// Markers that flag a causal or evidentiary claim (goes to `arguments`).
const ARGUMENT_MARKERS: &[&str] = &["because", "research shows", "studies show"];

/// Markers that flag quantitative support (goes to `evidence`).
const EVIDENCE_MARKERS: &[&str] = &["%", "data"];

/// A long-term memory entry with its importance flag.
#[derive(Debug, Clone)]
struct MemoryEntry {
    message: TurnMessage,
    important: bool,
}

/// Rolling memory for a single persona. Not shared; single-threaded use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    short_term: Vec<TurnMessage>,
    long_term: Vec<MemoryEntry>,
    arguments: Vec<String>,
    evidence: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message. The only mutator.
    ///
    /// Classification into important / argument / evidence is independent and
    /// not mutually exclusive; one message may land in all three.
    pub fn add(&mut self, msg: &TurnMessage) {
        self.short_term.push(msg.clone());
        if self.short_term.len() > SHORT_TERM_CAPACITY {
            self.short_term.remove(0);
        }

        if contains_any(&msg.content, IMPORTANCE_MARKERS) {
            self.long_term.push(MemoryEntry {
                message: msg.clone(),
                important: true,
            });
        }
        if contains_any(&msg.content, ARGUMENT_MARKERS) {
            self.arguments.push(truncate_chars(&msg.content, FRAGMENT_MAX_CHARS));
        }
        if contains_any(&msg.content, EVIDENCE_MARKERS) {
            self.evidence.push(truncate_chars(&msg.content, FRAGMENT_MAX_CHARS));
        }
    }

    /// Build a bounded summary for prompt injection.
    ///
    /// Candidates are the important entries among the last 25 long-term
    /// messages (most recent first), followed by the last 5 short-term
    /// messages in chronological order. Lines are appended greedily; a line
    /// that would push the total past `max_chars` is skipped and iteration
    /// stops, so no line is ever truncated mid-way. Side-effect-free.
    pub fn summarize(&self, max_chars: usize) -> String {
        let scan_start = self.long_term.len().saturating_sub(LONG_TERM_SCAN);
        let long_lines = self.long_term[scan_start..]
            .iter()
            .rev()
            .filter(|e| e.important)
            .map(|e| e.message.as_line());
        let recent_start = self.short_term.len().saturating_sub(SHORT_TERM_CAPACITY);
        let short_lines = self.short_term[recent_start..].iter().map(|m| m.as_line());

        let mut summary = String::new();
        for line in long_lines.chain(short_lines) {
            if summary.chars().count() + line.chars().count() + 1 > max_chars {
                break;
            }
            summary.push_str(&line);
            summary.push('\n');
        }

        let trimmed = summary.trim_end().to_string();
        if trimmed.is_empty() {
            "(no notable memory)".to_string()
        } else {
            trimmed
        }
    }

    /// Render recent conversation plus the freshest semantic fragments.
    pub fn context(&self) -> String {
        let recent = self
            .short_term
            .iter()
            .map(|m| m.as_line())
            .collect::<Vec<_>>()
            .join("\n");
        let args = last_fragments(&self.arguments, 3);
        let evid = last_fragments(&self.evidence, 3);
        format!(
            "Recent conversation:\n{}\n\nArguments:\n{}\nEvidence:\n{}",
            if recent.is_empty() { "(empty)" } else { &recent },
            args,
            evid,
        )
    }

    /// Short-term messages, oldest first.
    pub fn short_term(&self) -> &[TurnMessage] {
        &self.short_term
    }

    /// Number of long-term (important) entries.
    pub fn long_term_len(&self) -> usize {
        self.long_term.len()
    }

    /// Collected argument fragments.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Collected evidence fragments.
    pub fn evidence(&self) -> &[String] {
        &self.evidence
    }
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    let lower = text.to_lowercase();
    markers.iter().any(|m| lower.contains(m))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn last_fragments(list: &[String], n: usize) -> String {
    let start = list.len().saturating_sub(n);
    let rendered = list[start..]
        .iter()
        .map(|f| format!("- {f}"))
        .collect::<Vec<_>>()
        .join("\n");
    if rendered.is_empty() {
        "(none)".to_string()
    } else {
        rendered
    }
}
