//! Rule-based think → fetch → respond turn path.
//!
//! Stage one asks the generator what information the persona needs (the
//! "thought"). The thought is routed through an ordered rule table to exactly
//! one tool branch, and the retrieved text grounds a second generation call
//! that produces the persona's actual reply.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::{DebateConfig, FailurePolicy};
use crate::error::Result;
use crate::provider::TextGenerator;
use crate::tools::{
    calculator, current_time, keyword_extract, query_knowledge_base, quick_stats, sentiment,
    AnalyticsStore, EncyclopediaClient, WebSearchClient,
};

/// Fixed demonstration expression for the arithmetic branch.
const CALC_EXAMPLE: &str = "((120-80)/80)*100";

/// Fixed illustrative sample for the statistics branch.
const STATS_SAMPLE: [f64; 5] = [1.2, 3.4, 2.9, 4.1, 3.3];

/// Fallback term when the thought has no usable encyclopedia keyword.
const DEFAULT_WIKI_TERM: &str = "artificial intelligence";

/// Default topic for the knowledge-base fallback branch.
const DEFAULT_KB_TOPIC: &str = "situated_learning";

const WIKI_SUMMARY_SENTENCES: usize = 2;
const KEYWORD_TOP_K: usize = 5;
const WEB_SEARCH_QUERY: &str = "ai concerns";

/// The single tool branch selected for a thought.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolChoice {
    Calculator,
    QuickStats,
    Sentiment,
    Keywords,
    CurrentTime,
    Encyclopedia { term: String },
    DataLookup,
    KnowledgeBase,
}

/// Ordered marker table; the first rule whose marker set matches wins.
///
/// The order is the contract: a thought containing both a percentage marker
/// and a sentiment marker routes to the arithmetic branch.
const ROUTE_RULES: &[(&[&str], fn(&str) -> ToolChoice)] = &[
    (&["calculate", "compute", "growth", "%"], |_| {
        ToolChoice::Calculator
    }),
    (
        &["mean", "average", "standard deviation", "fluctuation"],
        |_| ToolChoice::QuickStats,
    ),
    (&["sentiment", "attitude", "stance"], |_| {
        ToolChoice::Sentiment
    }),
    (&["keyword", "extract"], |_| ToolChoice::Keywords),
    (&["time", "today", "currently"], |_| ToolChoice::CurrentTime),
    (&["encyclopedia", "wiki"], |thought| {
        ToolChoice::Encyclopedia {
            term: wiki_term(thought),
        }
    }),
    (&["data", "statistics"], |_| ToolChoice::DataLookup),
];

/// Route a thought to exactly one tool branch, first match wins.
pub fn route(thought: &str) -> ToolChoice {
    let lower = thought.to_lowercase();
    for (markers, build) in ROUTE_RULES {
        if markers.iter().any(|m| lower.contains(m)) {
            return build(thought);
        }
    }
    ToolChoice::KnowledgeBase
}

/// Last word-like token of length >= 2, or the fixed fallback term.
fn wiki_term(thought: &str) -> String {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    let pattern = TOKEN.get_or_init(|| Regex::new(r"[A-Za-z]{2,}").expect("static regex"));
    pattern
        .find_iter(thought)
        .last()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_WIKI_TERM.to_string())
}

/// Executes routed tool branches. Owns the lookup clients.
pub struct ToolRunner {
    search: WebSearchClient,
    wiki: EncyclopediaClient,
    analytics: AnalyticsStore,
}

impl ToolRunner {
    pub fn new(config: &DebateConfig) -> Self {
        Self {
            search: WebSearchClient::new(config.serp_api_key.clone()),
            wiki: EncyclopediaClient::new(),
            analytics: AnalyticsStore::new(config.stats_path.clone()),
        }
    }

    /// Swap in custom clients (tests).
    pub fn with_clients(
        search: WebSearchClient,
        wiki: EncyclopediaClient,
        analytics: AnalyticsStore,
    ) -> Self {
        Self {
            search,
            wiki,
            analytics,
        }
    }

    /// Execute one branch. Every branch yields at least one result; the
    /// data-lookup branch yields two (web snippet + local analytics).
    pub async fn run(&self, choice: &ToolChoice, context: &str) -> Vec<Result<String>> {
        debug!(?choice, "executing tool branch");
        match choice {
            ToolChoice::Calculator => vec![calculator(CALC_EXAMPLE)],
            ToolChoice::QuickStats => vec![quick_stats(&STATS_SAMPLE)],
            ToolChoice::Sentiment => vec![sentiment(context)],
            ToolChoice::Keywords => vec![keyword_extract(context, KEYWORD_TOP_K)],
            ToolChoice::CurrentTime => vec![current_time()],
            ToolChoice::Encyclopedia { term } => {
                vec![self.wiki.summary(term, WIKI_SUMMARY_SENTENCES).await]
            }
            ToolChoice::DataLookup => vec![
                self.search.search(WEB_SEARCH_QUERY).await,
                self.analytics.lookup(),
            ],
            ToolChoice::KnowledgeBase => vec![query_knowledge_base(DEFAULT_KB_TOPIC)],
        }
    }
}

/// Produce a full ReAct turn for a persona.
///
/// Failures inside the thought, tool, or response stage are rendered into the
/// output text under `FailurePolicy::Degrade`, or returned as errors under
/// `FailurePolicy::Propagate`.
pub async fn react_reply(
    persona_name: &str,
    side: &str,
    context: &str,
    generator: &dyn TextGenerator,
    tools: &ToolRunner,
    policy: FailurePolicy,
) -> Result<String> {
    let think_prompt = format!(
        "You are {persona_name}. Here is the latest debate context:\n{context}\n\n\
         State in one sentence what information you need to support your next \
         argument. Mention data if you need numbers, or encyclopedia if you \
         need background."
    );
    let thought = match generator.complete(&think_prompt).await {
        Ok(text) => text,
        Err(e) => render_failure(e, policy, "generation")?,
    };

    let choice = route(&thought);
    let mut search_results = Vec::new();
    for outcome in tools.run(&choice, context).await {
        match outcome {
            Ok(text) => search_results.push(text),
            Err(e) => search_results.push(render_failure(e, policy, "tool")?),
        }
    }
    let retrieved = search_results.join("\n");

    let reason_prompt = format!(
        "[Retrieved information]\n{retrieved}\n\n\
         Based on the information above, write a 150-200 character analytical \
         response. You argue for the {side} side: support or rebut the current \
         position accordingly."
    );
    let reply = match generator.complete(&reason_prompt).await {
        Ok(text) => text,
        Err(e) => render_failure(e, policy, "generation")?,
    };

    Ok(format!(
        "[Thought] {thought}\n\n[Retrieved]\n{retrieved}\n\n[Response]\n{reply}"
    ))
}

/// Degrade an error to text, or propagate it, per policy.
fn render_failure(
    error: crate::error::RostraError,
    policy: FailurePolicy,
    stage: &str,
) -> Result<String> {
    match policy {
        FailurePolicy::Degrade => {
            warn!(%error, stage, "degrading failure to transcript text");
            Ok(format!("[{stage} error] {error}"))
        }
        FailurePolicy::Propagate => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn routes_calculation_markers_first() {
        assert_eq!(route("I need to compute the growth rate"), ToolChoice::Calculator);
        assert_eq!(route("a 15% increase"), ToolChoice::Calculator);
    }

    #[test]
    fn first_match_wins_over_later_rules() {
        // Contains both a percentage marker (rule 1) and a sentiment marker
        // (rule 3); the arithmetic branch must win.
        assert_eq!(
            route("what % of people share this sentiment"),
            ToolChoice::Calculator
        );
        // Statistics marker beats the generic data marker further down.
        assert_eq!(route("average of the data"), ToolChoice::QuickStats);
    }

    #[test]
    fn routes_statistics_markers() {
        assert_eq!(route("the standard deviation matters"), ToolChoice::QuickStats);
        assert_eq!(route("what is the mean score"), ToolChoice::QuickStats);
    }

    #[test]
    fn routes_sentiment_and_keywords() {
        assert_eq!(route("gauge the audience attitude"), ToolChoice::Sentiment);
        assert_eq!(route("extract the main points"), ToolChoice::Keywords);
    }

    #[test]
    fn routes_time_markers() {
        assert_eq!(route("what time is it"), ToolChoice::CurrentTime);
    }

    #[test]
    fn routes_encyclopedia_with_last_long_token() {
        assert_eq!(
            route("check the encyclopedia entry for constructivism"),
            ToolChoice::Encyclopedia {
                term: "constructivism".to_string()
            }
        );
    }

    #[test]
    fn routes_generic_data_to_data_lookup() {
        assert_eq!(route("I need supporting statistics"), ToolChoice::DataLookup);
    }

    #[test]
    fn falls_back_to_knowledge_base() {
        assert_eq!(route("nothing matches here"), ToolChoice::KnowledgeBase);
    }

    #[test]
    fn wiki_term_falls_back_when_no_token() {
        assert_eq!(wiki_term("42 1 0"), DEFAULT_WIKI_TERM);
    }

    #[tokio::test]
    async fn calculator_branch_returns_fixed_example() {
        let runner = ToolRunner::new(&crate::config::DebateConfig::default());
        let results = runner.run(&ToolChoice::Calculator, "").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().unwrap(), "result: 50");
    }

    #[tokio::test]
    async fn stats_branch_uses_fixed_sample() {
        let runner = ToolRunner::new(&crate::config::DebateConfig::default());
        let results = runner.run(&ToolChoice::QuickStats, "").await;
        assert!(results[0].as_ref().unwrap().starts_with("mean=2.980"));
    }
}
