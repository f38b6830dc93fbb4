//! Tool back-ends for the rule-based reasoning path.
//!
//! Each tool is a plain function of typed inputs to a `Result<String>`. The
//! orchestration layer decides whether a failure is rendered into transcript
//! text or propagated, per [`crate::config::FailurePolicy`].

pub mod lookup;
pub mod math;
pub mod text;

pub use lookup::{query_knowledge_base, AnalyticsStore, EncyclopediaClient, WebSearchClient};
pub use math::{calculator, quick_stats};
pub use text::{current_time, keyword_extract, sentiment};
