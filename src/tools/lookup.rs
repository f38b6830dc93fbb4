//! Lookup tools backed by external services and local data.
//!
//! Web search (SerpAPI), encyclopedia summaries (Wikipedia REST), a local
//! teaching-statistics CSV, and a static education-theory knowledge base.
//! Clients take injectable base URLs so tests can point them at a mock server.

use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, RostraError};
use crate::provider::http::shared_client;

const SEARCH_SNIPPET_MAX_CHARS: usize = 400;
const DEFAULT_SEARCH_BASE: &str = "https://serpapi.com";

/// SerpAPI first-result snippet lookup.
pub struct WebSearchClient {
    api_key: Option<String>,
    base_url: String,
}

impl WebSearchClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_SEARCH_BASE.to_string(),
        }
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the first organic result's snippet for a query.
    pub async fn search(&self, query: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            RostraError::tool("search_web", "SERP_API_KEY is not configured")
        })?;

        debug!(query, "web search");
        let url = format!("{}/search.json", self.base_url);
        let resp = shared_client()
            .get(&url)
            .query(&[("q", query), ("api_key", api_key), ("num", "1"), ("hl", "en")])
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(RostraError::tool(
                "search_web",
                format!("status {status}: {body}"),
            ));
        }

        let data: serde_json::Value = resp.json().await?;
        let snippet = data["organic_results"][0]["snippet"]
            .as_str()
            .unwrap_or_default();
        let collapsed = snippet.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            return Ok("no snippet".to_string());
        }
        Ok(shorten(&collapsed, SEARCH_SNIPPET_MAX_CHARS))
    }
}

/// Wikipedia summary lookup with language fallback.
///
/// Prefers English and falls back to Simple English on failure. A
/// disambiguation page surfaces an option list as text instead of an article
/// summary; the caller never has to resolve it.
pub struct EncyclopediaClient {
    /// Base URL template; `{lang}` is substituted per request.
    base_template: String,
    languages: [&'static str; 2],
}

impl Default for EncyclopediaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl EncyclopediaClient {
    pub fn new() -> Self {
        Self {
            base_template: "https://{lang}.wikipedia.org".to_string(),
            languages: ["en", "simple"],
        }
    }

    /// Point both languages at a fixed endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_template = base_url.into();
        self
    }

    fn base_for(&self, lang: &str) -> String {
        self.base_template.replace("{lang}", lang)
    }

    /// Fetch the first `sentences` sentences of an article summary.
    pub async fn summary(&self, keyword: &str, sentences: usize) -> Result<String> {
        let mut last_err = None;
        for lang in self.languages {
            match self.summary_in(lang, keyword, sentences).await {
                Ok(text) => return Ok(text),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| RostraError::tool("wiki_intro", "no languages configured")))
    }

    async fn summary_in(&self, lang: &str, keyword: &str, sentences: usize) -> Result<String> {
        let title = keyword.trim().replace(' ', "_");
        let url = format!("{}/api/rest_v1/page/summary/{title}", self.base_for(lang));

        debug!(lang, keyword, "encyclopedia lookup");
        let resp = shared_client().get(&url).send().await?;
        let status = resp.status().as_u16();
        if status != 200 {
            return Err(RostraError::tool(
                "wiki_intro",
                format!("{lang}: status {status} for '{keyword}'"),
            ));
        }

        let page: WikiSummary = resp.json().await?;
        if page.page_type.as_deref() == Some("disambiguation") {
            let options = self.options_in(lang, keyword).await.unwrap_or_default();
            return Ok(if options.is_empty() {
                format!("'{keyword}' is ambiguous; no suggestions available")
            } else {
                format!("'{keyword}' is ambiguous; options: {}", options.join(", "))
            });
        }

        let extract = page.extract.unwrap_or_default();
        if extract.is_empty() {
            return Err(RostraError::tool(
                "wiki_intro",
                format!("{lang}: empty summary for '{keyword}'"),
            ));
        }
        Ok(first_sentences(&extract, sentences))
    }

    /// Suggestion titles for an ambiguous keyword (opensearch API).
    async fn options_in(&self, lang: &str, keyword: &str) -> Result<Vec<String>> {
        let url = format!("{}/w/api.php", self.base_for(lang));
        let resp = shared_client()
            .get(&url)
            .query(&[
                ("action", "opensearch"),
                ("search", keyword),
                ("limit", "5"),
                ("format", "json"),
            ])
            .send()
            .await?;
        let data: serde_json::Value = resp.json().await?;
        Ok(data[1]
            .as_array()
            .map(|titles| {
                titles
                    .iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct WikiSummary {
    #[serde(rename = "type")]
    page_type: Option<String>,
    extract: Option<String>,
}

/// Local teaching-statistics table (CSV with `item,performance,cost` columns).
pub struct AnalyticsStore {
    path: String,
}

impl AnalyticsStore {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Pick a random item from the table and format its statistic.
    pub fn lookup(&self) -> Result<String> {
        let rows = self.load()?;
        let items: Vec<&str> = rows.iter().map(|r| r.item.as_str()).collect();
        let picked = *items
            .choose(&mut rand::thread_rng())
            .ok_or_else(|| RostraError::tool("analyze_data", "statistics table is empty"))?;
        self.describe(picked, &rows)
    }

    fn describe(&self, item: &str, rows: &[StatRow]) -> Result<String> {
        let find = |name: &str, column: fn(&StatRow) -> Option<f64>| -> Option<f64> {
            rows.iter().find(|r| r.item == name).and_then(column)
        };
        Ok(match item {
            "standardized_test" => {
                let test = find("standardized_test", |r| r.performance).unwrap_or_default();
                let creativity = find("creativity_decline", |r| r.performance).unwrap_or_default();
                format!(
                    "standardized test scores up {test}% on average; creative-thinking scores down {creativity}%"
                )
            }
            "ai_cost" => {
                let cost = find("ai_cost", |r| r.cost).unwrap_or_default();
                format!("initial AI program investment: {cost}k")
            }
            "creativity_decline" => {
                let creativity = find("creativity_decline", |r| r.performance).unwrap_or_default();
                format!("creative-thinking scores down {creativity}%")
            }
            _ => "no statistics recorded for that item".to_string(),
        })
    }

    fn load(&self) -> Result<Vec<StatRow>> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            RostraError::tool("analyze_data", format!("{}: {e}", self.path))
        })?;
        let mut rows = Vec::new();
        for line in raw.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < 3 {
                return Err(RostraError::tool(
                    "analyze_data",
                    format!("malformed row: {line}"),
                ));
            }
            rows.push(StatRow {
                item: fields[0].trim().to_string(),
                performance: fields[1].trim().parse().ok(),
                cost: fields[2].trim().parse().ok(),
            });
        }
        Ok(rows)
    }
}

#[derive(Debug)]
struct StatRow {
    item: String,
    performance: Option<f64>,
    cost: Option<f64>,
}

/// Static education-theory knowledge base.
pub fn query_knowledge_base(topic: &str) -> Result<String> {
    let entry = match topic {
        "multiple_intelligences" => {
            "Howard Gardner's theory of multiple intelligences (1983) holds that human \
             intelligence is plural: linguistic, logical-mathematical, spatial, bodily-kinesthetic, \
             musical, interpersonal, intrapersonal, and naturalistic. Education should adapt to \
             each learner's strengths; AI can support this through adaptive assessment and \
             personalized learning paths that target a student's strongest domains."
        }
        "situated_learning" => {
            "Situated learning theory holds that knowledge is social and situated: learning \
             happens through practice and interaction inside authentic contexts, not through \
             abstract transfer alone. Learners internalize knowledge by participating in real \
             tasks. AI contributes by supplying realistic task settings and simulated \
             environments where students practice solving applied problems."
        }
        "adult_learning" => {
            "Adult learning theory (Malcolm Knowles) centers the distinct motivations of adult \
             learners: self-direction, the value of prior experience, and relevance to career and \
             personal goals. AI can serve adult learners with flexible pacing, immediate \
             feedback, and personalized paths that adjust to the learner's needs outside a \
             traditional classroom."
        }
        _ => return Ok("no entry recorded for that topic".to_string()),
    };
    Ok(entry.to_string())
}

fn shorten(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn first_sentences(text: &str, sentences: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut taken = 0;
    let mut end = collapsed.len();
    for (idx, _) in collapsed.match_indices(". ") {
        taken += 1;
        if taken >= sentences {
            end = idx + 1;
            break;
        }
    }
    collapsed[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn knowledge_base_returns_known_topics() {
        let entry = query_knowledge_base("situated_learning").unwrap();
        assert!(entry.contains("Situated learning"));
    }

    #[test]
    fn knowledge_base_reports_missing_topics() {
        assert_eq!(
            query_knowledge_base("unknown_topic").unwrap(),
            "no entry recorded for that topic"
        );
    }

    #[test]
    fn analytics_store_reads_and_formats_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "item,performance,cost").unwrap();
        writeln!(file, "standardized_test,15,").unwrap();
        writeln!(file, "creativity_decline,8,").unwrap();
        writeln!(file, "ai_cost,,500").unwrap();
        let store = AnalyticsStore::new(file.path().to_str().unwrap());

        let rows = store.load().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            store.describe("standardized_test", &rows).unwrap(),
            "standardized test scores up 15% on average; creative-thinking scores down 8%"
        );
        assert_eq!(
            store.describe("ai_cost", &rows).unwrap(),
            "initial AI program investment: 500k"
        );
    }

    #[test]
    fn analytics_store_errors_on_missing_file() {
        let store = AnalyticsStore::new("/nonexistent/statistics.csv");
        assert!(store.lookup().is_err());
    }

    #[test]
    fn analytics_store_rejects_malformed_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "item,performance,cost").unwrap();
        writeln!(file, "only_one_field").unwrap();
        let store = AnalyticsStore::new(file.path().to_str().unwrap());
        assert!(store.load().is_err());
    }

    #[test]
    fn shorten_appends_ellipsis() {
        assert_eq!(shorten("abcdef", 4), "abc…");
        assert_eq!(shorten("abc", 4), "abc");
    }

    #[test]
    fn first_sentences_takes_a_prefix() {
        let text = "One. Two. Three.";
        assert_eq!(first_sentences(text, 2), "One. Two.");
        assert_eq!(first_sentences(text, 9), "One. Two. Three.");
    }
}
