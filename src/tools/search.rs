// ABOUTME: searchweb tool — runs a web search and returns a plain-text digest of the results.
// ABOUTME: The backend is pluggable; the default scrapes DuckDuckGo's HTML endpoint (no API key).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::tools::{Tool, display_param, required_str};

pub const SEARCH_TOOL_NAME: &str = "searchweb";

const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Something that turns a query into result text.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> anyhow::Result<String>;
}

/// A single parsed search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// DuckDuckGo HTML search.
pub struct DuckDuckGo {
    client: reqwest::Client,
    max_results: usize,
}

impl DuckDuckGo {
    pub fn new(config: &SearchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            max_results: config.max_results,
        })
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGo {
    async fn search(&self, query: &str) -> anyhow::Result<String> {
        tracing::debug!(query, "duckduckgo search");
        let html = self
            .client
            .get(DUCKDUCKGO_HTML_URL)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let hits = parse_results(&html, self.max_results)?;
        Ok(format_results(query, &hits))
    }
}

fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("invalid selector '{}': {:?}", css, e))
}

fn element_text(element: scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extract up to `limit` results from a DuckDuckGo HTML results page.
pub fn parse_results(html: &str, limit: usize) -> anyhow::Result<Vec<SearchHit>> {
    let document = Html::parse_document(html);
    let result_sel = selector(".result")?;
    let title_sel = selector(".result__a")?;
    let snippet_sel = selector(".result__snippet")?;
    let url_sel = selector(".result__url")?;

    let mut hits = Vec::new();
    for result in document.select(&result_sel) {
        if hits.len() >= limit {
            break;
        }
        let title = result
            .select(&title_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();
        if title.is_empty() {
            continue;
        }
        let url = result
            .select(&url_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();
        let snippet = result
            .select(&snippet_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();
        hits.push(SearchHit {
            title,
            url,
            snippet,
        });
    }
    Ok(hits)
}

/// Numbered plain-text digest suitable for reading back to the agent.
pub fn format_results(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No search results found for '{}'.", query);
    }
    let mut out = format!("Search results for '{}':\n\n", query);
    for (i, hit) in hits.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, hit.title));
        if !hit.url.is_empty() {
            out.push_str(&format!("   {}\n", hit.url));
        }
        if !hit.snippet.is_empty() {
            out.push_str(&format!("   {}\n", hit.snippet));
        }
        out.push('\n');
    }
    out
}

/// Web search tool backed by a [`SearchBackend`].
pub struct SearchWebTool {
    backend: Arc<dyn SearchBackend>,
}

impl SearchWebTool {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Tool for SearchWebTool {
    fn name(&self) -> &str {
        SEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Search the web and return the top results as text"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to search for"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let query = required_str(SEARCH_TOOL_NAME, &params, "query")?;
        self.backend
            .search(query)
            .await
            .map_err(|e| Error::tool(SEARCH_TOOL_NAME, e.to_string()))
    }

    fn started_activity(&self, params: &Value) -> String {
        format!("🔍 Searching web for: {}", display_param(params, "query"))
    }

    fn finished_activity(&self) -> String {
        "✅ Search completed".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedBackend(&'static str);

    #[async_trait]
    impl SearchBackend for CannedBackend {
        async fn search(&self, query: &str) -> anyhow::Result<String> {
            Ok(format!("{}: {}", self.0, query))
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl SearchBackend for FailingBackend {
        async fn search(&self, _query: &str) -> anyhow::Result<String> {
            anyhow::bail!("network unreachable")
        }
    }

    const RESULTS_PAGE: &str = r#"
<html><body>
  <div class="result">
    <a class="result__a" href="https://www.rust-lang.org/">Rust Programming Language</a>
    <a class="result__url" href="https://www.rust-lang.org/"> www.rust-lang.org </a>
    <a class="result__snippet">A language empowering everyone.</a>
  </div>
  <div class="result">
    <a class="result__a" href="https://doc.rust-lang.org/book/">The Rust Book</a>
    <a class="result__url">doc.rust-lang.org/book</a>
  </div>
  <div class="result"><span>no title here</span></div>
  <div class="result">
    <a class="result__a">Third</a>
  </div>
</body></html>
"#;

    #[test]
    fn parses_results_and_skips_untitled() {
        let hits = parse_results(RESULTS_PAGE, 10).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title, "Rust Programming Language");
        assert_eq!(hits[0].url, "www.rust-lang.org");
        assert_eq!(hits[0].snippet, "A language empowering everyone.");
        assert_eq!(hits[1].snippet, "");
        assert_eq!(hits[2].title, "Third");
    }

    #[test]
    fn respects_limit() {
        let hits = parse_results(RESULTS_PAGE, 1).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn format_numbers_results() {
        let hits = parse_results(RESULTS_PAGE, 2).unwrap();
        let text = format_results("rust", &hits);
        assert!(text.starts_with("Search results for 'rust':"));
        assert!(text.contains("1. Rust Programming Language"));
        assert!(text.contains("2. The Rust Book"));
    }

    #[test]
    fn format_empty_results() {
        assert_eq!(
            format_results("zzz", &[]),
            "No search results found for 'zzz'."
        );
    }

    #[tokio::test]
    async fn tool_passes_query_to_backend() {
        let tool = SearchWebTool::new(Arc::new(CannedBackend("results")));
        let out = tool
            .execute(serde_json::json!({"query": "weather"}))
            .await
            .unwrap();
        assert_eq!(out, "results: weather");
    }

    #[tokio::test]
    async fn backend_failure_becomes_tool_error() {
        let tool = SearchWebTool::new(Arc::new(FailingBackend));
        let err = tool
            .execute(serde_json::json!({"query": "weather"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ToolExecution { .. }));
        assert!(err.to_string().contains("network unreachable"));
    }

    #[test]
    fn activity_names_the_query() {
        let tool = SearchWebTool::new(Arc::new(CannedBackend("")));
        let params = serde_json::json!({"query": "rust tui"});
        assert_eq!(tool.started_activity(&params), "🔍 Searching web for: rust tui");
        assert_eq!(tool.finished_activity(), "✅ Search completed");
    }
}
