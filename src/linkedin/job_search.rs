// src/linkedin/job_search.rs
//! Job search exposed to the agent as a single text-in, markdown-out tool

use super::job_scraper::{collect_jobs, JobSource};
use super::retry::RetryPolicy;
use super::types::{JobPosting, JobQuery, QueryOptions};
use crate::utils::truncate_chars;
use std::fmt::Write;
use tracing::info;

pub const TOOL_NAME: &str = "search_jobs";
pub const TOOL_DESCRIPTION: &str = "Search LinkedIn for job postings aligned with the candidate profile. Returns current postings with descriptions, links and company information.";

const DESCRIPTION_SUMMARY_CHARS: usize = 500;

pub const NO_RESULTS_MESSAGE: &str = "\
# No postings found for this profile

The search did not return specific results. This can happen because of:

1. Search terms that are too specific
2. Few openings available right now in this area
3. Temporary LinkedIn limitations

## Suggestions

- Try broader terms for your area
- Check [LinkedIn Jobs](https://www.linkedin.com/jobs/) directly
- Try other platforms such as [Glassdoor](https://www.glassdoor.com.br/) or [Indeed](https://br.indeed.com/)

Run a new search with different terms.
";

pub struct JobSearchTool<S> {
    source: S,
    policy: RetryPolicy,
    options: QueryOptions,
}

impl<S: JobSource> JobSearchTool<S> {
    pub fn new(source: S, options: QueryOptions) -> Self {
        Self {
            source,
            policy: RetryPolicy::broadening(),
            options,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Markdown listing of the postings found for `search_term`, refined with
    /// the words of `context_term`.
    pub async fn search(&self, search_term: &str, context_term: Option<&str>) -> String {
        let postings = self.find_postings(search_term, context_term).await;
        format_to_markdown(&postings)
    }

    pub async fn find_postings(&self, search_term: &str, context_term: Option<&str>) -> Vec<JobPosting> {
        let combined = combine_search_terms(search_term, context_term);
        info!("Searching for jobs: {}", combined);

        let initial = JobQuery {
            query: combined,
            options: self.options.clone(),
        };

        let source = &self.source;
        let outcome = self
            .policy
            .run(initial, search_term.trim(), |query| async move {
                let collector = collect_jobs(source, std::slice::from_ref(&query)).await;
                if collector.jobs.is_empty() && !collector.errors.is_empty() {
                    anyhow::bail!("{}", collector.errors.join("; "));
                }
                Ok::<_, anyhow::Error>(collector.into_jobs())
            })
            .await;

        info!(
            "Job search finished after {} attempt(s) with {} postings",
            outcome.attempts,
            outcome.jobs.len()
        );
        outcome.jobs
    }
}

/// Append context words longer than three characters that the search term
/// does not already contain.
pub fn combine_search_terms(search_term: &str, context_term: Option<&str>) -> String {
    let search_term = search_term.trim();
    let Some(context) = context_term.filter(|c| c.trim() != search_term) else {
        return search_term.to_string();
    };

    let lowered = search_term.to_lowercase();
    let keywords: Vec<&str> = context
        .split_whitespace()
        .filter(|word| word.chars().count() > 3 && !lowered.contains(&word.to_lowercase()))
        .collect();

    if keywords.is_empty() {
        search_term.to_string()
    } else {
        format!("{} {}", search_term, keywords.join(" "))
    }
}

pub fn format_to_markdown(jobs: &[JobPosting]) -> String {
    if jobs.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let mut markdown = String::from("# Jobs Found\n\n");
    for (i, job) in jobs.iter().enumerate() {
        // Writing into a String cannot fail.
        let _ = writeln!(markdown, "## {}. {}", i + 1, job.title);
        let _ = writeln!(markdown, "**Company:** {}", job.company);
        let _ = writeln!(markdown, "**Location:** {}", job.place);
        let _ = writeln!(markdown, "**Posted:** {}", job.date);
        let _ = writeln!(markdown, "**Job Link:** [Apply Here]({})", job.link);
        markdown.push_str("\n**Description Summary:**\n");
        let _ = writeln!(
            markdown,
            "{}\n",
            truncate_chars(&job.description, DESCRIPTION_SUMMARY_CHARS)
        );
        markdown.push_str("\n---\n\n");
    }

    markdown
}

/// JSON schema of the tool's arguments, as advertised to the model.
pub fn tool_parameters() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "search_term": {
                "type": "string",
                "description": "Primary job search term, e.g. a role title"
            },
            "context_term": {
                "type": "string",
                "description": "Additional context from the candidate profile used to refine the search"
            }
        },
        "required": ["search_term"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linkedin::job_scraper::ScrapeListener;
    use std::sync::Mutex;

    struct FakeSource {
        queries: Mutex<Vec<String>>,
        succeed_on: Option<usize>,
    }

    #[rocket::async_trait]
    impl JobSource for FakeSource {
        async fn run(&self, queries: &[JobQuery], listener: &mut (dyn ScrapeListener + Send)) {
            let call = {
                let mut seen = self.queries.lock().unwrap();
                seen.extend(queries.iter().map(|q| q.query.clone()));
                seen.len()
            };
            if Some(call) == self.succeed_on {
                listener.on_data(posting("Engenheiro de Software", &"x".repeat(600)));
            } else {
                listener.on_error(&anyhow::anyhow!("page load timeout"));
            }
            listener.on_end();
        }
    }

    fn posting(title: &str, description: &str) -> JobPosting {
        JobPosting {
            job_id: "42".to_string(),
            title: title.to_string(),
            company: "Acme".to_string(),
            company_link: None,
            place: "Brasília/DF".to_string(),
            date: "2025-05-01".to_string(),
            link: "https://br.linkedin.com/jobs/view/42".to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_combine_search_terms() {
        assert_eq!(
            combine_search_terms("desenvolvedor", Some("desenvolvedor python com django")),
            "desenvolvedor python django"
        );
        assert_eq!(combine_search_terms("analista", Some("analista")), "analista");
        assert_eq!(combine_search_terms(" designer ", None), "designer");
        assert_eq!(combine_search_terms("gerente", Some("de TI")), "gerente");
    }

    #[test]
    fn test_format_to_markdown() {
        let markdown = format_to_markdown(&[posting("Dev Rust", "Construir APIs")]);
        assert!(markdown.starts_with("# Jobs Found\n\n## 1. Dev Rust\n"));
        assert!(markdown.contains("**Company:** Acme\n"));
        assert!(markdown.contains("**Job Link:** [Apply Here](https://br.linkedin.com/jobs/view/42)"));
        assert!(markdown.contains("Construir APIs"));
        assert!(markdown.trim_end().ends_with("---"));
    }

    #[test]
    fn test_format_empty_results() {
        assert_eq!(format_to_markdown(&[]), NO_RESULTS_MESSAGE);
    }

    #[tokio::test]
    async fn test_search_retries_with_broader_terms() {
        let tool = JobSearchTool::new(
            FakeSource {
                queries: Mutex::new(Vec::new()),
                succeed_on: Some(3),
            },
            QueryOptions::default(),
        );

        let markdown = tool
            .search("engenheiro de software backend", Some("software"))
            .await;

        assert_eq!(
            *tool.source.queries.lock().unwrap(),
            vec!["engenheiro de software backend", "engenheiro de", "engenheiro"]
        );
        assert!(markdown.contains("## 1. Engenheiro de Software"));
        assert!(markdown.contains(&format!("{}...", "x".repeat(500))));
    }

    #[tokio::test]
    async fn test_context_words_never_pick_the_category() {
        let tool = JobSearchTool::new(
            FakeSource {
                queries: Mutex::new(Vec::new()),
                succeed_on: None,
            },
            QueryOptions::default(),
        );

        tool.search("cientista de dados", Some("analista python")).await;

        let queries = tool.source.queries.lock().unwrap().clone();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0], "cientista de dados analista python");
        assert_eq!(queries[1], "cientista de");
        assert_eq!(queries[2], "cientista de");
        assert!(!queries.iter().any(|q| q == "analista"));
    }

    #[tokio::test]
    async fn test_search_without_results() {
        let tool = JobSearchTool::new(
            FakeSource {
                queries: Mutex::new(Vec::new()),
                succeed_on: None,
            },
            QueryOptions::default(),
        );

        assert_eq!(tool.search("zelador", None).await, NO_RESULTS_MESSAGE);
        assert_eq!(tool.source.queries.lock().unwrap().len(), 3);
    }
}
