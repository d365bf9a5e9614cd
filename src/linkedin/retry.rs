// src/linkedin/retry.rs
//! Retry policy for job searches that come back empty

use super::types::{JobPosting, JobQuery};
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

/// Broad job categories tried when the specific search finds nothing.
pub const GENERAL_TERMS: [&str; 5] = [
    "desenvolvedor",
    "analista",
    "engenheiro",
    "designer",
    "gerente",
];

/// Builds the query for `attempt` (1-based retries) from the previous query
/// and the bare term the caller asked for, before any context refinement.
pub type QueryTransform = dyn Fn(&JobQuery, u32, &str) -> JobQuery + Send + Sync;

#[derive(Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    transform: Arc<QueryTransform>,
}

#[derive(Debug)]
pub struct RetryOutcome {
    pub jobs: Vec<JobPosting>,
    pub attempts: u32,
    pub last_query: JobQuery,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::broadening()
    }
}

impl RetryPolicy {
    pub fn new<F>(max_attempts: u32, transform: F) -> Self
    where
        F: Fn(&JobQuery, u32, &str) -> JobQuery + Send + Sync + 'static,
    {
        Self {
            max_attempts: max_attempts.max(1),
            transform: Arc::new(transform),
        }
    }

    pub fn no_retry() -> Self {
        Self::new(1, |query, _, _| query.clone())
    }

    /// Three attempts: as given, then the first two words searched
    /// nationwide, then the first general category found in the base term
    /// with a larger limit.
    pub fn broadening() -> Self {
        Self::new(3, broaden_query)
    }

    pub fn query_for_attempt(&self, previous: &JobQuery, attempt: u32, base_term: &str) -> JobQuery {
        (self.transform)(previous, attempt, base_term)
    }

    /// Run `execute` until it yields postings or attempts run out. Errors
    /// count as failed attempts. `base_term` is what the transform looks at
    /// when choosing a general category.
    pub async fn run<F, Fut>(&self, initial: JobQuery, base_term: &str, mut execute: F) -> RetryOutcome
    where
        F: FnMut(JobQuery) -> Fut,
        Fut: Future<Output = Result<Vec<JobPosting>>>,
    {
        let mut query = initial;
        let mut attempts = 0;

        while attempts < self.max_attempts {
            if attempts > 0 {
                query = self.query_for_attempt(&query, attempts, base_term);
                info!("Retry attempt {}: searching '{}'", attempts, query.query);
            }
            attempts += 1;

            match execute(query.clone()).await {
                Ok(jobs) if !jobs.is_empty() => {
                    info!("Found {} jobs with '{}'", jobs.len(), query.query);
                    return RetryOutcome {
                        jobs,
                        attempts,
                        last_query: query,
                    };
                }
                Ok(_) => info!("No results found with '{}'", query.query),
                Err(e) => warn!("Error during search '{}': {:#}", query.query, e),
            }
        }

        RetryOutcome {
            jobs: Vec::new(),
            attempts,
            last_query: query,
        }
    }
}

fn broaden_query(previous: &JobQuery, attempt: u32, base_term: &str) -> JobQuery {
    let mut query = previous.clone();

    match attempt {
        1 => {
            let words: Vec<&str> = previous.query.split_whitespace().collect();
            if words.len() > 2 {
                query.query = words[..2].join(" ");
                query.options.locations = vec!["Brasil".to_string()];
            }
        }
        2 => {
            let base = base_term.to_lowercase();
            if let Some(term) = GENERAL_TERMS.iter().find(|t| base.contains(*t)) {
                query.query = term.to_string();
                query.options.limit = 15;
            }
        }
        _ => {}
    }

    query
}
