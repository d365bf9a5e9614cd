// src/linkedin/job_scraper.rs
use super::types::{JobPosting, JobQuery};
use crate::core::ScraperConfig;
use crate::utils::{clean_text, find_text_by_selectors};
use anyhow::{Context, Result};
use regex::Regex;
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{error, info, warn};

const SEARCH_PATH: &str = "/jobs-guest/jobs/api/seeMoreJobPostings/search";
const POSTING_PATH: &str = "/jobs-guest/jobs/api/jobPosting";

const DESCRIPTION_SELECTORS: [&str; 5] = [
    ".show-more-less-html__markup",
    ".description__text",
    ".jobs-description-content__text",
    ".jobs-box__html-content",
    "[class*='description']",
];

/// Receives scraper events for one run.
pub trait ScrapeListener {
    fn on_data(&mut self, job: JobPosting);
    fn on_error(&mut self, error: &anyhow::Error);
    fn on_end(&mut self);
}

/// Per-run accumulator of scraped postings.
#[derive(Debug, Default)]
pub struct JobCollector {
    pub jobs: Vec<JobPosting>,
    pub errors: Vec<String>,
    pub finished: bool,
}

impl JobCollector {
    pub fn into_jobs(self) -> Vec<JobPosting> {
        self.jobs
    }
}

impl ScrapeListener for JobCollector {
    fn on_data(&mut self, job: JobPosting) {
        info!(
            "[ON DATA] {} | {} | {} | {} | {}...",
            job.title,
            job.company,
            job.date,
            job.link,
            job.description.chars().take(50).collect::<String>()
        );
        self.jobs.push(job);
    }

    fn on_error(&mut self, error: &anyhow::Error) {
        warn!("[ON ERROR] {:#}", error);
        self.errors.push(format!("{:#}", error));
    }

    fn on_end(&mut self) {
        info!("[ON END] {} postings collected", self.jobs.len());
        self.finished = true;
    }
}

/// Anything able to run job queries and report postings to a listener.
#[rocket::async_trait]
pub trait JobSource: Send + Sync {
    async fn run(&self, queries: &[JobQuery], listener: &mut (dyn ScrapeListener + Send));
}

/// Run `queries` against `source` with a fresh collector.
pub async fn collect_jobs<S>(source: &S, queries: &[JobQuery]) -> JobCollector
where
    S: JobSource + ?Sized,
{
    let mut collector = JobCollector::default();
    source.run(queries, &mut collector).await;
    collector
}

/// Scrapes LinkedIn's public (logged-out) job search listing.
pub struct LinkedInJobScraper {
    client: Client,
    base_url: String,
    request_delay: Duration,
    fetch_descriptions: bool,
}

#[rocket::async_trait]
impl JobSource for LinkedInJobScraper {
    async fn run(&self, queries: &[JobQuery], listener: &mut (dyn ScrapeListener + Send)) {
        for query in queries {
            if let Err(e) = self.run_query(query, listener).await {
                error!("Job query '{}' failed: {:#}", query.query, e);
                listener.on_error(&e);
            }
        }
        listener.on_end();
    }
}

impl LinkedInJobScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_delay: Duration::from_millis(config.request_delay_ms),
            fetch_descriptions: config.fetch_descriptions,
        })
    }

    async fn run_query(
        &self,
        query: &JobQuery,
        listener: &mut (dyn ScrapeListener + Send),
    ) -> Result<()> {
        let limit = query.options.limit;
        let mut seen = HashSet::new();

        for location in &query.options.locations {
            let mut start = 0;

            while seen.len() < limit {
                let url = search_url(&self.base_url, query, location, start)?;
                info!("Searching jobs: '{}' in {} (start {})", query.query, location, start);

                let html = self.fetch_html(url).await?;
                let cards = parse_job_cards(&html, query.options.skip_promoted_jobs);
                if cards.is_empty() {
                    break;
                }
                start += cards.len();

                let mut added = 0;
                for mut job in cards {
                    if seen.len() >= limit {
                        break;
                    }
                    if !seen.insert(dedupe_key(&job)) {
                        continue;
                    }
                    added += 1;

                    if self.fetch_descriptions && !job.job_id.is_empty() {
                        tokio::time::sleep(self.request_delay).await;
                        match self.fetch_description(&job.job_id).await {
                            Ok(description) => job.description = description,
                            Err(e) => listener.on_error(&e),
                        }
                    }
                    listener.on_data(job);
                }

                // The listing repeats itself once it runs out of postings.
                if added == 0 {
                    info!("No new postings at start {}, moving on", start);
                    break;
                }

                tokio::time::sleep(self.request_delay).await;
            }

            if seen.len() >= limit {
                break;
            }
        }

        Ok(())
    }

    async fn fetch_description(&self, job_id: &str) -> Result<String> {
        let url = format!("{}{}/{}", self.base_url, POSTING_PATH, job_id);
        let html = self
            .fetch_html(Url::parse(&url).with_context(|| format!("Invalid posting URL: {}", url))?)
            .await?;

        let document = Html::parse_document(&html);
        find_text_by_selectors(&document, &DESCRIPTION_SELECTORS)
            .with_context(|| format!("No description found for job {}", job_id))
    }

    async fn fetch_html(&self, url: Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error {} for {}", response.status(), url);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }
}

/// Guest search URL for one location and result offset.
pub fn search_url(base_url: &str, query: &JobQuery, location: &str, start: usize) -> Result<Url> {
    let mut params: Vec<(&str, String)> = vec![
        ("keywords", query.query.clone()),
        ("location", location.to_string()),
        ("start", start.to_string()),
    ];
    params.extend(query.options.filters.to_params());

    Url::parse_with_params(&format!("{}{}", base_url, SEARCH_PATH), &params)
        .with_context(|| format!("Invalid search URL base: {}", base_url))
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {}: {:?}", css, e))
}

fn job_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d{6,})").unwrap_or_else(|e| panic!("{}", e)))
}

/// Job cards of one search results page. Descriptions are left empty.
pub fn parse_job_cards(html: &str, skip_promoted: bool) -> Vec<JobPosting> {
    let document = Html::parse_fragment(html);
    let card_selector = selector(".base-card");

    document
        .select(&card_selector)
        .filter(|card| !(skip_promoted && is_promoted(card)))
        .filter_map(parse_card)
        .collect()
}

fn parse_card(card: ElementRef<'_>) -> Option<JobPosting> {
    let title = first_text(&card, ".base-search-card__title")?;

    let link = card
        .select(&selector("a.base-card__full-link"))
        .next()
        .and_then(|a| a.value().attr("href"))
        .or_else(|| card.value().attr("href"))
        .map(strip_query)
        .unwrap_or_default();

    let job_id = card
        .value()
        .attr("data-entity-urn")
        .and_then(|urn| urn.rsplit(':').next())
        .map(str::to_string)
        .or_else(|| {
            job_id_pattern()
                .captures_iter(&link)
                .last()
                .map(|c| c[1].to_string())
        })
        .unwrap_or_default();

    let company_link = card
        .select(&selector(".base-search-card__subtitle a"))
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(strip_query);

    let date = card
        .select(&selector("time"))
        .next()
        .map(|t| {
            t.value()
                .attr("datetime")
                .map(str::to_string)
                .unwrap_or_else(|| clean_text(&t.text().collect::<Vec<_>>().join(" ")))
        })
        .unwrap_or_default();

    Some(JobPosting {
        job_id,
        title,
        company: first_text(&card, ".base-search-card__subtitle").unwrap_or_default(),
        company_link,
        place: first_text(&card, ".job-search-card__location").unwrap_or_default(),
        date,
        link,
        description: String::new(),
    })
}

/// Identity of a card across pages: the job id, else its link, else what is
/// shown on the card.
fn dedupe_key(job: &JobPosting) -> String {
    if !job.job_id.is_empty() {
        job.job_id.clone()
    } else if !job.link.is_empty() {
        job.link.clone()
    } else {
        format!("{}|{}|{}", job.title, job.company, job.place)
    }
}

fn first_text(element: &ElementRef<'_>, css: &str) -> Option<String> {
    element
        .select(&selector(css))
        .next()
        .map(|e| clean_text(&e.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| !text.is_empty())
}

fn is_promoted(card: &ElementRef<'_>) -> bool {
    card.text()
        .any(|t| matches!(t.trim(), "Promoted" | "Promovida" | "Promovido"))
}

fn strip_query(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_string()
}
