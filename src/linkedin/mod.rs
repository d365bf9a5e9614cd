// src/linkedin/mod.rs
pub mod job_scraper;
pub mod job_search;
pub mod profile_scraper;
pub mod retry;
pub mod types;

pub use job_scraper::{collect_jobs, JobCollector, JobSource, LinkedInJobScraper, ScrapeListener};
pub use job_search::JobSearchTool;
pub use profile_scraper::ProfileScraper;
pub use retry::{RetryOutcome, RetryPolicy};
pub use types::{JobPosting, JobQuery, QueryFilters, QueryOptions};
