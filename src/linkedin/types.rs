// src/linkedin/types.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceFilter {
    Recent,
    Relevant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilter {
    Day,
    Week,
    Month,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobTypeFilter {
    FullTime,
    PartTime,
    Contract,
    Temporary,
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceFilter {
    Internship,
    EntryLevel,
    Associate,
    MidSenior,
    Director,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkplaceFilter {
    OnSite,
    Remote,
    Hybrid,
}

impl RelevanceFilter {
    fn code(self) -> &'static str {
        match self {
            Self::Recent => "DD",
            Self::Relevant => "R",
        }
    }
}

impl TimeFilter {
    fn code(self) -> Option<&'static str> {
        match self {
            Self::Day => Some("r86400"),
            Self::Week => Some("r604800"),
            Self::Month => Some("r2592000"),
            Self::Any => None,
        }
    }
}

impl JobTypeFilter {
    fn code(self) -> &'static str {
        match self {
            Self::FullTime => "F",
            Self::PartTime => "P",
            Self::Contract => "C",
            Self::Temporary => "T",
            Self::Internship => "I",
        }
    }
}

impl ExperienceFilter {
    fn code(self) -> &'static str {
        match self {
            Self::Internship => "1",
            Self::EntryLevel => "2",
            Self::Associate => "3",
            Self::MidSenior => "4",
            Self::Director => "5",
        }
    }
}

impl WorkplaceFilter {
    fn code(self) -> &'static str {
        match self {
            Self::OnSite => "1",
            Self::Remote => "2",
            Self::Hybrid => "3",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFilters {
    pub relevance: Option<RelevanceFilter>,
    pub time: Option<TimeFilter>,
    #[serde(default)]
    pub job_types: Vec<JobTypeFilter>,
    #[serde(default)]
    pub experience: Vec<ExperienceFilter>,
    #[serde(default)]
    pub workplace: Vec<WorkplaceFilter>,
}

impl Default for QueryFilters {
    /// Recent postings from the last month, open to early-career profiles.
    fn default() -> Self {
        Self {
            relevance: Some(RelevanceFilter::Recent),
            time: Some(TimeFilter::Month),
            job_types: vec![
                JobTypeFilter::FullTime,
                JobTypeFilter::Contract,
                JobTypeFilter::Internship,
            ],
            experience: vec![
                ExperienceFilter::Internship,
                ExperienceFilter::EntryLevel,
                ExperienceFilter::Associate,
                ExperienceFilter::MidSenior,
            ],
            workplace: vec![
                WorkplaceFilter::OnSite,
                WorkplaceFilter::Remote,
                WorkplaceFilter::Hybrid,
            ],
        }
    }
}

impl QueryFilters {
    /// Guest search URL parameters for these filters
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(relevance) = self.relevance {
            params.push(("sortBy", relevance.code().to_string()));
        }
        if let Some(code) = self.time.and_then(TimeFilter::code) {
            params.push(("f_TPR", code.to_string()));
        }
        if !self.job_types.is_empty() {
            params.push(("f_JT", join_codes(self.job_types.iter().map(|f| f.code()))));
        }
        if !self.experience.is_empty() {
            params.push(("f_E", join_codes(self.experience.iter().map(|f| f.code()))));
        }
        if !self.workplace.is_empty() {
            params.push(("f_WT", join_codes(self.workplace.iter().map(|f| f.code()))));
        }

        params
    }
}

fn join_codes<'a>(codes: impl Iterator<Item = &'a str>) -> String {
    codes.collect::<Vec<_>>().join(",")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    pub locations: Vec<String>,
    pub limit: usize,
    pub skip_promoted_jobs: bool,
    pub filters: QueryFilters,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            locations: vec!["Brasil".to_string()],
            limit: 10,
            skip_promoted_jobs: false,
            filters: QueryFilters::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobQuery {
    pub query: String,
    pub options: QueryOptions,
}

impl JobQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            options: QueryOptions::default(),
        }
    }

    pub fn with_locations(mut self, locations: Vec<String>) -> Self {
        self.options.locations = locations;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.options.limit = limit;
        self
    }
}

/// One scraped posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub company_link: Option<String>,
    pub place: String,
    pub date: String,
    pub link: String,
    pub description: String,
}
