// src/postings.rs
//! Splits the agent's markdown answer into individual postings

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::warn;

/// Answers with fewer non-blank characters than this are considered sparse.
pub const MIN_ANSWER_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Posting {
    /// 1-based position in the answer.
    pub number: usize,
    pub title: String,
    pub body: String,
}

fn blank_lines() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n{2,}").expect("valid regex"))
}

fn non_blank(chunks: impl Iterator<Item = String>) -> Vec<String> {
    chunks.filter(|c| !c.trim().is_empty()).collect()
}

/// Chunks of `answer`, one per posting.
pub fn split_postings(answer: &str) -> Vec<String> {
    let trimmed = answer.trim();

    let chunks = non_blank(trimmed.split("---").map(str::to_string));
    if !chunks.is_empty() {
        return chunks;
    }

    let chunks = non_blank(trimmed.split("## ").map(str::to_string));
    if !chunks.is_empty() {
        return chunks
            .into_iter()
            .enumerate()
            .map(|(i, c)| if i == 0 { c } else { format!("## {}", c) })
            .collect();
    }

    non_blank(blank_lines().split(answer).map(str::to_string))
}

/// `Job {number}: {title}` from the first heading or bold line among the
/// first three lines, `Job {number}` otherwise.
pub fn posting_title(chunk: &str, number: usize) -> String {
    chunk
        .split('\n')
        .take(3)
        .find(|line| line.trim().starts_with('#') || line.contains("**"))
        .map(|line| {
            let title = line.trim().trim_matches('#').trim().replace('*', "");
            format!("Job {}: {}", number, title)
        })
        .unwrap_or_else(|| format!("Job {}", number))
}

pub fn is_sparse_response(answer: &str) -> bool {
    answer.trim().chars().count() < MIN_ANSWER_CHARS
}

pub fn parse_postings(answer: &str) -> Vec<Posting> {
    if is_sparse_response(answer) {
        warn!("Agent answer is too short to hold postings: {:?}", answer.trim());
    }

    split_postings(answer)
        .into_iter()
        .enumerate()
        .map(|(i, body)| Posting {
            number: i + 1,
            title: posting_title(&body, i + 1),
            body: body.trim().to_string(),
        })
        .collect()
}
