pub mod candidate;
pub mod cli;
pub mod core;
pub mod linkedin;
pub mod llm;
pub mod ocr;
pub mod postings;
pub mod session;
pub mod utils;
pub mod web;

pub use web::{build_rocket, start_web_server};
