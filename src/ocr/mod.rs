// src/ocr/mod.rs
pub mod error;
pub mod layout;
pub mod read_client;
pub mod types;

pub use error::OcrError;
pub use layout::{
    group_words_into_lines, reconstruct_document, reconstruct_pages, render_page, BoundingBox,
    Line, Word, DEFAULT_VERTICAL_TOLERANCE,
};
pub use read_client::ReadClient;
pub use types::{OperationStatus, ReadOperationResult, ReadPage};
