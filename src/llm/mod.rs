// src/llm/mod.rs
pub mod agent;
pub mod client;
pub mod report;
pub mod response;
pub mod types;

pub use agent::JobSearchAgent;
pub use client::{ChatModel, LlmClient};
pub use report::ReportGenerator;
pub use response::LlmReply;
pub use types::{ChatMessage, ChatTurn, ToolCall, ToolDefinition};
