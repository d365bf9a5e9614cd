// src/llm/agent.rs
//! Function-calling loop that lets the model search for postings.

use super::client::ChatModel;
use super::response::LlmReply;
use super::types::{ChatMessage, ToolCall, ToolDefinition};
use crate::linkedin::job_search::{tool_parameters, TOOL_DESCRIPTION, TOOL_NAME};
use crate::linkedin::{JobSearchTool, JobSource};
use tracing::{info, warn};

pub const MAX_ITERATIONS: usize = 6;

pub const SYSTEM_PROMPT: &str = "Você é um assistente de busca de vagas de emprego. \
Encontre vagas de emprego adequadas ao perfil do candidato usando a ferramenta search_jobs. \
Apresente cada vaga com um título em markdown (## ) e separe as vagas com uma linha contendo apenas ---.";

pub struct JobSearchAgent<M, S> {
    model: M,
    tool: JobSearchTool<S>,
    max_iterations: usize,
}

impl<M: ChatModel, S: JobSource> JobSearchAgent<M, S> {
    pub fn new(model: M, tool: JobSearchTool<S>) -> Self {
        Self {
            model,
            tool,
            max_iterations: MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub async fn run(&self, request: &str) -> LlmReply {
        let tools = [ToolDefinition::function(
            TOOL_NAME,
            TOOL_DESCRIPTION,
            tool_parameters(),
        )];
        let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(request)];

        for iteration in 1..=self.max_iterations {
            let turn = match self.model.chat(&messages, &tools).await {
                Ok(turn) => turn,
                Err(e) => return LlmReply::error(format!("{:#}", e)),
            };

            if turn.tool_calls().is_empty() {
                info!("Agent finished after {} iteration(s)", iteration);
                return turn.reply;
            }

            let calls = turn.tool_calls().to_vec();
            messages.push(turn.message);
            for call in &calls {
                let output = self.execute(call).await;
                messages.push(ChatMessage::tool(call.id.clone(), output));
            }
        }

        warn!("Agent stopped after {} iterations without an answer", self.max_iterations);
        LlmReply::error(format!(
            "Agent did not produce an answer within {} iterations",
            self.max_iterations
        ))
    }

    async fn execute(&self, call: &ToolCall) -> String {
        if call.function.name != TOOL_NAME {
            warn!("Model requested unknown tool: {}", call.function.name);
            return format!("Unknown tool: {}", call.function.name);
        }

        let args = match call.arguments() {
            Ok(args) => args,
            Err(e) => return format!("Error: {}", e),
        };

        let Some(search_term) = args.get("search_term").and_then(|v| v.as_str()) else {
            return "Error: search_term is required".to_string();
        };
        let context_term = args.get("context_term").and_then(|v| v.as_str());

        info!("Agent calling {} with '{}'", TOOL_NAME, search_term);
        self.tool.search(search_term, context_term).await
    }
}
