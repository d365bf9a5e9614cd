// src/llm/report.rs
use super::client::ChatModel;
use super::types::ChatMessage;
use anyhow::Result;
use tracing::{error, info};

pub const DEFAULT_SYSTEM_INSTRUCTIONS: &str = "\
Você é um assistente especializado em preparação para entrevistas de emprego.

Analise a descrição da vaga e o perfil do candidato, e forneça um relatório de preparação em formato markdown que inclua:
1. Correspondência entre habilidades do candidato e requisitos da vaga
2. Possíveis perguntas de entrevista que podem ser feitas
3. Pontos que o candidato pode melhorar ou enfatizar
4. Sugestões de tópicos para pesquisar sobre a empresa

Formate sua resposta de modo organizado e direto, sem introduções longas.";

/// Interview preparation reports for one posting and one candidate.
pub struct ReportGenerator<M> {
    model: M,
}

impl<M: ChatModel> ReportGenerator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub async fn preparation_report(
        &self,
        job: &str,
        profile: &str,
        system_instructions: Option<&str>,
    ) -> Result<String> {
        let instructions = system_instructions
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SYSTEM_INSTRUCTIONS);

        let messages = [
            ChatMessage::system(instructions),
            ChatMessage::user(format!(
                "Descrição da vaga:\n{}\n\nPerfil do candidato:\n{}",
                job, profile
            )),
        ];

        info!("Generating preparation report");
        let turn = self.model.chat(&messages, &[]).await.map_err(|e| {
            error!("Report generation failed: {:#}", e);
            e.context("Failed to generate report")
        })?;

        turn.reply.into_result()
    }

    pub async fn simple_report(&self, job: &str, profile: &str) -> Result<String> {
        info!("Generating simple report");
        self.model
            .complete(&simple_report_prompt(job, profile))
            .await
            .into_result()
    }
}

pub fn simple_report_prompt(job: &str, profile: &str) -> String {
    format!(
        r#"Você é um especialista em carreiras e orientação profissional. Gere um relatório detalhado de preparação para uma entrevista de emprego com base nos dados a seguir:

### VAGA:
{}

### PERFIL DO CANDIDATO:
{}

Seu relatório deve incluir:
1. Análise de compatibilidade entre o candidato e a vaga
2. Pontos fortes do candidato em relação à vaga
3. Pontos de melhoria ou lacunas
4. Sugestões de como destacar experiências relevantes
5. Perguntas prováveis na entrevista e como respondê-las
6. Dicas de preparação específicas para esta vaga

Organize o relatório em seções claras e forneça orientações práticas."#,
        job, profile
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::{ChatTurn, ToolDefinition};
    use crate::llm::LlmReply;
    use std::sync::Mutex;

    struct EchoModel {
        reply: LlmReply,
        seen: Mutex<Vec<ChatMessage>>,
    }

    #[rocket::async_trait]
    impl ChatModel for EchoModel {
        async fn chat(&self, messages: &[ChatMessage], _: &[ToolDefinition]) -> Result<ChatTurn> {
            *self.seen.lock().unwrap() = messages.to_vec();
            Ok(ChatTurn {
                message: ChatMessage::assistant(self.reply.text.clone().unwrap_or_default()),
                reply: self.reply.clone(),
            })
        }
    }

    fn generator(reply: LlmReply) -> ReportGenerator<EchoModel> {
        ReportGenerator::new(EchoModel {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_preparation_report_uses_default_instructions() {
        let generator = generator(LlmReply::text("## Relatório"));

        let report = generator
            .preparation_report("Dev Rust", "Ana, Ciência da Computação", None)
            .await
            .unwrap();
        assert_eq!(report, "## Relatório");

        let seen = generator.model.seen.lock().unwrap();
        assert_eq!(seen[0].content.as_deref(), Some(DEFAULT_SYSTEM_INSTRUCTIONS));
        assert_eq!(
            seen[1].content.as_deref(),
            Some("Descrição da vaga:\nDev Rust\n\nPerfil do candidato:\nAna, Ciência da Computação")
        );
    }

    #[tokio::test]
    async fn test_preparation_report_custom_instructions() {
        let generator = generator(LlmReply::text("ok"));
        generator
            .preparation_report("vaga", "perfil", Some("Seja breve."))
            .await
            .unwrap();
        assert_eq!(
            generator.model.seen.lock().unwrap()[0].content.as_deref(),
            Some("Seja breve.")
        );
    }

    #[tokio::test]
    async fn test_adapter_error_becomes_err() {
        let generator = generator(LlmReply::error("content filter"));
        let err = generator.preparation_report("vaga", "perfil", None).await.unwrap_err();
        assert!(err.to_string().contains("content filter"));
        assert!(generator.simple_report("vaga", "perfil").await.is_err());
    }

    #[tokio::test]
    async fn test_simple_report_prompt() {
        let generator = generator(LlmReply::text("relatório"));
        assert_eq!(generator.simple_report("Vaga X", "Perfil Y").await.unwrap(), "relatório");

        let seen = generator.model.seen.lock().unwrap();
        let prompt = seen[0].content.as_deref().unwrap();
        assert!(prompt.contains("### VAGA:\nVaga X"));
        assert!(prompt.contains("6. Dicas de preparação"));
    }
}
