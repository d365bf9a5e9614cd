// src/cli.rs
use crate::core::{ConfigManager, FsOps};
use crate::linkedin::{JobSearchTool, LinkedInJobScraper, QueryOptions};
use crate::llm::{LlmClient, ReportGenerator};
use crate::ocr::ReadClient;
use crate::web::start_web_server;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "jobprep")]
#[command(about = "Résumé reading, job search and interview preparation reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP API (default)
    Serve,
    /// Print the text of a PDF résumé
    Extract { pdf: PathBuf },
    /// Search LinkedIn postings and print them as markdown
    Search {
        term: String,
        /// Extra profile words used to refine the search
        #[arg(long)]
        context: Option<String>,
    },
    /// Generate a preparation report from a posting and a profile file
    Report {
        #[arg(long)]
        job: PathBuf,
        #[arg(long)]
        profile: PathBuf,
        /// Use the single-prompt report
        #[arg(long)]
        simple: bool,
    },
}

pub async fn run(cli: Cli, config: ConfigManager) -> Result<()> {
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => start_web_server(config).await,

        Command::Extract { pdf } => {
            let content = FsOps::read_bytes(&pdf).await?;
            FsOps::validate_pdf(&content)
                .with_context(|| format!("{} is not a PDF", pdf.display()))?;

            let client = ReadClient::new(&config.ocr)?;
            let text = client.extract_text(content).await?;
            info!("Extracted {} characters from {}", text.len(), pdf.display());
            println!("{}", text);
            Ok(())
        }

        Command::Search { term, context } => {
            let scraper = LinkedInJobScraper::new(&config.scraper)?;
            let options = QueryOptions {
                locations: vec![config.scraper.default_location.clone()],
                limit: config.scraper.limit,
                ..QueryOptions::default()
            };
            let tool = JobSearchTool::new(scraper, options);
            println!("{}", tool.search(&term, context.as_deref()).await);
            Ok(())
        }

        Command::Report {
            job,
            profile,
            simple,
        } => {
            let job = FsOps::read_file_safe(&job).await?;
            let profile = FsOps::read_file_safe(&profile).await?;
            let generator = ReportGenerator::new(LlmClient::new(&config.llm)?);

            let report = if simple {
                generator.simple_report(&job, &profile).await?
            } else {
                generator.preparation_report(&job, &profile, None).await?
            };
            println!("{}", report);
            Ok(())
        }
    }
}
