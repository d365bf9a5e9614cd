// src/core/config_manager.rs
//! Unified configuration: paths from `config.yaml`, services from the environment

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub ocr: OcrConfig,
    pub llm: LlmConfig,
    pub scraper: ScraperConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    /// Generated reports are written below this directory.
    pub output_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub language: String,
    pub poll_interval_ms: u64,
    pub max_polls: u32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub deployment: String,
    pub api_version: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub user_agent: String,
    pub default_location: String,
    pub limit: usize,
    pub timeout_seconds: u64,
    /// Pause between consecutive page fetches.
    pub request_delay_ms: u64,
    pub fetch_descriptions: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub max_upload_mb: u64,
    /// Idle sessions older than this are dropped.
    pub session_ttl_minutes: i64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            language: "pt".to_string(),
            poll_interval_ms: 1000,
            max_polls: 60,
            timeout_seconds: 60,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            deployment: "gpt-4.1".to_string(),
            api_version: "2024-02-01".to_string(),
            timeout_seconds: 120,
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.linkedin.com".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            default_location: "Brasil".to_string(),
            limit: 10,
            timeout_seconds: 40,
            request_delay_ms: 1500,
            fetch_descriptions: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            max_upload_mb: 2,
            session_ttl_minutes: crate::session::DEFAULT_SESSION_TTL_MINUTES,
        }
    }
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        Ok(Self {
            environment: Self::load_environment()?,
            ocr: Self::load_ocr()?,
            llm: Self::load_llm()?,
            scraper: Self::load_scraper()?,
            server: Self::load_server()?,
        })
    }

    fn load_environment() -> Result<EnvironmentConfig> {
        let env = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string());
        info!("Loading environment configuration for: {}", env);

        let config_path = PathBuf::from(CONFIG_FILE);
        let mut environment = if config_path.exists() {
            Self::load_from_file(&config_path, &env)?
        } else {
            let base_dir = if env == "production" {
                PathBuf::from("/app")
            } else {
                std::env::current_dir().context("Failed to get current directory")?
            };
            EnvironmentConfig {
                output_path: base_dir.join("out"),
            }
        };

        if let Some(dir) = env_var("JOBPREP_OUTPUT_DIR") {
            environment.output_path = PathBuf::from(dir);
        }
        environment.output_path = resolve_path(&environment.output_path)?;

        Ok(environment)
    }

    fn load_from_file(path: &Path, environment: &str) -> Result<EnvironmentConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        parse_config_file(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn load_ocr() -> Result<OcrConfig> {
        let defaults = OcrConfig::default();
        Ok(OcrConfig {
            endpoint: env_var("AZURE_COMPUTER_VISION_ENDPOINT").unwrap_or(defaults.endpoint),
            api_key: env_var("AZURE_COMPUTER_VISION_API_KEY"),
            language: env_var("OCR_LANGUAGE").unwrap_or(defaults.language),
            poll_interval_ms: env_parse("OCR_POLL_INTERVAL_MS", defaults.poll_interval_ms)?,
            max_polls: env_parse("OCR_MAX_POLLS", defaults.max_polls)?,
            timeout_seconds: env_parse("OCR_TIMEOUT_SECS", defaults.timeout_seconds)?,
        })
    }

    fn load_llm() -> Result<LlmConfig> {
        let defaults = LlmConfig::default();
        Ok(LlmConfig {
            endpoint: env_var("AZURE_OPENAI_ENDPOINT").unwrap_or(defaults.endpoint),
            api_key: env_var("AZURE_OPENAI_API_KEY"),
            deployment: env_var("LLM_DEPLOYMENT_NAME").unwrap_or(defaults.deployment),
            api_version: env_var("AZURE_OPENAI_API_VERSION").unwrap_or(defaults.api_version),
            timeout_seconds: env_parse("LLM_TIMEOUT_SECS", defaults.timeout_seconds)?,
        })
    }

    fn load_scraper() -> Result<ScraperConfig> {
        let defaults = ScraperConfig::default();
        Ok(ScraperConfig {
            base_url: env_var("LINKEDIN_BASE_URL").unwrap_or(defaults.base_url),
            user_agent: env_var("SCRAPER_USER_AGENT").unwrap_or(defaults.user_agent),
            default_location: env_var("JOB_SEARCH_LOCATION").unwrap_or(defaults.default_location),
            limit: env_parse("JOB_SEARCH_LIMIT", defaults.limit)?,
            timeout_seconds: env_parse("SCRAPER_TIMEOUT_SECS", defaults.timeout_seconds)?,
            request_delay_ms: env_parse("SCRAPER_DELAY_MS", defaults.request_delay_ms)?,
            fetch_descriptions: env_parse("SCRAPER_FETCH_DESCRIPTIONS", defaults.fetch_descriptions)?,
        })
    }

    fn load_server() -> Result<ServerConfig> {
        let defaults = ServerConfig::default();
        Ok(ServerConfig {
            port: env_parse("ROCKET_PORT", defaults.port)?,
            max_upload_mb: env_parse("MAX_FILE_SIZE_MB", defaults.max_upload_mb)?,
            session_ttl_minutes: env_parse("SESSION_TTL_MINUTES", defaults.session_ttl_minutes)?,
        })
    }

    /// Directory holding the reports of one session.
    pub fn reports_dir(&self, session_id: &str) -> PathBuf {
        self.environment.output_path.join("reports").join(session_id)
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        use crate::core::FsOps;

        FsOps::ensure_dir_exists(&self.environment.output_path).await
    }
}

fn parse_config_file(content: &str, environment: &str) -> Result<EnvironmentConfig> {
    let config_file: ConfigFile = serde_yaml::from_str(content)?;
    Ok(match environment {
        "production" => config_file.production,
        _ => config_file.local,
    })
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(current_dir.join(path))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env_var(name) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        None => Ok(default),
    }
}
