// src/core/fs_ops.rs
//! File system operations for uploads and generated reports

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

const PDF_SIGNATURE: &[u8] = b"%PDF-";

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    pub async fn read_bytes(path: &Path) -> Result<Vec<u8>> {
        fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Write file, creating the parent directory first
    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        info!("Written file: {}", path.display());
        Ok(())
    }

    /// Best-effort removal of a temporary file
    pub async fn remove_file_quiet(path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }

    /// Unique scratch path for an upload
    pub fn temp_upload_path(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}_{}", prefix, uuid::Uuid::new_v4()))
    }

    /// File name offered when downloading the report of posting `number` (1-based)
    pub fn report_file_name(number: usize) -> String {
        format!("relatorio_vaga_{}.txt", number)
    }

    /// Check the uploaded résumé really is a PDF
    pub fn validate_pdf(content: &[u8]) -> Result<()> {
        if content.is_empty() {
            anyhow::bail!("PDF file is empty");
        }
        if !content.starts_with(PDF_SIGNATURE) {
            anyhow::bail!("Invalid PDF file - corrupted or wrong format");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_read_report() {
        let dir = FsOps::temp_upload_path("fs_ops_test");
        let path = dir.join("nested").join(FsOps::report_file_name(3));

        FsOps::write_file_safe(&path, "# Relatório").await.unwrap();
        assert_eq!(FsOps::read_file_safe(&path).await.unwrap(), "# Relatório");
        assert!(path.ends_with("relatorio_vaga_3.txt"));

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_quiet() {
        FsOps::remove_file_quiet(&FsOps::temp_upload_path("missing")).await;
    }

    #[test]
    fn test_validate_pdf() {
        assert!(FsOps::validate_pdf(b"%PDF-1.7\n...").is_ok());
        assert!(FsOps::validate_pdf(b"").is_err());
        assert!(FsOps::validate_pdf(b"\x89PNG\r\n").is_err());
    }
}
