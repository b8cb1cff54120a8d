//! Server configuration from CLI flags and environment variables

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use uuid::Uuid;

/// Spreadsheet aggregation service
#[derive(Debug, Parser)]
#[command(name = "sheetserve", version, about)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "SHEETSERVE_HOST")]
    pub host: String,

    /// Port to bind
    #[arg(long, default_value_t = 8080, env = "SHEETSERVE_PORT")]
    pub port: u16,

    /// Directory for uploaded workbooks
    #[arg(long, default_value = "uploads", env = "SHEETSERVE_UPLOAD_DIR")]
    pub upload_dir: PathBuf,

    /// Directory for generated PDFs and chart images
    #[arg(long, default_value = "artifacts", env = "SHEETSERVE_ARTIFACT_DIR")]
    pub artifact_dir: PathBuf,
}

impl ServerConfig {
    pub fn storage(&self) -> Storage {
        Storage::new(self.upload_dir.clone(), self.artifact_dir.clone())
    }
}

/// Where uploads and generated artifacts land on disk.
///
/// Every generated file gets a uuid-keyed name so concurrent requests cannot
/// overwrite one another's output.
#[derive(Debug, Clone)]
pub struct Storage {
    upload_dir: PathBuf,
    artifact_dir: PathBuf,
}

impl Storage {
    pub fn new(upload_dir: PathBuf, artifact_dir: PathBuf) -> Self {
        Storage {
            upload_dir,
            artifact_dir,
        }
    }

    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.upload_dir, &self.artifact_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Destination for an uploaded workbook, keyed by uuid but keeping the
    /// original filename visible. Any path components the client sends are
    /// stripped.
    pub fn upload_path(&self, original_name: &str) -> PathBuf {
        let base = Path::new(original_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "workbook.xlsx".to_string());
        self.upload_dir.join(format!("{}_{}", Uuid::new_v4(), base))
    }

    /// Destination for a generated artifact, e.g. `report_<uuid>.pdf`.
    pub fn artifact_path(&self, stem: &str, extension: &str) -> PathBuf {
        self.artifact_dir
            .join(format!("{}_{}.{}", stem, Uuid::new_v4(), extension))
    }
}
