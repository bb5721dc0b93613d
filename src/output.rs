use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_BASE_NAME: &str = "apartments";

/// Writes scraped records as one indented JSON array
pub struct JsonWriter {
    path: PathBuf,
}

impl JsonWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `apartments` -> `apartments.json`; names that already end in `.json` are kept
    pub fn from_base_name(base: &str) -> Self {
        if base.ends_with(".json") {
            Self::new(base)
        } else {
            Self::new(format!("{}.json", base))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write<T: Serialize>(&self, records: &[T]) -> Result<()> {
        let bytes = to_indented_json(records)?;
        tokio::fs::write(self.path(), bytes)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        info!("💾 Saved {} records to {}", records.len(), self.path().display());
        Ok(())
    }
}

/// Four-space indented JSON; non-ASCII text is written as-is
fn to_indented_json<T: Serialize>(records: &[T]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    records
        .serialize(&mut serializer)
        .context("Failed to serialize records")?;
    Ok(buf)
}
