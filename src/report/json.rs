use super::types::RunSummary;
use crate::error::{HarnessError, Result};
use std::path::Path;

pub fn to_json(summary: &RunSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Write the run summary as pretty JSON, creating parent directories.
pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = to_json(summary)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| HarnessError::ReportWrite {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    std::fs::write(path, json).map_err(|source| HarnessError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("JSON report written to {}", path.display());
    Ok(())
}

pub fn read_summary(path: &Path) -> anyhow::Result<RunSummary> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read results file: {}", path.display()))?;
    let summary = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse results file: {}", path.display()))?;
    Ok(summary)
}
