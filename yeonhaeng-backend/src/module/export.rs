//! Record export
//!
//! Writes a record's source XML to the export directory under a fixed file
//! name. A later export of another record overwrites the file.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use yeonhaeng_common::SearchRecord;

use crate::config::ExportConfig;

/// Media type of exported files
pub const EXPORT_MIME: &str = "application/xml";

/// Every export lands under this name
pub const EXPORT_FILE_NAME: &str = "xml_data.xml";

/// Ensure the export directory exists
pub async fn ensure_export_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .await
        .context(format!("Failed to create export directory: {:?}", dir))
}

/// Write `record.raw_xml` verbatim. Returns the written path.
pub async fn export_record(record: &SearchRecord, config: &ExportConfig) -> Result<PathBuf> {
    ensure_export_dir(&config.dir).await?;

    let path = config.dir.join(EXPORT_FILE_NAME);
    fs::write(&path, record.raw_xml.as_bytes())
        .await
        .context(format!("Failed to write export file: {:?}", path))?;

    tracing::info!(
        "Exported record {} ({} bytes, {}) to {:?}",
        record.record_id,
        record.raw_xml.len(),
        EXPORT_MIME,
        path
    );
    Ok(path)
}
