use anyhow::{anyhow, Context, Result};
use csv::WriterBuilder;
use std::path::Path;
use tracing::debug;

use crate::transform::TransformedTable;

/// Write `table` as comma-delimited CSV with a header row and no index column.
///
/// The CSV is built in memory and replaces `path` in one rename, like the
/// schema and metadata files.
pub fn write_table(table: &TransformedTable, path: &Path) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(table.columns())
        .with_context(|| format!("writing header for {}", path.display()))?;
    for row in &table.rows {
        wtr.write_record(row)
            .with_context(|| format!("writing row for {}", path.display()))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV for {}: {}", path.display(), e.error()))?;
    super::write_atomic(path, &bytes)?;
    debug!(path = %path.display(), rows = table.rows.len(), "wrote table");
    Ok(())
}
