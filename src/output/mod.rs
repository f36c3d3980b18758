pub mod metadata;
pub mod schema;
pub mod table;

use anyhow::{Context, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

pub use metadata::{write_metadata, DatasetMetadata};
pub use schema::write_schema;
pub use table::write_table;

/// Output paths for one recognized table, all named after the pathified title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub title: String,
    pub slug: String,
    pub csv: PathBuf,
    pub schema: PathBuf,
    pub metadata: PathBuf,
}

impl OutputArtifact {
    pub fn new(out_dir: &Path, title: &str, slug: &str) -> Self {
        let csv_name = format!("{}.csv", slug);
        Self {
            title: title.to_string(),
            slug: slug.to_string(),
            schema: out_dir.join(format!("{}-schema.json", csv_name)),
            metadata: out_dir.join(format!("{}-metadata.trig", csv_name)),
            csv: out_dir.join(csv_name),
        }
    }
}

/// Write `bytes` to a hidden temp file next to `path`, then rename over it.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    let mut tmp =
        fs::File::create(&tmp_path).with_context(|| format!("creating {:?}", tmp_path))?;
    tmp.write_all(bytes)
        .with_context(|| format!("writing {:?}", tmp_path))?;
    tmp.sync_all()
        .with_context(|| format!("syncing {:?}", tmp_path))?;
    drop(tmp);

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path))?;
    Ok(())
}
