use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::{
    fs,
    io::{Read, Seek},
    path::Path,
};
use tracing::info;

use crate::fetch::Publication;
use crate::output::{self, DatasetMetadata, OutputArtifact};
use crate::process::{self, utils::pathify};
use crate::transform::{self, TableKind};

/// Extract, classify, transform and write every known table of `archive`
/// into `out_dir`, then emit one metadata document per written table.
///
/// Tables with no title, or a title no recipe answers to, produce nothing.
#[tracing::instrument(level = "info", skip(archive, publication, modified), fields(out = %out_dir.display()))]
pub fn run_archive<R: Read + Seek>(
    archive: R,
    publication: Option<&Publication>,
    out_dir: &Path,
    modified: DateTime<Utc>,
) -> Result<Vec<OutputArtifact>> {
    let tables = process::load_csv_zip(archive)?;
    info!("{} CSV tables in archive", tables.len());
    let titles = process::classify(&tables);

    fs::create_dir_all(out_dir).with_context(|| format!("creating {:?}", out_dir))?;

    // ─── transform + write ──────────────────────────────────────────
    let mut artifacts = Vec::new();
    for (name, table) in &tables {
        let Some(title) = titles.get(name) else {
            continue;
        };
        let recipe = match TableKind::from_title(title) {
            TableKind::Known(recipe) => recipe,
            TableKind::Unrecognized => {
                info!(file = %name, title = %title, "no recipe for table, skipping");
                continue;
            }
        };
        let transformed = transform::transform(recipe, table)
            .with_context(|| format!("transforming {}", name))?;

        let slug = pathify(title);
        let artifact = OutputArtifact::new(out_dir, title, &slug);
        output::write_table(&transformed, &artifact.csv)?;
        output::write_schema(&transformed, &slug, &artifact.schema)?;
        info!(file = %name, csv = %artifact.csv.display(), rows = transformed.rows.len(), "written");
        artifacts.push(artifact);
    }

    // ─── publish ────────────────────────────────────────────────────
    for artifact in &artifacts {
        let meta = DatasetMetadata::new(&artifact.title, &artifact.slug, publication, modified);
        output::write_metadata(&meta, &artifact.metadata)?;
        info!(id = %meta.id, "metadata written");
    }

    Ok(artifacts)
}
