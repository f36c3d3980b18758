// src/process/mod.rs
pub mod encoding;
pub mod raw_table;
pub mod title;
pub mod utils;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{
    collections::BTreeMap,
    io::{Read, Seek},
    path::Path,
};
use tracing::{debug, warn};
use zip::ZipArchive;

pub use raw_table::RawTable;
pub use title::classify;

/// Open the archive in `reader`, find all `.csv` entries, and parse each into a
/// [`RawTable`] after sniffing its text encoding.
///
/// Returns a BTreeMap keyed by the entry's file stem. An archive without CSV
/// entries yields an empty map; any read, decode or parse failure is an error.
#[tracing::instrument(level = "info", skip(reader))]
pub fn load_csv_zip<R: Read + Seek>(reader: R) -> Result<BTreeMap<String, RawTable>> {
    let mut archive = ZipArchive::new(reader).context("Failed to read ZIP archive")?;

    // 1) Buffer each .csv entry, in archive order
    let mut buffers: Vec<(String, Vec<u8>)> = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to access ZIP entry #{}", i))?;
        let name = entry.name().to_string();

        if entry.is_file() && name.to_lowercase().ends_with(".csv") {
            let mut buf = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut buf)
                .with_context(|| format!("Failed to read {} into memory", name))?;
            buffers.push((name, buf));
        } else {
            debug!(entry = %name, "skipping non-CSV entry");
        }
    }
    drop(archive);

    // 2) Decode and parse each buffer
    let mut tables = BTreeMap::new();
    for (entry_name, data) in buffers {
        let stem = Path::new(&entry_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| entry_name.clone());

        let (text, encoding) = encoding::decode_text(&data)
            .with_context(|| format!("Failed to decode {}", entry_name))?;
        debug!(entry = %entry_name, encoding = encoding.name(), bytes = data.len(), "decoded");

        let table =
            parse_csv(&stem, &text).with_context(|| format!("CSV parse error in {}", entry_name))?;
        if tables.insert(stem.clone(), table).is_some() {
            warn!(table = %stem, "duplicate table name in archive, keeping the last one");
        }
    }

    Ok(tables)
}

/// Parse decoded CSV text with a header row into a [`RawTable`] named `name`.
pub fn parse_csv(name: &str, text: &str) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .context("reading header row")?
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            let h = h.trim();
            if h.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("record {}", idx))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.len() < headers.len() {
            row.resize(headers.len(), String::new());
        }
        rows.push(row);
    }

    Ok(RawTable {
        name: name.to_string(),
        headers,
        rows,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::{Cursor, Write};
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    use zip::write::SimpleFileOptions;
    use zip::CompressionMethod;

    pub(crate) fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,alcoholscraper=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    /// Build an in-memory ZIP from `(entry name, raw bytes)` pairs.
    pub(crate) fn build_zip(entries: &[(&str, &[u8])]) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            for (name, data) in entries {
                zip.start_file(*name, options)?;
                zip.write_all(data)?;
            }
            zip.finish()?;
        }
        Ok(buf)
    }

    #[test]
    fn test_load_csv_zip() -> Result<()> {
        init_test_logging();
        let deaths = "ICD10_Code,ICD10_Description,Metric,Year,Value\n\
                      Total,All alcohol-specific deaths,All persons,2019,100\n\
                      F10,Mental and behavioural disorders,Male,2019,40\n";
        let bytes = build_zip(&[
            ("Alcohol_specific_deaths_2019.csv", deaths.as_bytes()),
            ("readme.txt", b"not a table".as_slice()),
            ("nested/Household_expenditure_alcohol_2018.CSV", b"Year,Metric,Value,,\n".as_slice()),
        ])?;

        let tables = load_csv_zip(Cursor::new(bytes))?;
        assert_eq!(tables.len(), 2);

        let t = &tables["Alcohol_specific_deaths_2019"];
        assert_eq!(t.name, "Alcohol_specific_deaths_2019");
        assert_eq!(
            t.headers,
            vec!["ICD10_Code", "ICD10_Description", "Metric", "Year", "Value"]
        );
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1][0], "F10");

        let h = &tables["Household_expenditure_alcohol_2018"];
        assert_eq!(h.headers, vec!["Year", "Metric", "Value", "Unnamed: 3", "Unnamed: 4"]);
        assert!(h.rows.is_empty());
        Ok(())
    }

    #[test]
    fn archive_without_csv_is_empty() -> Result<()> {
        let bytes = build_zip(&[("notes.txt", b"hello".as_slice())])?;
        assert!(load_csv_zip(Cursor::new(bytes))?.is_empty());
        Ok(())
    }

    #[test]
    fn corrupt_archive_is_an_error() {
        let err = load_csv_zip(Cursor::new(b"definitely not a zip".to_vec()));
        assert!(err.is_err());
    }

    #[test]
    fn windows_1252_entry_is_decoded() -> Result<()> {
        let bytes = build_zip(&[(
            "Prescription_items_community_2018.csv",
            b"Metric_Primary,Value\nAverage Net Ingredient Cost per item (\xA3),12\n".as_slice(),
        )])?;
        let tables = load_csv_zip(Cursor::new(bytes))?;
        let t = &tables["Prescription_items_community_2018"];
        assert_eq!(t.rows[0][0], "Average Net Ingredient Cost per item (£)");
        Ok(())
    }

    #[test]
    fn short_rows_are_padded() -> Result<()> {
        let t = parse_csv("t", "Year,Metric,Value\n2019,Male\n")?;
        assert_eq!(t.rows[0], vec!["2019", "Male", ""]);
        Ok(())
    }
}
