// src/output/schema.rs
//
// CSVW table-schema descriptor written next to every output CSV.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use tracing::{debug, warn};

use super::write_atomic;
use crate::config::SCHEMA_BASE_URI;
use crate::process::utils::pathify;
use crate::transform::prescriptions::GEOGRAPHY;
use crate::transform::{TransformedTable, MEASURE_TYPE, PERIOD, UNIT, VALUE};

const SDMX_REF_PERIOD: &str = "http://purl.org/linked-data/sdmx/2009/dimension#refPeriod";
const SDMX_REF_AREA: &str = "http://purl.org/linked-data/sdmx/2009/dimension#refArea";
const SDMX_UNIT_MEASURE: &str = "http://purl.org/linked-data/sdmx/2009/attribute#unitMeasure";
const QB_MEASURE_TYPE: &str = "http://purl.org/linked-data/cube#measureType";

/// A single column of the table schema.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub titles: String,
    pub name: String,
    pub datatype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_url: Option<String>,
    pub required: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub columns: Vec<Column>,
    pub primary_key: Vec<String>,
    pub about_url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TableDescriptor {
    #[serde(rename = "@context")]
    pub context: serde_json::Value,
    pub url: String,
    #[serde(rename = "tableSchema")]
    pub table_schema: TableSchema,
}

/// `Measure Type` → `measure_type`
pub fn column_name(title: &str) -> String {
    pathify(title).replace(['-', '/'], "_")
}

/// Infer a CSVW datatype from the cells of one column.
///
///  - Empty cells are ignored
///  - All integers → `integer`, integers mixed with decimals → `decimal`
///  - Anything else, or no samples at all → `string`
pub fn derive_datatype<'a>(cells: impl IntoIterator<Item = &'a str>) -> &'static str {
    let mut current: Option<&'static str> = None;
    for cell in cells {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        let inferred = if cell.parse::<i64>().is_ok() {
            "integer"
        } else if cell.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
            "decimal"
        } else {
            return "string";
        };
        current = match (current, inferred) {
            (Some("decimal"), _) | (_, "decimal") => Some("decimal"),
            _ => Some(inferred),
        };
    }
    current.unwrap_or("string")
}

/// `(propertyUrl, valueUrl)` for a column, keyed to `base`.
fn column_urls(title: &str, name: &str, base: &str) -> (Option<String>, Option<String>) {
    match title {
        PERIOD => (
            Some(SDMX_REF_PERIOD.to_string()),
            Some(format!("http://reference.data.gov.uk/id/{{+{}}}", name)),
        ),
        GEOGRAPHY => (
            Some(SDMX_REF_AREA.to_string()),
            Some(format!(
                "http://statistics.data.gov.uk/id/statistical-geography/{{{}}}",
                name
            )),
        ),
        MEASURE_TYPE => (
            Some(QB_MEASURE_TYPE.to_string()),
            Some(format!("{}def/measure/{{{}}}", base, name)),
        ),
        UNIT => (
            Some(SDMX_UNIT_MEASURE.to_string()),
            Some(format!("{}def/concept/measurement-units/{{{}}}", base, name)),
        ),
        VALUE => (
            Some(format!("{}def/measure/{{{}}}", base, column_name(MEASURE_TYPE))),
            None,
        ),
        _ => {
            let slug = pathify(title);
            (
                Some(format!("{}def/dimension/{}", base, slug)),
                Some(format!("{}def/concept/{}/{{{}}}", base, slug, name)),
            )
        }
    }
}

/// Describe `table`, published as `<slug>.csv`.
pub fn build_descriptor(table: &TransformedTable, slug: &str, base: &str) -> TableDescriptor {
    let mut columns = Vec::with_capacity(table.columns().len());
    for (idx, title) in table.columns().iter().enumerate() {
        let cells = || table.rows.iter().map(move |r| r[idx].as_str());
        let name = column_name(title);
        let (property_url, value_url) = column_urls(title, &name, base);
        columns.push(Column {
            titles: title.to_string(),
            datatype: derive_datatype(cells()).to_string(),
            required: cells().all(|c| !c.trim().is_empty()),
            name,
            property_url,
            value_url,
        });
    }

    let primary_key: Vec<String> = columns
        .iter()
        .filter(|c| c.titles != VALUE && c.titles != UNIT)
        .map(|c| c.name.clone())
        .collect();
    let about_url = format!(
        "{}data/{}/{}",
        base,
        slug,
        primary_key
            .iter()
            .map(|k| {
                if k == "period" {
                    format!("{{+{}}}", k)
                } else {
                    format!("{{{}}}", k)
                }
            })
            .collect::<Vec<_>>()
            .join("/")
    );

    TableDescriptor {
        context: json!(["http://www.w3.org/ns/csvw", {"@language": "en"}]),
        url: format!("{}.csv", slug),
        table_schema: TableSchema {
            columns,
            primary_key,
            about_url,
        },
    }
}

/// Build the descriptor for `table` and write it, pretty-printed, to `path`.
pub fn write_schema(table: &TransformedTable, slug: &str, path: &Path) -> Result<()> {
    let descriptor = build_descriptor(table, slug, SCHEMA_BASE_URI);
    for col in &descriptor.table_schema.columns {
        if !col.required && col.titles != VALUE {
            warn!(table = slug, column = %col.titles, "column has empty cells");
        }
    }
    let mut json = serde_json::to_vec_pretty(&descriptor).context("serializing schema")?;
    json.push(b'\n');
    write_atomic(path, &json)?;
    debug!(path = %path.display(), "wrote schema");
    Ok(())
}
