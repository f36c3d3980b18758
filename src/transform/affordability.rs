use anyhow::Result;

use super::{period, text_value, MeasureType, SlugRegistry, TransformedTable, Unit};
use super::{MEASURE_TYPE, PERIOD, UNIT, VALUE};
use crate::process::raw_table::cell;
use crate::process::utils::{clean_str, pathify};
use crate::process::RawTable;
use crate::transform::Recipe;

pub const DIMENSION: &str = "Alcohol affordability";
pub const REVISION: &str = "Revision";
pub const COLUMNS: &[&str] = &[PERIOD, DIMENSION, REVISION, MEASURE_TYPE, UNIT, VALUE];

const ADULT_REVISED_SUFFIX: &str = " (18+) (revised)";
const REVISED_SUFFIX: &str = " (revised)";

pub const REVISED: &str = "revised";
pub const ORIGINAL_VALUE: &str = "original-value";

/// `Revision` column for a raw `Metric` label.
pub fn revision(label: &str) -> &'static str {
    if label.ends_with(REVISED_SUFFIX) {
        REVISED
    } else {
        ORIGINAL_VALUE
    }
}

/// Label with its revision marker removed, ready to be pathified.
pub fn strip_revision(label: &str) -> &str {
    label
        .strip_suffix(ADULT_REVISED_SUFFIX)
        .or_else(|| label.strip_suffix(REVISED_SUFFIX))
        .unwrap_or(label)
}

pub fn transform(table: &RawTable) -> Result<TransformedTable> {
    let year = table.require("Year")?;
    let metric = table.require("Metric")?;
    let value = table.require(VALUE)?;

    let mut slugs = SlugRegistry::new(DIMENSION);
    let mut rows = Vec::with_capacity(table.rows.len());
    let mut dropped_rows = 0;

    for row in &table.rows {
        let Some(v) = text_value(cell(row, value)) else {
            dropped_rows += 1;
            continue;
        };
        let label = clean_str(cell(row, metric));
        let revision = revision(&label);
        let slug = if label.is_empty() {
            String::new()
        } else {
            slugs.register_qualified(revision, &label, pathify(strip_revision(&label)))?
        };
        rows.push(vec![
            period(cell(row, year)),
            slug,
            revision.to_string(),
            MeasureType::Ratio.as_str().to_string(),
            Unit::Index.as_str().to_string(),
            v,
        ]);
    }

    Ok(TransformedTable {
        recipe: Recipe::AlcoholAffordability,
        rows,
        dropped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::tests::table;

    #[test]
    fn revision_markers() {
        assert_eq!(strip_revision("Affordability index (18+) (revised)"), "Affordability index");
        assert_eq!(strip_revision("Alcohol price index (revised)"), "Alcohol price index");
        assert_eq!(strip_revision("Retail prices index"), "Retail prices index");
        assert_eq!(revision("Affordability index (18+) (revised)"), REVISED);
        assert_eq!(revision("Retail prices index"), ORIGINAL_VALUE);
    }

    #[test]
    fn reshapes_affordability() -> Result<()> {
        let t = table(
            "Alcohol_affordability_2019",
            &["Year", "Metric", "Value"],
            &[
                &["1987", "Alcohol price index", "100"],
                &["1987", "Affordability index (18+) (revised)", "100.0"],
                &["1988", "Alcohol price index (revised)", "104.2"],
                &["1988", "Retail prices index", ""],
            ],
        );
        let out = transform(&t)?;
        assert_eq!(out.dropped_rows, 1);
        assert_eq!(
            out.rows,
            vec![
                vec!["year/1987", "alcohol-price-index", "original-value", "Ratio", "index", "100"],
                vec!["year/1987", "affordability-index", "revised", "Ratio", "index", "100.0"],
                vec!["year/1988", "alcohol-price-index", "revised", "Ratio", "index", "104.2"],
            ]
        );
        Ok(())
    }

    #[test]
    fn colliding_labels_are_rejected() {
        let t = table(
            "Alcohol_affordability_2019",
            &["Year", "Metric", "Value"],
            &[
                &["1987", "Alcohol price index", "100"],
                &["1987", "Alcohol Price Index", "100"],
            ],
        );
        assert!(transform(&t).is_err());
    }
}
