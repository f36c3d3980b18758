use anyhow::Result;

use super::{period, text_value, MeasureType, Recipe, SlugRegistry, TransformedTable, Unit};
use super::{MEASURE_TYPE, PERIOD, UNIT, VALUE};
use crate::process::raw_table::cell;
use crate::process::utils::{clean_str, pathify};
use crate::process::RawTable;

pub const DIMENSION: &str = "Household expenditure type";
pub const COLUMNS: &[&str] = &[PERIOD, DIMENSION, MEASURE_TYPE, UNIT, VALUE];

/// Percentages are labelled as such; everything else is money.
pub fn unit_for(slug: &str) -> Unit {
    if slug.contains("percentage") {
        Unit::Percent
    } else {
        Unit::Gbp
    }
}

pub fn transform(table: &RawTable) -> Result<TransformedTable> {
    let year = table.require("Year")?;
    let metric = table.require("Metric")?;
    let value = table.require(VALUE)?;

    let mut slugs = SlugRegistry::new(DIMENSION);
    let mut rows = Vec::with_capacity(table.rows.len());
    let mut dropped_rows = 0;

    for row in &table.rows {
        // thousands separators
        let Some(v) = text_value(&cell(row, value).replace(',', "")) else {
            dropped_rows += 1;
            continue;
        };
        let label = clean_str(cell(row, metric));
        let slug = if label.is_empty() {
            String::new()
        } else {
            slugs.register(&label, pathify(&label))?
        };
        let unit = unit_for(&slug);
        rows.push(vec![
            period(cell(row, year)),
            slug,
            MeasureType::HouseholdExpenditure.as_str().to_string(),
            unit.as_str().to_string(),
            v,
        ]);
    }

    Ok(TransformedTable {
        recipe: Recipe::HouseholdExpenditureAlcohol,
        rows,
        dropped_rows,
    })
}
