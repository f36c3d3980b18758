use anyhow::{bail, Result};

use super::{period, text_value, MeasureType, Recipe, SlugRegistry, TransformedTable, Unit};
use super::{MEASURE_TYPE, PERIOD, UNIT, VALUE};
use crate::process::raw_table::cell;
use crate::process::utils::{clean_str, pathify};
use crate::process::RawTable;

pub const CAUSE: &str = "Underlying Cause of Death";
pub const SEX: &str = "Sex";
pub const COLUMNS: &[&str] = &[PERIOD, CAUSE, SEX, MEASURE_TYPE, UNIT, VALUE];

const TOTAL_CODE: &str = "Total";
const ALL_CAUSES: &str = "all-alcohol-related-deaths";

/// `Metric` label → sex code.
const SEX_CODES: &[(&str, &str)] = &[("All persons", "T"), ("Male", "M"), ("Female", "F")];

pub fn sex_code(label: &str) -> Option<&'static str> {
    SEX_CODES
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, code)| *code)
}

/// ICD-10 code → cause slug; the `Total` row stands for every alcohol-related death.
pub fn cause_of_death(code: &str) -> String {
    if code == TOTAL_CODE {
        ALL_CAUSES.to_string()
    } else {
        pathify(code)
    }
}

pub fn transform(table: &RawTable) -> Result<TransformedTable> {
    let year = table.require("Year")?;
    let code = table.require("ICD10_Code")?;
    let metric = table.require("Metric")?;
    let value = table.require(VALUE)?;

    let mut causes = SlugRegistry::new(CAUSE);
    let mut rows = Vec::with_capacity(table.rows.len());
    let mut dropped_rows = 0;

    for row in &table.rows {
        let Some(v) = text_value(cell(row, value)) else {
            dropped_rows += 1;
            continue;
        };
        let code_label = clean_str(cell(row, code));
        let cause = if code_label.is_empty() {
            String::new()
        } else {
            causes.register(&code_label, cause_of_death(&code_label))?
        };
        let sex_label = clean_str(cell(row, metric));
        let Some(sex) = sex_code(&sex_label) else {
            bail!("table `{}`: unknown sex label `{}`", table.name, sex_label);
        };
        rows.push(vec![
            period(cell(row, year)),
            cause,
            sex.to_string(),
            MeasureType::Count.as_str().to_string(),
            Unit::Deaths.as_str().to_string(),
            v,
        ]);
    }

    Ok(TransformedTable {
        recipe: Recipe::AlcoholSpecificDeaths,
        rows,
        dropped_rows,
    })
}
