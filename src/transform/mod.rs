//! Title-keyed reshaping recipes.
//!
//! Every recipe is a pure function from a [`RawTable`] to a [`TransformedTable`]
//! whose columns are fixed by the [`Recipe`] that produced it.

pub mod affordability;
pub mod deaths;
pub mod expenditure;
pub mod prescriptions;
pub mod slugs;

use anyhow::Result;
use tracing::info;

use crate::process::utils::clean_str;
use crate::process::RawTable;

pub use slugs::SlugRegistry;

pub const PERIOD: &str = "Period";
pub const MEASURE_TYPE: &str = "Measure Type";
pub const UNIT: &str = "Unit";
pub const VALUE: &str = "Value";

/// The five known tables of the publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipe {
    AlcoholAffordability,
    AlcoholSpecificDeaths,
    HouseholdExpenditureAlcohol,
    PrescriptionItemsCommunity,
    PrescriptionItemsRegion,
}

/// Outcome of looking a title up against the known recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Known(Recipe),
    Unrecognized,
}

impl Recipe {
    pub const ALL: [Recipe; 5] = [
        Recipe::AlcoholAffordability,
        Recipe::AlcoholSpecificDeaths,
        Recipe::HouseholdExpenditureAlcohol,
        Recipe::PrescriptionItemsCommunity,
        Recipe::PrescriptionItemsRegion,
    ];

    /// Lowercase title this recipe answers to.
    pub fn title(&self) -> &'static str {
        match self {
            Recipe::AlcoholAffordability => "alcohol affordability",
            Recipe::AlcoholSpecificDeaths => "alcohol specific deaths",
            Recipe::HouseholdExpenditureAlcohol => "household expenditure alcohol",
            Recipe::PrescriptionItemsCommunity => "prescription items community",
            Recipe::PrescriptionItemsRegion => "prescription items region",
        }
    }

    /// Output schema, in column order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Recipe::AlcoholAffordability => affordability::COLUMNS,
            Recipe::AlcoholSpecificDeaths => deaths::COLUMNS,
            Recipe::HouseholdExpenditureAlcohol => expenditure::COLUMNS,
            Recipe::PrescriptionItemsCommunity => prescriptions::COMMUNITY_COLUMNS,
            Recipe::PrescriptionItemsRegion => prescriptions::REGION_COLUMNS,
        }
    }
}

impl TableKind {
    /// Case-insensitive title lookup.
    pub fn from_title(title: &str) -> Self {
        let key = title.trim().to_lowercase();
        Recipe::ALL
            .into_iter()
            .find(|r| r.title() == key)
            .map_or(TableKind::Unrecognized, TableKind::Known)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeasureType {
    Count,
    Ratio,
    HouseholdExpenditure,
    GbpTotal,
}

impl MeasureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasureType::Count => "Count",
            MeasureType::Ratio => "Ratio",
            MeasureType::HouseholdExpenditure => "Household expenditure",
            MeasureType::GbpTotal => "GBP Total",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    Index,
    Deaths,
    Percent,
    Gbp,
    GbpThousands,
    PrescriptionItems,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Index => "index",
            Unit::Deaths => "deaths",
            Unit::Percent => "percent",
            Unit::Gbp => "gbp",
            Unit::GbpThousands => "gbp-thousands",
            Unit::PrescriptionItems => "prescription-items",
        }
    }
}

/// A table reshaped by one recipe. Every row has one cell per entry of
/// `recipe.columns()`, and no row has an empty `Value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedTable {
    pub recipe: Recipe,
    pub rows: Vec<Vec<String>>,
    /// Source rows left out for a missing or non-numeric value or a sentinel geography.
    pub dropped_rows: usize,
}

impl TransformedTable {
    pub fn columns(&self) -> &'static [&'static str] {
        self.recipe.columns()
    }

    /// Cells of the named output column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.columns().iter().position(|c| *c == name)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }
}

/// Apply `recipe` to `table`. The input is left untouched.
#[tracing::instrument(level = "info", skip(table), fields(table = %table.name, rows = table.rows.len()))]
pub fn transform(recipe: Recipe, table: &RawTable) -> Result<TransformedTable> {
    let out = match recipe {
        Recipe::AlcoholAffordability => affordability::transform(table)?,
        Recipe::AlcoholSpecificDeaths => deaths::transform(table)?,
        Recipe::HouseholdExpenditureAlcohol => expenditure::transform(table)?,
        Recipe::PrescriptionItemsCommunity => prescriptions::community(table)?,
        Recipe::PrescriptionItemsRegion => prescriptions::region(table)?,
    };
    info!(
        recipe = recipe.title(),
        kept = out.rows.len(),
        dropped = out.dropped_rows,
        "transformed"
    );
    Ok(out)
}

/// `Year` → `year/<value>`.
pub(crate) fn period(year: &str) -> String {
    format!("year/{}", clean_str(year))
}

/// Pass-through value, `None` when missing.
pub(crate) fn text_value(raw: &str) -> Option<String> {
    let v = clean_str(raw);
    (!v.is_empty()).then_some(v)
}

/// Numeric coercion: anything that does not parse as a finite number is `None`,
/// fractional values are truncated towards zero.
pub(crate) fn integer_value(raw: &str) -> Option<i64> {
    let v: f64 = clean_str(raw).parse().ok()?;
    let t = v.trunc();
    // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
    (t >= i64::MIN as f64 && t < i64::MAX as f64).then(|| t as i64)
}
