//! The two prescription tables: dispensed in the community, and by region.

use anyhow::Result;

use super::{integer_value, period, MeasureType, Recipe, SlugRegistry, TransformedTable, Unit};
use super::{MEASURE_TYPE, PERIOD, UNIT, VALUE};
use crate::process::raw_table::cell;
use crate::process::utils::{clean_str, pathify};
use crate::process::RawTable;

pub const PRESCRIPTION: &str = "Prescription";
pub const PRESCRIPTION_ITEM: &str = "Prescription item";
pub const GEOGRAPHY: &str = "Geography";

pub const COMMUNITY_COLUMNS: &[&str] = &[
    PERIOD,
    PRESCRIPTION,
    PRESCRIPTION_ITEM,
    MEASURE_TYPE,
    UNIT,
    VALUE,
];
pub const REGION_COLUMNS: &[&str] = &[
    PERIOD,
    GEOGRAPHY,
    PRESCRIPTION,
    PRESCRIPTION_ITEM,
    MEASURE_TYPE,
    UNIT,
    VALUE,
];

/// ONS code used for rows that belong to no geography.
pub const UNKNOWN_GEOGRAPHY: &str = "XXXXXXXX";

/// Slugs for the community table's primary metric labels.
const COMMUNITY_PRESCRIPTIONS: &[(&str, &str)] = &[
    (
        "Average Net Ingredient Cost per item (£)",
        "average-net-ingredient-cost-per-item",
    ),
    ("Net Ingredient Cost (£ 000s)", "net-ingredient-cost"),
    ("Prescribed in NHS hospitals", "prescribed-in-nhs-hospitals"),
    ("Prescribed in primary care", "prescribed-in-primary-care"),
    ("Prescription Items - All Settings", "all-prescription-settings"),
];

/// Unit implied by the currency suffix of a primary metric label.
pub fn community_unit(label: &str) -> Unit {
    if label.ends_with("(£)") {
        Unit::Gbp
    } else if label.ends_with("(£ 000s)") {
        Unit::GbpThousands
    } else {
        Unit::PrescriptionItems
    }
}

/// Fixed slug for the known labels, pathified otherwise.
pub fn community_prescription(label: &str) -> String {
    COMMUNITY_PRESCRIPTIONS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, slug)| slug.to_string())
        .unwrap_or_else(|| pathify(label))
}

fn slug_or_empty(
    registry: &mut SlugRegistry,
    label: &str,
    slug: impl FnOnce(&str) -> String,
) -> Result<String> {
    if label.is_empty() {
        Ok(String::new())
    } else {
        registry.register(label, slug(label))
    }
}

pub fn community(table: &RawTable) -> Result<TransformedTable> {
    let year = table.require("Year")?;
    let primary = table.require("Metric_Primary")?;
    let secondary = table.require("Metric_Secondary")?;
    let value = table.require(VALUE)?;

    let mut prescriptions = SlugRegistry::new(PRESCRIPTION);
    let mut items = SlugRegistry::new(PRESCRIPTION_ITEM);
    let mut rows = Vec::with_capacity(table.rows.len());
    let mut dropped_rows = 0;

    for row in &table.rows {
        let Some(v) = integer_value(cell(row, value)) else {
            dropped_rows += 1;
            continue;
        };
        let primary_label = clean_str(cell(row, primary));
        let unit = community_unit(&primary_label);
        let measure = if unit == Unit::PrescriptionItems {
            MeasureType::Count
        } else {
            MeasureType::GbpTotal
        };
        let prescription =
            slug_or_empty(&mut prescriptions, &primary_label, community_prescription)?;
        let item = slug_or_empty(&mut items, &clean_str(cell(row, secondary)), pathify)?;
        rows.push(vec![
            period(cell(row, year)),
            prescription,
            item,
            measure.as_str().to_string(),
            unit.as_str().to_string(),
            v.to_string(),
        ]);
    }

    Ok(TransformedTable {
        recipe: Recipe::PrescriptionItemsCommunity,
        rows,
        dropped_rows,
    })
}

pub fn region(table: &RawTable) -> Result<TransformedTable> {
    let year = table.require("Year")?;
    let ons_code = table.require("ONS_Code")?;
    let primary = table.require("Metric_Primary")?;
    let secondary = table.require("Metric_Secondary")?;
    let value = table.require(VALUE)?;

    let mut prescriptions = SlugRegistry::new(PRESCRIPTION);
    let mut items = SlugRegistry::new(PRESCRIPTION_ITEM);
    let mut rows = Vec::with_capacity(table.rows.len());
    let mut dropped_rows = 0;

    for row in &table.rows {
        let geography = clean_str(cell(row, ons_code));
        if geography.is_empty() || geography == UNKNOWN_GEOGRAPHY {
            dropped_rows += 1;
            continue;
        }
        let Some(v) = integer_value(cell(row, value)) else {
            dropped_rows += 1;
            continue;
        };
        let prescription = slug_or_empty(&mut prescriptions, &clean_str(cell(row, primary)), pathify)?;
        let item = slug_or_empty(&mut items, &clean_str(cell(row, secondary)), pathify)?;
        rows.push(vec![
            period(cell(row, year)),
            geography,
            prescription,
            item,
            MeasureType::Count.as_str().to_string(),
            Unit::PrescriptionItems.as_str().to_string(),
            v.to_string(),
        ]);
    }

    Ok(TransformedTable {
        recipe: Recipe::PrescriptionItemsRegion,
        rows,
        dropped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::tests::table;

    const COMMUNITY_HEADERS: &[&str] = &["Year", "Metric_Primary", "Metric_Secondary", "Value"];
    const REGION_HEADERS: &[&str] = &[
        "Year",
        "ONS_Code",
        "Org_Code",
        "Org_Name",
        "Metric_Primary",
        "Metric_Secondary",
        "Value",
    ];

    #[test]
    fn community_units_and_labels() -> Result<()> {
        let t = table(
            "Prescription_items_community_2018",
            COMMUNITY_HEADERS,
            &[
                &["2018", "Average Net Ingredient Cost per item (£)", "Acamprosate Calcium", "25.47"],
                &["2018", "Net Ingredient Cost (£ 000s)", "Disulfiram", "1234"],
                &["2018", "Prescription Items - All Settings", "Disulfiram", "5000"],
                &["2018", "Prescribed in NHS hospitals", "Nalmefene", "12"],
                &["2018", "Items per 100,000 population", "Nalmefene", "3"],
            ],
        );
        let out = community(&t)?;
        assert_eq!(
            out.column(PRESCRIPTION).unwrap(),
            vec![
                "average-net-ingredient-cost-per-item",
                "net-ingredient-cost",
                "all-prescription-settings",
                "prescribed-in-nhs-hospitals",
                "items-per-100-000-population",
            ]
        );
        assert_eq!(
            out.column(UNIT).unwrap(),
            vec!["gbp", "gbp-thousands", "prescription-items", "prescription-items", "prescription-items"]
        );
        assert_eq!(
            out.column(MEASURE_TYPE).unwrap(),
            vec!["GBP Total", "GBP Total", "Count", "Count", "Count"]
        );
        assert_eq!(out.column(VALUE).unwrap(), vec!["25", "1234", "5000", "12", "3"]);
        assert_eq!(out.column(PRESCRIPTION_ITEM).unwrap()[0], "acamprosate-calcium");
        Ok(())
    }

    #[test]
    fn non_numeric_values_are_dropped() -> Result<()> {
        let t = table(
            "Prescription_items_community_2018",
            COMMUNITY_HEADERS,
            &[
                &["2018", "Prescribed in primary care", "Disulfiram", "*"],
                &["2018", "Prescribed in primary care", "Nalmefene", "17"],
                &["2018", "Prescribed in primary care", "Naltrexone", ""],
                &["2018", "Prescribed in primary care", "Acamprosate", "n/a"],
                &["2018", "Prescribed in primary care", "Disulfiram", "1e30"],
            ],
        );
        let out = community(&t)?;
        assert_eq!(out.dropped_rows, 4);
        assert_eq!(out.rows.len(), 1);
        for v in out.column(VALUE).unwrap() {
            assert!(v.parse::<i64>().is_ok());
        }
        assert_eq!(out.column(PRESCRIPTION_ITEM).unwrap(), vec!["nalmefene"]);
        Ok(())
    }

    #[test]
    fn region_drops_unknown_geography_only() -> Result<()> {
        let t = table(
            "Prescription_items_region_2018",
            REGION_HEADERS,
            &[
                &["2018", "E40000003", "Y56", "London", "Prescription items", "Disulfiram", "7"],
                &["2018", "XXXXXXXX", "UNK", "Unknown", "Prescription items", "Disulfiram", "2"],
                &["2018", "", "", "", "Prescription items", "Disulfiram", "1"],
                &["2018", "E40000005", "Y58", "South West", "Items per 100,000", "Disulfiram", "9.8"],
                &["2018", "E40000006", "Y59", "South East", "Prescription items", "Disulfiram", "x"],
            ],
        );
        let out = region(&t)?;
        assert_eq!(out.dropped_rows, 3);
        assert_eq!(out.column(GEOGRAPHY).unwrap(), vec!["E40000003", "E40000005"]);
        assert_eq!(
            out.rows[1],
            vec![
                "year/2018",
                "E40000005",
                "items-per-100-000",
                "disulfiram",
                "Count",
                "prescription-items",
                "9"
            ]
        );
        Ok(())
    }
}
