use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use super::raw_table::RawTable;
use super::utils::clean_str;

/// Leading text, then a year or a `<year>_to_<year>` range.
static TITLE_YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)([0-9]+(?:_to_[0-9]+)?)").expect("title pattern should be valid")
});

/// Columns that hold measurements or periods rather than categories.
const NON_CATEGORY_COLUMNS: &[&str] = &["Year", "Value"];

/// Derive a human readable title from a file stem:
/// `Prescription_items_community_2008_to_2018` → `Prescription items community`.
///
/// Returns `None` when the stem carries no year, or nothing precedes it.
pub fn title_from_file_name(stem: &str) -> Option<String> {
    let caps = TITLE_YEARS.captures(stem)?;
    let title = caps[1].replace('_', " ").trim().to_string();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Distinct values of every category column, for inspection.
pub fn category_values(table: &RawTable) -> BTreeMap<String, BTreeSet<String>> {
    let mut out = BTreeMap::new();
    for (idx, header) in table.headers.iter().enumerate() {
        if NON_CATEGORY_COLUMNS.contains(&header.as_str()) {
            continue;
        }
        let values: BTreeSet<String> = table
            .column(idx)
            .map(clean_str)
            .filter(|v| !v.is_empty())
            .collect();
        out.insert(header.clone(), values);
    }
    out
}

/// Title every table that has one, logging its category values on the way.
///
/// Tables without a title are left out of the returned map.
#[tracing::instrument(level = "info", skip(tables), fields(tables = tables.len()))]
pub fn classify(tables: &BTreeMap<String, RawTable>) -> BTreeMap<String, String> {
    let mut titles = BTreeMap::new();
    for (name, table) in tables {
        let Some(title) = title_from_file_name(name) else {
            info!(file = %name, "no year in file name, table has no title");
            continue;
        };
        let categories = category_values(table);
        info!(
            file = %name,
            title = %title,
            rows = table.rows.len(),
            category_columns = categories.len(),
            "classified"
        );
        for (column, values) in &categories {
            debug!(title = %title, column = %column, count = values.len(), ?values, "categories");
        }
        titles.insert(name.clone(), title);
    }
    titles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_from_file_names() {
        assert_eq!(
            title_from_file_name("Alcohol_specific_deaths_2019").as_deref(),
            Some("Alcohol specific deaths")
        );
        assert_eq!(
            title_from_file_name("Prescription_items_community_2008_to_2018").as_deref(),
            Some("Prescription items community")
        );
        assert_eq!(
            title_from_file_name("Household_expenditure_alcohol_2018").as_deref(),
            Some("Household expenditure alcohol")
        );
        assert_eq!(title_from_file_name("Readme"), None);
        assert_eq!(title_from_file_name("2019"), None);
    }

    #[test]
    fn first_digit_run_ends_the_title() {
        assert_eq!(
            title_from_file_name("Table_1_deaths_2019").as_deref(),
            Some("Table")
        );
    }

    #[test]
    fn categories_skip_year_and_value() {
        let table = RawTable {
            name: "Alcohol_specific_deaths_2019".into(),
            headers: vec!["Year".into(), "Metric".into(), "Value".into()],
            rows: vec![
                vec!["2019".into(), "Male".into(), "1".into()],
                vec!["2019".into(), "Female".into(), "2".into()],
                vec!["2019".into(), "Male".into(), "".into()],
                vec!["2019".into(), "".into(), "3".into()],
            ],
        };
        let cats = category_values(&table);
        assert_eq!(cats.len(), 1);
        let metric: Vec<_> = cats["Metric"].iter().map(String::as_str).collect();
        assert_eq!(metric, vec!["Female", "Male"]);
    }

    #[test]
    fn classify_leaves_out_untitled_tables() {
        let mut tables = BTreeMap::new();
        for name in ["Alcohol_affordability_2019", "notes"] {
            tables.insert(
                name.to_string(),
                RawTable {
                    name: name.to_string(),
                    headers: vec!["Year".into()],
                    rows: vec![],
                },
            );
        }
        let titles = classify(&tables);
        assert_eq!(titles.len(), 1);
        assert_eq!(titles["Alcohol_affordability_2019"], "Alcohol affordability");
    }
}
