// src/output/metadata.rs
//
// Dataset catalog record, serialized as a TriG named graph.

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

use super::write_atomic;
use crate::config::{
    DATASET_FAMILY, DATASET_PREFIX, DATASET_THEME, GSS_BASE_URI, PUBLISHER_URI,
};
use crate::fetch::Publication;

/// Descriptions of the known tables, keyed by lowercase title.
const COMMENTS: &[(&str, &str)] = &[
    (
        "prescription items community",
        "Number of prescription items, net ingredient cost and average net ingredient cost per item of drugs prescribed, for the treatment of alcohol dependence, dispensed in the community, England.",
    ),
    (
        "prescription items region",
        "Number of prescription items and prescription items per 100,000 population, for the treatment of alcohol dependence, prescribed in primary care and dispensed in the community, by Commissioning Region and Area Team, England.",
    ),
    (
        "alcohol specific deaths",
        "Alcohol-related deaths by gender, England.",
    ),
    (
        "alcohol affordability",
        "Indices of alcohol price, retail prices, alcohol price index relative to retail prices index (all items), real household disposable income, real disposable income per adult and affordability of alcohol, United Kingdom.",
    ),
    (
        "household expenditure alcohol",
        "Household expenditure on off trade alcohol at current prices, United Kingdom.",
    ),
];

pub fn comment_for(title: &str) -> Option<&'static str> {
    let key = title.to_lowercase();
    COMMENTS
        .iter()
        .find(|(t, _)| *t == key)
        .map(|(_, comment)| *comment)
}

/// `gss_data/health/nhs-statistics-on-alcohol-england/<slug>`
pub fn dataset_id(slug: &str) -> String {
    format!("{}/{}", DATASET_PREFIX, slug)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetMetadata {
    pub id: String,
    pub title: String,
    pub comment: Option<&'static str>,
    pub family: &'static str,
    pub theme: &'static str,
    pub landing_page: Option<String>,
    pub source: Option<String>,
    pub modified: DateTime<Utc>,
}

impl DatasetMetadata {
    pub fn new(
        title: &str,
        slug: &str,
        publication: Option<&Publication>,
        modified: DateTime<Utc>,
    ) -> Self {
        Self {
            id: dataset_id(slug),
            title: title.to_string(),
            comment: comment_for(title),
            family: DATASET_FAMILY,
            theme: DATASET_THEME,
            landing_page: publication.map(|p| p.landing_page.to_string()),
            source: publication.map(|p| p.distribution.to_string()),
            modified,
        }
    }

    pub fn graph_uri(&self) -> String {
        format!("{}graph/{}", GSS_BASE_URI, self.id)
    }

    pub fn dataset_uri(&self) -> String {
        format!("{}data/{}", GSS_BASE_URI, self.id)
    }

    /// Serialize the catalog record as TriG.
    pub fn to_trig(&self) -> String {
        let mut out = String::new();
        for (prefix, ns) in [
            ("dcat", "http://www.w3.org/ns/dcat#"),
            ("dct", "http://purl.org/dc/terms/"),
            ("gdp", "http://gss-data.org.uk/def/gdp#"),
            ("pmdcat", "http://publishmydata.com/pmdcat#"),
            ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
            ("xsd", "http://www.w3.org/2001/XMLSchema#"),
        ] {
            let _ = writeln!(out, "@prefix {}: <{}> .", prefix, ns);
        }
        out.push('\n');

        let title = literal(&self.title);
        let mut props = vec![
            ("a", "pmdcat:Dataset".to_string()),
            ("rdfs:label", format!("{}@en", title)),
            ("dct:title", format!("{}@en", title)),
        ];
        if let Some(comment) = self.comment {
            props.push(("rdfs:comment", format!("{}@en", literal(comment))));
        }
        props.push((
            "dcat:theme",
            format!(
                "<{}def/concept/statistics-authority-themes/{}>",
                GSS_BASE_URI, self.theme
            ),
        ));
        props.push(("gdp:family", format!("gdp:{}", self.family)));
        if let Some(page) = &self.landing_page {
            props.push(("dcat:landingPage", format!("<{}>", page)));
        }
        if let Some(source) = &self.source {
            props.push(("dct:source", format!("<{}>", source)));
        }
        props.push(("dct:publisher", format!("<{}>", PUBLISHER_URI)));
        props.push((
            "dct:modified",
            format!(
                "{}^^xsd:dateTime",
                literal(&self.modified.to_rfc3339_opts(SecondsFormat::Secs, true))
            ),
        ));
        props.push(("pmdcat:graph", format!("<{}>", self.graph_uri())));
        props.push((
            "pmdcat:datasetContents",
            format!("<{}#dataset>", self.dataset_uri()),
        ));

        let _ = writeln!(out, "<{}/metadata> {{", self.graph_uri());
        let _ = writeln!(out, "    <{}-catalog-entry>", self.dataset_uri());
        let last = props.len() - 1;
        for (i, (pred, obj)) in props.iter().enumerate() {
            let end = if i == last { " ." } else { " ;" };
            let _ = writeln!(out, "        {} {}{}", pred, obj, end);
        }
        out.push_str("}\n");
        out
    }
}

/// Quoted Turtle string literal.
fn literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn write_metadata(meta: &DatasetMetadata, path: &Path) -> Result<()> {
    write_atomic(path, meta.to_trig().as_bytes())?;
    debug!(path = %path.display(), id = %meta.id, "wrote metadata");
    Ok(())
}
