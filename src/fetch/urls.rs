// src/fetch/urls.rs
use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::trace;
use url::Url;

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})").expect("year pattern should be valid"));

/// Every link on `html` that points exactly one path segment below `catalog`,
/// e.g. `.../statistics-on-alcohol/2020`.
pub fn publication_links(catalog: &Url, html: &str) -> Vec<Url> {
    let selector = Selector::parse("a[href]").expect("CSS selector for links should be valid");
    let prefix = format!("{}/", catalog.path().trim_end_matches('/'));

    let mut links: Vec<Url> = Vec::new();
    for href in Html::parse_document(html)
        .select(&selector)
        .filter_map(|e| e.value().attr("href"))
    {
        let Ok(mut url) = catalog.join(href) else {
            continue;
        };
        url.set_fragment(None);
        url.set_query(None);
        if url.host_str() != catalog.host_str() {
            continue;
        }
        let Some(rest) = url.path().strip_prefix(&prefix) else {
            continue;
        };
        let rest = rest.trim_end_matches('/');
        if rest.is_empty() || rest.contains('/') {
            continue;
        }
        trace!(url = %url, "publication link");
        if !links.contains(&url) {
            links.push(url);
        }
    }
    links
}

/// Year a publication covers, from the first four-digit run of its last path segment.
pub fn publication_year(url: &Url) -> Option<u32> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    YEAR.captures(segment)?[1].parse().ok()
}

/// The most recent publication linked from the catalog page.
pub fn latest_publication_url(catalog: &Url, html: &str) -> Result<Url> {
    let mut best: Option<(u32, Url)> = None;
    for url in publication_links(catalog, html) {
        let Some(year) = publication_year(&url) else {
            continue;
        };
        if best.as_ref().map_or(true, |(y, _)| year > *y) {
            best = Some((year, url));
        }
    }
    best.map(|(_, url)| url)
        .ok_or_else(|| anyhow!("no dated publications linked from {}", catalog))
}

/// First `.zip` link on a publication page.
pub fn zip_distribution_url(page: &Url, html: &str) -> Result<Url> {
    let selector =
        Selector::parse(r#"a[href$=".zip"]"#).expect("CSS selector for ZIP links should be valid");
    Html::parse_document(html)
        .select(&selector)
        .filter_map(|e| e.value().attr("href"))
        .find_map(|href| page.join(href).ok())
        .ok_or_else(|| anyhow!("no zip distribution on {}", page))
}

/// Trimmed text of the page's first `<h1>`.
pub fn page_title(html: &str) -> Option<String> {
    let selector = Selector::parse("h1").expect("CSS selector for h1 should be valid");
    let doc = Html::parse_document(html);
    let h1 = doc.select(&selector).next()?;
    let text = h1.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}
