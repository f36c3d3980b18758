// src/fetch/mod.rs
pub mod urls;
pub mod zips;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

/// The publication a run was sourced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// Page of the publication itself, below the catalog landing page.
    pub landing_page: Url,
    pub title: Option<String>,
    /// The zip-typed distribution of the publication.
    pub distribution: Url,
}

async fn get_text(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching text from {}", url);
    client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))
}

/// Resolve the catalog page to its most recent publication and that
/// publication's zip distribution.
#[tracing::instrument(level = "info", skip(client))]
pub async fn resolve_latest(client: &Client, catalog: &str) -> Result<Publication> {
    let catalog = Url::parse(catalog).with_context(|| format!("parsing catalog URL {}", catalog))?;
    let html = get_text(client, &catalog).await?;
    let landing_page = urls::latest_publication_url(&catalog, &html)?;
    info!(page = %landing_page, "latest publication");

    let html = get_text(client, &landing_page).await?;
    let distribution = urls::zip_distribution_url(&landing_page, &html)?;
    let title = urls::page_title(&html);
    info!(zip = %distribution, title = ?title, "zip distribution");

    Ok(Publication {
        landing_page,
        title,
        distribution,
    })
}

/// Resolve the latest publication and download its archive into memory.
pub async fn fetch_latest(client: &Client, catalog: &str) -> Result<(Publication, Vec<u8>)> {
    let publication = resolve_latest(client, catalog).await?;
    let bytes = zips::download_zip(client, &publication.distribution).await?;
    Ok((publication, bytes))
}
