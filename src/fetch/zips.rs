use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;
use url::Url;

/// Download the given ZIP URL into memory. The archive reader needs to seek,
/// so the whole body is buffered.
pub async fn download_zip(client: &Client, url: &Url) -> Result<Vec<u8>> {
    let resp = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?;
    let bytes = resp
        .bytes()
        .await
        .with_context(|| format!("Reading body from {}", url))?;
    info!(url = %url, bytes = bytes.len(), "downloaded");
    Ok(bytes.to_vec())
}
