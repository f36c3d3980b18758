use anyhow::Result;
use alcoholscraper::{config, fetch, pipeline};
use chrono::Utc;
use reqwest::Client;
use std::{io::Cursor, path::Path};
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,alcoholscraper=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");
    let start = Instant::now();

    // ─── 2) fetch the latest publication ─────────────────────────────
    let client = Client::new();
    let (publication, archive) = fetch::fetch_latest(&client, config::SOURCE_URL).await?;
    info!(
        page = %publication.landing_page,
        bytes = archive.len(),
        "fetched {}",
        publication.title.as_deref().unwrap_or("publication")
    );

    // ─── 3) extract, transform, write, publish ───────────────────────
    let artifacts = pipeline::run_archive(
        Cursor::new(archive),
        Some(&publication),
        Path::new(config::OUT_DIR),
        Utc::now(),
    )?;
    for artifact in &artifacts {
        info!(title = %artifact.title, csv = %artifact.csv.display(), "output");
    }

    info!(tables = artifacts.len(), elapsed = ?start.elapsed(), "all done");
    Ok(())
}
