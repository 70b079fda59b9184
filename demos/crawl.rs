//! Crawl a site and print each accepted page as it lands.
//!
//! Usage:
//!   cargo run --example crawl -- <start-url> [max-pages]
//!
//! The browser endpoint comes from the BROWSER_WS_URL environment variable
//! (default ws://browser:3000).

use anyhow::{anyhow, Context, Result};
use siteharvest::{crawl_pages, CrawlConfig, CrawlStats, PageRecord, PageSink, ProgressSink};

struct StdoutSink;

impl ProgressSink for StdoutSink {
    fn on_progress(&self, url: &str) -> Result<()> {
        println!("-> {url}");
        Ok(())
    }
}

impl PageSink for StdoutSink {
    fn on_page(&self, record: &PageRecord, stats: &CrawlStats) -> Result<()> {
        println!(
            "scraped {} ({} chars, {} scraped / {} discovered)",
            record.url,
            record.content.len(),
            stats.scraped,
            stats.discovered
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let start_url = args
        .next()
        .ok_or_else(|| anyhow!("usage: crawl <start-url> [max-pages]"))?;

    let mut builder = CrawlConfig::builder().start_url(start_url);
    if let Some(cap) = args.next() {
        let cap: usize = cap.parse().context("max-pages must be a number")?;
        builder = builder.max_pages(cap);
    }
    let config = builder.build()?;

    let pages = crawl_pages(config, StdoutSink, StdoutSink).await?;
    println!("done: {} pages", pages.len());
    Ok(())
}
