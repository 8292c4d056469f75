use tracing::info;

use mkb_core::{write_catalog, ClientConfig, MkbScraper, ScraperConfig};

use super::args::CliArgs;
use super::errors::AppError;

/// Runs the full scrape for the given arguments and writes the catalogue.
///
/// Validates the delay before any network traffic, walks the category
/// listing, aggregates the diagnoses and writes them to `args.output`.
pub async fn run(args: CliArgs) -> Result<(), AppError> {
    if !args.delay.is_finite() || args.delay < 0.0 {
        return Err(AppError::InvalidDelay { delay: args.delay });
    }

    info!("Scraping {} (delay {}s)", args.base_url, args.delay);

    let config = ScraperConfig {
        client: ClientConfig {
            base_url: args.base_url,
            delay_secs: args.delay,
            timeout_secs: args.timeout,
        },
        index_path: args.index_path,
    };
    let scraper = MkbScraper::with_config(config)?;

    let report = scraper.scrape().await?;

    write_catalog(&args.output, &report.entries).await?;

    Ok(())
}
