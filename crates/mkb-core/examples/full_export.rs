use std::path::Path;

use mkb_core::{write_catalog, MkbScraper};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scraper = MkbScraper::new()?;

    println!("🔍 Preuzimam kompletan MKB-10 katalog...\n");

    let report = scraper.scrape().await?;

    println!("Stranica spiska:      {}", report.listing_pages);
    println!("Kategorija:           {}", report.categories);
    println!("Preskočenih:          {}", report.skipped_categories);
    println!("Uklonjenih duplikata: {}", report.duplicates);
    println!("Dijagnoza:            {}", report.entries.len());

    let output = Path::new("mkb10.txt");
    write_catalog(output, &report.entries).await?;

    println!("\n✅ Katalog sačuvan u {}", output.display());
    Ok(())
}
