use mkb_core::MkbScraper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scraper = MkbScraper::new()?;

    println!("🔍 Učitavam spisak kategorija...\n");

    let categories = scraper.categories().await?;

    println!("Pronađeno {} kategorija:", categories.len());
    for (i, category) in categories.iter().take(10).enumerate() {
        println!("  {}. {} ({})", i + 1, category.name, category.path);
    }
    if categories.len() > 10 {
        println!("  ... i još {} kategorija", categories.len() - 10);
    }

    if let Some(first) = categories.first() {
        println!("\n📋 Dijagnoze iz kategorije '{}':\n", first.name);

        let entries = scraper.category_entries(first).await?;

        for entry in entries.iter().take(10) {
            let latin = if entry.latin.is_empty() {
                "—"
            } else {
                entry.latin.as_str()
            };
            println!("  {} {} [{}]", entry.code, entry.serbian, latin);
        }
        if entries.len() > 10 {
            println!("  ... i još {} dijagnoza", entries.len() - 10);
        }
        println!("\nUkupno {} dijagnoza u ovoj kategoriji.", entries.len());
    }

    Ok(())
}
