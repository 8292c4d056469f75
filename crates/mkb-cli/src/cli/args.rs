use clap::Parser;
use std::path::PathBuf;

use mkb_core::client::{BASE_URL, DEFAULT_DELAY_SECS, DEFAULT_TIMEOUT_SECS};
use mkb_core::scrape::DEFAULT_INDEX_PATH;

#[derive(Parser)]
#[command(
    name = "mkb-scraper",
    version,
    about = "MKB-10 catalogue scraper for stetoskop.info"
)]
pub struct CliArgs {
    /// Output file path for the pipe-delimited catalogue
    #[arg(short, long)]
    pub output: PathBuf,

    /// Seconds to pause between HTTP requests
    #[arg(long, default_value_t = DEFAULT_DELAY_SECS)]
    pub delay: f64,

    /// Base URL of the portal
    #[arg(long, default_value = BASE_URL)]
    pub base_url: String,

    /// Path of the category listing page
    #[arg(long, default_value = DEFAULT_INDEX_PATH)]
    pub index_path: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_required() {
        assert!(CliArgs::try_parse_from(["mkb-scraper"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["mkb-scraper", "-o", "katalog.txt"]).unwrap();
        assert_eq!(args.output, PathBuf::from("katalog.txt"));
        assert_eq!(args.delay, DEFAULT_DELAY_SECS);
        assert_eq!(args.base_url, BASE_URL);
        assert_eq!(args.index_path, DEFAULT_INDEX_PATH);
        assert_eq!(args.timeout, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_long_flags_override_defaults() {
        let args = CliArgs::try_parse_from([
            "mkb-scraper",
            "--output",
            "out.txt",
            "--delay",
            "1.5",
            "--base-url",
            "http://localhost:8080",
            "--index-path",
            "/mkb",
            "--timeout",
            "10",
        ])
        .unwrap();
        assert_eq!(args.output, PathBuf::from("out.txt"));
        assert_eq!(args.delay, 1.5);
        assert_eq!(args.base_url, "http://localhost:8080");
        assert_eq!(args.index_path, "/mkb");
        assert_eq!(args.timeout, 10);
    }

    #[test]
    fn test_negative_delay_parses_with_equals_form() {
        let args =
            CliArgs::try_parse_from(["mkb-scraper", "-o", "out.txt", "--delay=-1"]).unwrap();
        assert_eq!(args.delay, -1.0);
    }
}
