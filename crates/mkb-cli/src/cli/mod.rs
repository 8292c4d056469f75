//! Command line interface layer for the MKB-10 scraper.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that wires user-provided options
//! to the underlying `mkb_core` library: walk the category listing, collect
//! every diagnosis and write the sorted catalogue file.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
