// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every flag here ends up in `Config` (how the crawl behaves), `Target`
// (what is being crawled) or `HttpSettings` once `Settings::from_cli` has
// validated it.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pathspider",
    version = "0.1.0",
    about = "Recursively discover content on a web server",
    long_about = "pathspider probes a target host for paths, spiders HTML for new links and \
                  brute-forces every directory it finds against a wordlist."
)]
pub struct Cli {
    /// URL to start from (e.g., https://example.com/)
    pub url: String,

    /// Wordlist to brute-force directories with. Without it only spidering happens.
    #[arg(short, long)]
    pub wordlist: Option<PathBuf>,

    /// Extensions appended to every word, comma separated (e.g., php,bak,zip)
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Report every response, not just interesting ones
    #[arg(long)]
    pub show_all: bool,

    /// Don't extract links from response bodies
    #[arg(long)]
    pub no_spider: bool,

    /// Log every link found on a page
    #[arg(long)]
    pub debug: bool,

    /// Maximum number of requests in flight
    #[arg(short, long, default_value_t = 10)]
    pub threads: usize,

    /// Maximum number of directories brute-forced at the same time
    #[arg(long, default_value_t = 5)]
    pub max_dirs: usize,

    /// URL that must never be tested (repeatable)
    #[arg(long)]
    pub blacklist: Vec<String>,

    /// File with one blacklisted URL per line
    #[arg(long)]
    pub blacklist_file: Option<PathBuf>,

    /// Extra host that may be crawled besides the target (repeatable)
    #[arg(long)]
    pub whitelist: Vec<String>,

    /// Status codes that are never interesting, comma separated
    #[arg(long, value_delimiter = ',', default_value = "404")]
    pub bad_codes: Vec<u16>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = concat!("pathspider/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,

    /// Accept invalid TLS certificates (self-signed, expired, wrong host)
    #[arg(long)]
    pub insecure: bool,

    /// Print findings as JSON when the crawl finishes
    #[arg(long)]
    pub json: bool,
}
