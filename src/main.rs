// src/main.rs
// =============================================================================
// Entry point of pathspider.
//
// What happens here:
// 1. Parse command-line arguments and build the run settings
// 2. Start logging and the findings reporter
// 3. Start the crawl, seed it with the target URL and wait until no work is
//    left
// 4. Print the summary and exit (0 = finished, 2 = error)
// =============================================================================

mod checker;
mod cli;
mod config;
mod crawl;
mod logging;
mod report;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use checker::{
    Collaborators, FileWordlist, HtmlLinkExtractor, HttpEvaluator, UuidTokens, WordSource,
};
use cli::Cli;
use config::Settings;
use crawl::Crawl;
use logging::LogSink;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli)?;

    logging::init(settings.config.debug);
    let (log, log_rx) = LogSink::channel();
    let writer = logging::spawn_writer(log_rx);

    let words = settings.wordlist.as_ref().map(|path| {
        Arc::new(FileWordlist::new(path.clone(), log.clone())) as Arc<dyn WordSource>
    });
    let collaborators = Collaborators {
        evaluator: Arc::new(HttpEvaluator::new(&settings.http)?),
        links: Arc::new(HtmlLinkExtractor::new()),
        words,
        tokens: Arc::new(UuidTokens),
    };

    let (findings_tx, findings_rx) = report::channel();
    let reporter = report::spawn_reporter(findings_rx, settings.json);

    log.info(format!("Crawling {}", settings.target.root));
    let crawl = Crawl::start(
        settings.config.clone(),
        settings.target.clone(),
        collaborators,
        log.clone(),
        findings_tx,
    );
    crawl.seed(settings.target.root.as_str());

    let tested = crawl.wait().await;
    let findings = reporter.await?;

    log.info(format!("Finished, {} URL(s) tested", tested));
    drop(log);
    writer.await?;

    report::print_summary(&findings, tested, settings.json)?;
    Ok(0)
}
