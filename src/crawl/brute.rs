// src/crawl/brute.rs
// =============================================================================
// Brute-forces one directory against the wordlist.
//
// 1. Probe "<dir><random token>". If a path that cannot exist comes back
//    interesting, the server answers everything under this directory and
//    guessing is pointless, so stop here.
// 2. Take a directory slot. This caps how many directories are worked on
//    (and how many wordlist readers run) at once.
// 3. Stream the wordlist and queue a probe per word, or per word and
//    extension when extensions are set. Each probe waits for its own worker
//    slot, which keeps this loop from running ahead of the pool.
// =============================================================================

use std::sync::Arc;

use super::{probe, CrawlError, Shared, WorkUnit};
use crate::config::Target;

// Words buffered between the wordlist reader and this loop.
const WORD_QUEUE: usize = 300;

pub(crate) async fn run(shared: Arc<Shared>, dir: String, depth: usize, session: WorkUnit) {
    if let Err(e) = brute_force(&shared, &dir, depth).await {
        shared.log.error(e.to_string());
    }
    session.resolve();
}

async fn brute_force(shared: &Arc<Shared>, dir: &str, depth: usize) -> Result<(), CrawlError> {
    let Some(words) = shared.collaborators.words.clone() else {
        return Ok(());
    };

    if is_wildcard(shared, dir).await? {
        shared.log.info(format!(
            "Wildcard response detected, skipping dirbusting of {}",
            dir
        ));
        return Ok(());
    }

    if shared.config.debug && shared.dir_slots.available() == 0 {
        shared
            .log
            .debug(format!("Waiting for a directory slot: {}", dir));
    }
    let dir_slot = shared.dir_slots.acquire().await?;
    shared.log.info(format!("Dirbusting {}", dir));

    let mut queue = words.open(WORD_QUEUE);
    while let Some(word) = queue.recv().await {
        for url in word_urls(&shared.target, dir, &word) {
            if shared.target.is_blacklisted(&url) {
                shared
                    .log
                    .info(format!("Not testing blacklisted URL: {}", url));
                continue;
            }
            let slot = shared.workers.acquire().await?;
            let unit = shared.tracker.register();
            tokio::spawn(probe::run(shared.clone(), url, depth, unit, slot));
        }
    }

    dir_slot.release();
    shared.log.info(format!("Finished dirbusting: {}", dir));
    Ok(())
}

async fn is_wildcard(shared: &Shared, dir: &str) -> Result<bool, CrawlError> {
    let slot = shared.workers.acquire().await?;
    let url = format!("{}{}", dir, shared.collaborators.tokens.token());
    let outcome = shared.collaborators.evaluator.evaluate(&url).await;
    slot.release();

    match outcome {
        Ok(evaluation) => Ok(evaluation.interesting),
        Err(e) => {
            // Can't tell; go ahead with the wordlist.
            shared.log.error(format!("{:#}", e));
            Ok(false)
        }
    }
}

/// URLs to probe for one word under `dir`.
pub fn word_urls(target: &Target, dir: &str, word: &str) -> Vec<String> {
    if target.extensions_enabled() {
        target
            .extensions
            .iter()
            .map(|ext| format!("{}{}.{}", dir, word, ext))
            .collect()
    } else {
        vec![format!("{}{}", dir, word)]
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a wildcard response?
//    - Some servers answer 200 for any path (custom error pages, catch-all
//      routes); every guessed word would look like a hit
//
// 2. Why acquire the worker slot before spawning?
//    - Spawning first would create one task per word up front; waiting for
//      a slot here keeps the number of live tasks bounded
// -----------------------------------------------------------------------------
