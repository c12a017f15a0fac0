// src/crawl/dispatcher.rs
// =============================================================================
// Launches work for each candidate.
//
// - Blacklisted URLs are logged and dropped
// - Everything else gets a probe, started only once a worker slot is free,
//   so a busy pool slows the dispatcher down
// - Directory URLs ("/" at the end) also get a brute-forcer when the crawl
//   has a word source
//
// The candidate's unit moves into the probe. The brute-forcer gets a unit of
// its own, registered before the probe starts, so the crawl cannot look
// finished while it is still reading words.
// =============================================================================

use std::sync::Arc;
use tokio::sync::mpsc;

use super::{brute, probe, Candidate, Shared};

pub(crate) async fn run(shared: Arc<Shared>, mut pages: mpsc::UnboundedReceiver<Candidate>) {
    while let Some(page) = pages.recv().await {
        if shared.target.is_blacklisted(&page.url) {
            shared
                .log
                .info(format!("Not testing blacklisted URL: {}", page.url));
            page.unit.resolve();
            continue;
        }

        let slot = match shared.workers.acquire().await {
            Ok(slot) => slot,
            Err(e) => {
                shared.log.error(e.to_string());
                return;
            }
        };

        let Candidate { url, depth, unit } = page;
        let brute_force = shared.collaborators.words.is_some() && url.ends_with('/');
        // The session must be counted while the candidate's unit is still
        // held, or a fast probe could drop the count to zero first.
        let session = brute_force.then(|| shared.tracker.register());

        tokio::spawn(probe::run(shared.clone(), url.clone(), depth, unit, slot));

        if let Some(session) = session {
            tokio::spawn(brute::run(shared.clone(), url, depth, session));
        }
    }
}
