// src/crawl/probe.rs
// =============================================================================
// Tests a single URL and fans out what it finds.
//
// 1. Evaluate the URL (the worker slot is held only for this step)
// 2. Drop it unless it was interesting, or --show-all is set
// 3. An interesting "/admin" is queued again as "/admin/"
// 4. Report the result
// 5. When spidering, queue every link found in the body
// 6. Resolve the unit; everything queued above carries its own
// =============================================================================

use std::sync::Arc;

use super::{Shared, Slot, WorkUnit};
use crate::report::Finding;

pub(crate) async fn run(shared: Arc<Shared>, url: String, depth: usize, unit: WorkUnit, slot: Slot) {
    let outcome = shared.collaborators.evaluator.evaluate(&url).await;
    slot.release();
    shared.target.record_tested();

    let evaluation = match outcome {
        Ok(evaluation) => evaluation,
        Err(e) => {
            shared.log.error(format!("{:#}", e));
            unit.resolve();
            return;
        }
    };

    if !evaluation.interesting && !shared.config.show_all {
        unit.resolve();
        return;
    }

    if evaluation.interesting && !url.ends_with('/') {
        shared.queue_raw(format!("{}/", url), depth);
    }

    let finding = Finding {
        url: url.clone(),
        depth,
        result: evaluation.summary,
    };
    if shared.findings.send(finding).await.is_err() {
        shared.log.error(format!("Reporter stopped, lost result for {}", url));
    }

    if !shared.config.no_spider && evaluation.interesting {
        for link in shared.collaborators.links.extract(&evaluation.body) {
            if shared.config.debug {
                shared.log.debug(format!("Found URL on page: {}", link));
            }
            shared.queue_raw(link, depth + 1);
        }
    }

    unit.resolve();
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why release the slot before reporting?
//    - The slot limits HTTP requests, not bookkeeping. Sending the finding
//      can wait on a full reporter channel and shouldn't block other probes
//
// 2. Why `depth + 1` only for spidered links?
//    - Depth counts how many pages we followed to get here; the "/" variant
//      is the same resource, not a new hop
// -----------------------------------------------------------------------------
