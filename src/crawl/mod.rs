// src/crawl/mod.rs
// =============================================================================
// The crawl pipeline.
//
//   seed ─▶ Normalizer ─▶ Dispatcher ─▶ Probe ─▶ findings (reporter)
//              ▲               │          │
//              │               ▼          │ links, "/"-variants
//              │          Brute-forcer ─▶ Probe (one per word/extension)
//              └──────────────────────────┘
//
// - Normalizer:   canonicalizes and deduplicates raw URLs, expands ancestor
//                 directories, feeds the dispatcher
// - Dispatcher:   applies the blacklist and launches probes (and
//                 brute-forcers for directories) under the worker pool
// - Probe:        tests one URL, reports it, spiders the body
// - Brute-forcer: wildcard check, then one probe per wordlist entry
// - Tracker:      counts pending work; zero means the crawl is done
//
// Normalizer and dispatcher each run as a single loop that owns its state.
// Probes and brute-forcers run as independent tasks.
// =============================================================================

mod brute;
mod dispatcher;
mod error;
mod normalizer;
mod pool;
mod probe;
mod tracker;

#[cfg(test)]
mod testing;

pub use error::CrawlError;
pub use pool::{Pool, Slot};
pub use tracker::{Tracker, WorkUnit};

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::checker::Collaborators;
use crate::config::{Config, Target};
use crate::logging::LogSink;
use crate::report::Finding;

/// A URL waiting for the dispatcher.
#[derive(Debug)]
pub struct Candidate {
    pub url: String,
    pub depth: usize,
    pub unit: WorkUnit,
}

/// A URL string as discovered, before canonicalization.
#[derive(Debug)]
pub struct RawUrl {
    pub url: String,
    pub depth: usize,
    pub unit: WorkUnit,
}

/// State every pipeline component can see. Read-only apart from the
/// counters inside `tracker` and `target`.
pub(crate) struct Shared {
    pub config: Config,
    pub target: Target,
    pub tracker: Tracker,
    pub workers: Pool,
    pub dir_slots: Pool,
    pub collaborators: Collaborators,
    pub log: LogSink,
    pages: mpsc::UnboundedSender<Candidate>,
    raw_urls: mpsc::UnboundedSender<RawUrl>,
    pub findings: mpsc::Sender<Finding>,
}

impl Shared {
    /// Registers a unit and hands the URL to the dispatcher.
    pub fn queue_page(&self, url: String, depth: usize) {
        let unit = self.tracker.register();
        // If the dispatcher is gone the candidate (and its unit) is dropped.
        let _ = self.pages.send(Candidate { url, depth, unit });
    }

    /// Registers a unit and hands the URL to the normalizer.
    pub fn queue_raw(&self, url: String, depth: usize) {
        let unit = self.tracker.register();
        let _ = self.raw_urls.send(RawUrl { url, depth, unit });
    }
}

pub(crate) struct Channels {
    pub pages: mpsc::UnboundedReceiver<Candidate>,
    pub raw_urls: mpsc::UnboundedReceiver<RawUrl>,
}

pub(crate) fn build(
    config: Config,
    target: Target,
    collaborators: Collaborators,
    log: LogSink,
    findings: mpsc::Sender<Finding>,
) -> (Arc<Shared>, Channels) {
    let (pages_tx, pages) = mpsc::unbounded_channel();
    let (raw_tx, raw_urls) = mpsc::unbounded_channel();

    let shared = Shared {
        workers: Pool::new("worker", config.threads),
        dir_slots: Pool::new("directory", config.max_dirs),
        config,
        target,
        tracker: Tracker::new(),
        collaborators,
        log,
        pages: pages_tx,
        raw_urls: raw_tx,
        findings,
    };

    (Arc::new(shared), Channels { pages, raw_urls })
}

/// A running crawl.
pub struct Crawl {
    shared: Arc<Shared>,
    loops: Vec<JoinHandle<()>>,
}

impl Crawl {
    /// Spawns the dispatcher and normalizer loops. Nothing is probed until
    /// `seed` is called.
    pub fn start(
        config: Config,
        target: Target,
        collaborators: Collaborators,
        log: LogSink,
        findings: mpsc::Sender<Finding>,
    ) -> Self {
        let (shared, channels) = build(config, target, collaborators, log, findings);
        shared.log.debug(format!(
            "{} worker slot(s), {} directory slot(s)",
            shared.workers.capacity(),
            shared.dir_slots.capacity()
        ));

        let loops = vec![
            tokio::spawn(dispatcher::run(shared.clone(), channels.pages)),
            tokio::spawn(normalizer::Normalizer::new(shared.clone()).run(channels.raw_urls)),
        ];

        Self { shared, loops }
    }

    /// Feeds a starting URL through the normalizer.
    pub fn seed(&self, url: &str) {
        self.shared.queue_raw(url.to_string(), 0);
    }

    /// Waits until no work is pending, stops the loops and returns the number
    /// of URLs tested.
    pub async fn wait(self) -> u64 {
        self.shared.tracker.wait_idle().await;

        for handle in &self.loops {
            handle.abort();
        }
        for handle in self.loops {
            // Cancelled is the expected outcome here.
            let _ = handle.await;
        }

        self.shared.target.tested()
    }
}
