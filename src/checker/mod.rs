// src/checker/mod.rs
// =============================================================================
// The crawl core does not talk to the network or the filesystem itself. It
// goes through four narrow collaborators, defined here as traits:
//
// - Evaluator:     request a URL and decide whether the response is interesting
// - LinkExtractor: pull link strings out of a response body
// - WordSource:    stream a wordlist into a bounded queue
// - TokenSource:   make a path segment that should not exist on the server
//
// Submodules hold the real implementations. Tests swap in fakes.
// =============================================================================

mod html;
mod http;
mod token;
mod wordlist;

pub use html::HtmlLinkExtractor;
pub use http::HttpEvaluator;
pub use token::UuidTokens;
pub use wordlist::FileWordlist;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;

/// What the evaluator saw. Carried through to the reporter untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseSummary {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub summary: ResponseSummary,
    pub body: String,
    pub interesting: bool,
}

/// Must be safe to call from many probes at once.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(&self, url: &str) -> anyhow::Result<Evaluation>;
}

pub trait LinkExtractor: Send + Sync {
    fn extract(&self, body: &str) -> Vec<String>;
}

pub trait WordSource: Send + Sync {
    /// Starts producing words. The receiver yields `None` once the list is
    /// exhausted.
    fn open(&self, capacity: usize) -> mpsc::Receiver<String>;
}

pub trait TokenSource: Send + Sync {
    fn token(&self) -> String;
}

/// The set of collaborators a crawl runs with. Without a word source no
/// directory is brute-forced.
#[derive(Clone)]
pub struct Collaborators {
    pub evaluator: Arc<dyn Evaluator>,
    pub links: Arc<dyn LinkExtractor>,
    pub words: Option<Arc<dyn WordSource>>,
    pub tokens: Arc<dyn TokenSource>,
}
