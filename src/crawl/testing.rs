// src/crawl/testing.rs
// =============================================================================
// Fakes and helpers shared by the crawl tests.
//
// - ScriptedEvaluator: answers from a table and records every call
// - VecWords / SlowWords: in-memory word sources
// - run_crawl: runs a whole crawl and collects findings, logs and the
//   tested-count
// =============================================================================

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

use super::Crawl;
use crate::checker::{
    Collaborators, Evaluation, Evaluator, HtmlLinkExtractor, ResponseSummary, TokenSource,
    WordSource,
};
use crate::config::{Config, Target};
use crate::logging::{LogLine, LogSink};
use crate::report::Finding;

pub const TOKEN: &str = "RANDOMTOKEN";

#[derive(Default)]
struct Script {
    pages: HashMap<String, String>,
    wildcard: bool,
    delay: Option<Duration>,
    calls: Vec<String>,
}

/// Answers from a fixed table of interesting URLs and records every call.
#[derive(Clone, Default)]
pub struct ScriptedEvaluator {
    script: Arc<Mutex<Script>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl ScriptedEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` interesting, serving `body`.
    pub fn page(self, url: &str, body: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .pages
            .insert(url.to_string(), body.to_string());
        self
    }

    /// Every URL is interesting.
    pub fn wildcard(self) -> Self {
        self.script.lock().unwrap().wildcard = true;
        self
    }

    pub fn delay(self, delay: Duration) -> Self {
        self.script.lock().unwrap().delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Evaluator for ScriptedEvaluator {
    async fn evaluate(&self, url: &str) -> anyhow::Result<Evaluation> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (page, delay) = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(url.to_string());
            let page = match script.pages.get(url) {
                Some(body) => Some(body.clone()),
                None if script.wildcard => Some(String::new()),
                None => None,
            };
            (page, script.delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        Ok(match page {
            Some(body) => Evaluation {
                summary: ResponseSummary {
                    status: 200,
                    ..ResponseSummary::default()
                },
                body,
                interesting: true,
            },
            None => Evaluation {
                summary: ResponseSummary {
                    status: 404,
                    ..ResponseSummary::default()
                },
                body: String::new(),
                interesting: false,
            },
        })
    }
}

pub struct VecWords(pub Vec<String>);

impl WordSource for VecWords {
    fn open(&self, capacity: usize) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(capacity);
        let words = self.0.clone();
        tokio::spawn(async move {
            for word in words {
                if tx.send(word).await.is_err() {
                    break;
                }
            }
        });
        rx
    }
}

/// Feeds words with a pause before each one and tracks how many lists are
/// being read at the same time.
#[derive(Clone, Default)]
pub struct SlowWords {
    words: Vec<String>,
    pause: Duration,
    open: Arc<AtomicUsize>,
    max_open: Arc<AtomicUsize>,
    opened: Arc<AtomicUsize>,
}

impl SlowWords {
    pub fn new(words: &[&str], pause: Duration) -> Self {
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
            pause,
            ..Self::default()
        }
    }

    pub fn max_open(&self) -> usize {
        self.max_open.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl WordSource for SlowWords {
    fn open(&self, capacity: usize) -> mpsc::Receiver<String> {
        let now = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_open.fetch_max(now, Ordering::SeqCst);
        self.opened.fetch_add(1, Ordering::SeqCst);

        let (tx, rx) = mpsc::channel(capacity);
        let words = self.words.clone();
        let pause = self.pause;
        let open = self.open.clone();
        tokio::spawn(async move {
            for word in words {
                tokio::time::sleep(pause).await;
                if tx.send(word).await.is_err() {
                    break;
                }
            }
            // Counted as closed before the reader can see the end of the
            // list, so the count never runs ahead of the held slots.
            open.fetch_sub(1, Ordering::SeqCst);
        });
        rx
    }
}

pub struct FixedToken;

impl TokenSource for FixedToken {
    fn token(&self) -> String {
        TOKEN.to_string()
    }
}

pub fn target(url: &str) -> Target {
    Target::new(Url::parse(url).unwrap()).unwrap()
}

pub fn collaborators(evaluator: ScriptedEvaluator, words: Option<&[&str]>) -> Collaborators {
    Collaborators {
        evaluator: Arc::new(evaluator),
        links: Arc::new(HtmlLinkExtractor::new()),
        words: words.map(|words| {
            Arc::new(VecWords(words.iter().map(|w| w.to_string()).collect()))
                as Arc<dyn WordSource>
        }),
        tokens: Arc::new(FixedToken),
    }
}

pub fn set(urls: &[&str]) -> HashSet<String> {
    urls.iter().map(|u| u.to_string()).collect()
}

pub struct Outcome {
    pub findings: Vec<Finding>,
    pub logs: Vec<LogLine>,
    pub tested: u64,
}

impl Outcome {
    pub fn found_urls(&self) -> HashSet<String> {
        self.findings.iter().map(|f| f.url.clone()).collect()
    }
}

/// Runs a whole crawl against the fakes and collects what came out.
pub async fn run_crawl(
    config: Config,
    target: Target,
    collaborators: Collaborators,
    seeds: &[&str],
) -> Outcome {
    let (log, mut log_rx) = LogSink::channel();
    let (findings_tx, mut findings_rx) = mpsc::channel(16);

    let collector = tokio::spawn(async move {
        let mut findings = Vec::new();
        while let Some(finding) = findings_rx.recv().await {
            findings.push(finding);
        }
        findings
    });

    let crawl = Crawl::start(config, target, collaborators, log, findings_tx);
    for seed in seeds {
        crawl.seed(seed);
    }

    let tested = tokio::time::timeout(Duration::from_secs(5), crawl.wait())
        .await
        .expect("crawl should go idle");

    let findings = tokio::time::timeout(Duration::from_secs(5), collector)
        .await
        .expect("findings channel should close")
        .unwrap();

    let mut logs = Vec::new();
    while let Ok(line) = log_rx.try_recv() {
        logs.push(line);
    }

    Outcome {
        findings,
        logs,
        tested,
    }
}
