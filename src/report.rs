// src/report.rs
// =============================================================================
// Receives confirmed results from the crawl and prints them.
//
// Findings are printed to stdout the moment they arrive, so a long crawl
// shows progress. With --json nothing is printed until the end, when all
// findings are written as one JSON array.
// =============================================================================

use anyhow::Result;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::checker::ResponseSummary;

// Probes wait once this many findings are queued and not yet printed.
const FINDINGS_QUEUE: usize = 256;

/// A URL the crawl considers worth reporting.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub url: String,
    pub depth: usize,
    #[serde(flatten)]
    pub result: ResponseSummary,
}

pub fn channel() -> (mpsc::Sender<Finding>, mpsc::Receiver<Finding>) {
    mpsc::channel(FINDINGS_QUEUE)
}

/// Spawns the reporter. It finishes, returning everything it received,
/// once the crawl has dropped every sender.
pub fn spawn_reporter(mut rx: mpsc::Receiver<Finding>, json: bool) -> JoinHandle<Vec<Finding>> {
    tokio::spawn(async move {
        let mut findings = Vec::new();
        while let Some(finding) = rx.recv().await {
            if !json {
                println!("{}", format_finding(&finding));
            }
            findings.push(finding);
        }
        findings
    })
}

pub fn print_summary(findings: &[Finding], tested: u64, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(findings)?);
        return Ok(());
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ Found: {}", findings.len());
    println!("   📋 Tested: {}", tested);
    Ok(())
}

fn format_finding(finding: &Finding) -> String {
    match &finding.result.location {
        Some(location) => format!(
            "{:<5} {} -> {}",
            finding.result.status, finding.url, location
        ),
        None => format!("{:<5} {}", finding.result.status, finding.url),
    }
}
