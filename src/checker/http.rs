// src/checker/http.rs
// =============================================================================
// Decides whether a URL exists on the target by making HTTP requests.
//
// How a URL is evaluated:
// 1. HEAD request (cheap, no body download)
// 2. The status is interesting unless it is one of the configured bad codes
//    (404 by default)
// 3. Only for interesting URLs, a GET request fetches the body so the
//    spider can look for more links in it
//
// Redirects are not followed. A 301 from /admin to /admin/ is a finding on
// its own and the Location header is kept in the summary.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, LOCATION};
use reqwest::{redirect, Client, Response};

use super::{Evaluation, Evaluator, ResponseSummary};
use crate::config::HttpSettings;

pub struct HttpEvaluator {
    client: Client,
    bad_codes: Vec<u16>,
}

impl HttpEvaluator {
    /// Builds one client for the whole crawl so connections get pooled.
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .redirect(redirect::Policy::none())
            .user_agent(settings.user_agent.as_str())
            .danger_accept_invalid_certs(settings.insecure)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            bad_codes: settings.bad_codes.clone(),
        })
    }

    fn is_interesting(&self, status: u16) -> bool {
        !self.bad_codes.contains(&status)
    }
}

#[async_trait]
impl Evaluator for HttpEvaluator {
    async fn evaluate(&self, url: &str) -> Result<Evaluation> {
        let head = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let summary = summarize(&head);
        if !self.is_interesting(summary.status) {
            return Ok(Evaluation {
                summary,
                body: String::new(),
                interesting: false,
            });
        }

        // The HEAD answer already decided the outcome; a failed GET only
        // costs us the links on this page.
        let body = match self.client.get(url).send().await {
            Ok(response) => response.text().await.unwrap_or_default(),
            Err(_) => String::new(),
        };

        Ok(Evaluation {
            summary,
            body,
            interesting: true,
        })
    }
}

fn summarize(response: &Response) -> ResponseSummary {
    let headers = response.headers();
    ResponseSummary {
        status: response.status().as_u16(),
        content_length: headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok()),
        location: headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    }
}

// Turns a reqwest error into a short, readable reason.
fn categorize_error(url: &str, error: reqwest::Error) -> anyhow::Error {
    let error_string = error.to_string();

    let reason = if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "Could not resolve hostname".to_string()
        } else {
            "Connection failed".to_string()
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "SSL certificate error".to_string()
    } else {
        error_string
    };

    anyhow!("{}: {}", url, reason)
}
