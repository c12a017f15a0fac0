// src/checker/html.rs
// =============================================================================
// This module pulls link strings out of HTML pages.
//
// We use the `scraper` crate to parse the page and CSS selectors to find
// every attribute that points somewhere: anchors, stylesheets, scripts,
// images, frames and form targets.
//
// Values are returned exactly as written in the page (absolute or relative).
// Turning them into canonical URLs on the target is the normalizer's job.
// =============================================================================

use scraper::{Html, Selector};

use super::LinkExtractor;

// (CSS selector, attribute holding the link)
const LINK_ATTRIBUTES: &[(&str, &str)] = &[
    ("a[href]", "href"),
    ("area[href]", "href"),
    ("link[href]", "href"),
    ("script[src]", "src"),
    ("img[src]", "src"),
    ("iframe[src]", "src"),
    ("frame[src]", "src"),
    ("form[action]", "action"),
];

pub struct HtmlLinkExtractor {
    selectors: Vec<(Selector, &'static str)>,
}

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        let selectors = LINK_ATTRIBUTES
            .iter()
            .filter_map(|(css, attr)| Selector::parse(css).ok().map(|s| (s, *attr)))
            .collect();
        Self { selectors }
    }
}

impl Default for HtmlLinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, body: &str) -> Vec<String> {
        let document = Html::parse_document(body);
        let mut links = Vec::new();

        for (selector, attr) in &self.selectors {
            for element in document.select(selector) {
                if let Some(value) = element.value().attr(attr) {
                    let value = value.trim();
                    if is_followable(value) {
                        links.push(value.to_string());
                    }
                }
            }
        }

        links
    }
}

// Skips empty values, in-page anchors and non-HTTP schemes
fn is_followable(link: &str) -> bool {
    if link.is_empty() || link.starts_with('#') {
        return false;
    }
    let lower = link.to_ascii_lowercase();
    !["mailto:", "tel:", "javascript:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}
