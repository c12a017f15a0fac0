// src/crawl/error.rs
// =============================================================================
// Errors raised inside the crawl pipeline.
//
// None of these stop the crawl. Each one is logged by the component that hit
// it and the unit of work it was carrying is resolved.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// A discovered string could not be parsed as a URL.
    #[error("URL Parse Failed: {url} {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A slot pool was closed while someone was waiting on it.
    #[error("{0} pool is closed")]
    PoolClosed(&'static str),
}
