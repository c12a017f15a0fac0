// src/crawl/normalizer.rs
// =============================================================================
// Turns discovered URL strings into canonical candidates for the dispatcher.
//
// For every raw URL:
// 1. Skip it if this exact string was seen before (cheap fast path)
// 2. Canonicalize: parse, default the host to the target, rebuild as
//    `scheme://host/clean/path`, keeping a trailing "/" if there was one
// 3. Forward it if it is new and the host is in scope
// 4. Forward every directory above it too ("/", "/a/", "/a/b/" for
//    "/a/b/c"), so each level gets probed and brute-forced
//
// The normalizer is a single loop that owns both seen-sets. Nothing else
// touches them, so they need no locking, and because URLs are handled one at
// a time the canonical check is strict: a canonical URL is forwarded at most
// once per crawl.
// =============================================================================

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

use super::{CrawlError, RawUrl, Shared};
use crate::config::{authority, Target};

/// A canonicalized URL and the pieces it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    /// `scheme://host/path`
    pub url: String,
    /// `scheme://host`
    pub base: String,
    /// Cleaned path, always rooted, trailing "/" preserved.
    pub path: String,
    /// Host is the target host or whitelisted.
    pub in_scope: bool,
}

/// Canonicalizes one raw URL string against the target.
///
/// Relative strings are taken relative to the root of the target host, and
/// the scheme is always the target's. Query strings and fragments are
/// dropped: the canonical form names a path, not a request.
pub fn canonicalize(raw: &str, target: &Target) -> Result<Canonical, CrawlError> {
    let trimmed = raw.trim();
    let invalid = |source| CrawlError::InvalidUrl {
        url: raw.to_string(),
        source,
    };

    let parsed = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            host_root(target).join(trimmed).map_err(invalid)?
        }
        Err(e) => return Err(invalid(e)),
    };

    let (host, in_scope) = match parsed.host_str() {
        Some(_) => (authority(&parsed), target.in_scope(&parsed)),
        None => (target.host.clone(), true),
    };

    let raw_path = parsed.path();
    let had_slash = raw_path.ends_with('/');
    let rooted = if !raw_path.is_empty() && !raw_path.starts_with('/') {
        format!("/{}", raw_path)
    } else {
        raw_path.to_string()
    };

    let mut path = match clean_path(&rooted) {
        cleaned if cleaned == "." => "/".to_string(),
        cleaned => cleaned,
    };
    if had_slash && path != "/" {
        path.push('/');
    }

    let base = format!("{}://{}", target.scheme(), host);
    Ok(Canonical {
        url: format!("{}{}", base, path),
        base,
        path,
        in_scope,
    })
}

fn host_root(target: &Target) -> Url {
    let mut root = target.root.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}

/// Lexical path cleaning: collapses "." and ".." segments and repeated
/// separators. ".." never climbs above the root of a rooted path. An empty
/// path cleans to ".". The trailing separator is not kept.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(parts.last(), Some(last) if *last != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if rooted {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Every directory above a canonical path, root first, each ending in "/".
/// A directory path includes itself; a file path does not.
pub fn ancestors(path: &str) -> Vec<String> {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let mut current = String::from("/");
    let mut dirs = vec![current.clone()];

    for segment in &segments[..segments.len().saturating_sub(1)] {
        if segment.is_empty() {
            continue;
        }
        current.push_str(segment);
        current.push('/');
        dirs.push(current.clone());
    }

    dirs
}

pub(crate) struct Normalizer {
    shared: Arc<Shared>,
    seen_raw: HashSet<String>,
    seen_canonical: HashSet<String>,
}

impl Normalizer {
    pub fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            seen_raw: HashSet::new(),
            seen_canonical: HashSet::new(),
        }
    }

    pub async fn run(mut self, mut raw_urls: mpsc::UnboundedReceiver<RawUrl>) {
        while let Some(raw) = raw_urls.recv().await {
            self.handle(raw);
        }
    }

    fn handle(&mut self, raw: RawUrl) {
        let RawUrl { url, depth, unit } = raw;

        if !self.seen_raw.insert(url.clone()) {
            unit.resolve();
            return;
        }

        let canonical = match canonicalize(&url, &self.shared.target) {
            Ok(canonical) => canonical,
            Err(e) => {
                self.shared.log.error(e.to_string());
                unit.resolve();
                return;
            }
        };

        if self.accept(&canonical.url, canonical.in_scope, depth) {
            for dir in ancestors(&canonical.path) {
                let url = format!("{}{}", canonical.base, dir);
                self.accept(&url, canonical.in_scope, depth);
            }
        }

        // Forwarded candidates carry their own units; this one is done.
        unit.resolve();
    }

    fn accept(&mut self, url: &str, in_scope: bool, depth: usize) -> bool {
        if !in_scope || self.seen_canonical.contains(url) {
            return false;
        }
        self.seen_canonical.insert(url.to_string());
        self.shared.queue_page(url.to_string(), depth);
        true
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why clean the path by hand?
//    - `Url::parse` resolves "." and ".." but keeps "//" and relative
//      leftovers; clean_path applies the same rules to every path so
//      "/a//b/../c" and "/a/c" end up as one candidate
//
// 2. Why keep two seen-sets?
//    - seen_raw skips strings we have already parsed, before any work
//    - seen_canonical is the real dedup: different spellings of one URL
//      collapse to the same canonical string
//
// 3. What does `join(...)` do for relative links?
//    - It resolves a link like "img/logo.png" against a base URL the way a
//      browser would; here the base is always the host root
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::testing::{collaborators, target, ScriptedEvaluator};
    use super::super::{build, Channels};
    use super::*;
    use crate::config::Config;
    use crate::logging::{Level, LogLine, LogSink};

    fn canon(raw: &str) -> String {
        canonicalize(raw, &target("http://t/app/index.php?x=1"))
            .unwrap()
            .url
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/a/../b"), "/b");
        assert_eq!(clean_path("/a/b/"), "/a/b");
        assert_eq!(clean_path("/a//b/./c"), "/a/b/c");
        assert_eq!(clean_path("/../../a"), "/a");
        assert_eq!(clean_path("a/../../b"), "../b");
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path(""), ".");
    }

    #[test]
    fn test_canonicalize_keeps_trailing_slash_only_when_present() {
        assert_eq!(canon("http://t/a/b/"), "http://t/a/b/");
        assert_eq!(canon("http://t/a/b"), "http://t/a/b");
        assert_eq!(canon("http://t/a/../b"), "http://t/b");
        assert_eq!(canon("http://t/a//b//"), "http://t/a/b/");
        assert_eq!(canon("http://t"), "http://t/");
    }

    #[test]
    fn test_canonicalize_defaults_host_and_scheme() {
        assert_eq!(canon("/admin/login"), "http://t/admin/login");
        assert_eq!(canon("admin/"), "http://t/admin/");
        assert_eq!(canon("../x"), "http://t/x");
        assert_eq!(canon("https://t/secure"), "http://t/secure");
    }

    #[test]
    fn test_canonicalize_drops_query_and_fragment() {
        assert_eq!(canon("/search?q=1#top"), "http://t/search");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for raw in [
            "http://t/a/../b/",
            "/x//y/./z",
            "dir/",
            "http://t",
            "http://t:8080/p",
            "  /padded  ",
        ] {
            let once = canon(raw);
            assert_eq!(canon(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn test_canonicalize_scope() {
        let t = target("http://t/");
        assert!(canonicalize("http://t/a", &t).unwrap().in_scope);
        assert!(canonicalize("/a", &t).unwrap().in_scope);
        assert!(!canonicalize("http://other.com/x", &t).unwrap().in_scope);
        assert!(!canonicalize("http://t:8080/x", &t).unwrap().in_scope);
    }

    #[test]
    fn test_canonicalize_rejects_garbage() {
        let t = target("http://t/");
        assert!(matches!(
            canonicalize("http://[::1", &t),
            Err(CrawlError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_ancestors() {
        assert_eq!(ancestors("/"), vec!["/"]);
        assert_eq!(ancestors("/a/b/c"), vec!["/", "/a/", "/a/b/"]);
        assert_eq!(ancestors("/a/b/c/"), vec!["/", "/a/", "/a/b/", "/a/b/c/"]);
    }

    struct Fixture {
        normalizer: Normalizer,
        channels: Channels,
        logs: tokio::sync::mpsc::UnboundedReceiver<LogLine>,
    }

    fn fixture() -> Fixture {
        let (log, logs) = LogSink::channel();
        let (findings, _) = tokio::sync::mpsc::channel(1);
        let (shared, channels) = build(
            Config::default(),
            target("http://t/"),
            collaborators(ScriptedEvaluator::new(), None),
            log,
            findings,
        );
        Fixture {
            normalizer: Normalizer::new(shared),
            channels,
            logs,
        }
    }

    impl Fixture {
        fn submit(&mut self, url: &str) {
            let unit = self.normalizer.shared.tracker.register();
            self.normalizer.handle(RawUrl {
                url: url.to_string(),
                depth: 1,
                unit,
            });
        }

        fn forwarded(&mut self) -> Vec<String> {
            let mut urls = Vec::new();
            while let Ok(candidate) = self.channels.pages.try_recv() {
                urls.push(candidate.url);
            }
            urls
        }

        fn pending(&self) -> usize {
            self.normalizer.shared.tracker.pending()
        }
    }

    #[test]
    fn test_forwards_leaf_and_ancestors_once() {
        let mut f = fixture();
        f.submit("http://t/admin/login");
        assert_eq!(
            f.forwarded(),
            vec!["http://t/admin/login", "http://t/", "http://t/admin/"]
        );

        // Same canonical URL spelled differently: nothing new.
        f.submit("/admin/./login");
        f.submit("http://t/admin/login");
        assert!(f.forwarded().is_empty());

        f.submit("/admin/users");
        assert_eq!(f.forwarded(), vec!["http://t/admin/users"]);
    }

    #[test]
    fn test_off_host_is_dropped_silently() {
        let mut f = fixture();
        f.submit("http://other.com/x/y");
        assert!(f.forwarded().is_empty());
        assert!(f.logs.try_recv().is_err());
        assert_eq!(f.pending(), 0);
    }

    #[test]
    fn test_parse_failure_is_logged_and_resolved() {
        let mut f = fixture();
        f.submit("http://[::1");
        assert!(f.forwarded().is_empty());

        let line = f.logs.try_recv().unwrap();
        assert_eq!(line.level, Level::Error);
        assert!(line.content.starts_with("URL Parse Failed: http://[::1"));
        assert_eq!(f.pending(), 0);
    }

    #[test]
    fn test_each_forward_is_its_own_unit() {
        let mut f = fixture();
        f.submit("http://t/a/b");
        // Submitted unit resolved; "/a/b", "/" and "/a/" are pending.
        assert_eq!(f.pending(), 3);
        let candidates: Vec<_> = std::iter::from_fn(|| f.channels.pages.try_recv().ok()).collect();
        assert_eq!(candidates.len(), 3);
        drop(candidates);
        assert_eq!(f.pending(), 0);
    }
}
