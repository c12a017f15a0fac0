// src/config.rs
// =============================================================================
// Run settings, built once from the command line before the crawl starts.
//
// - Config:       how the crawl behaves (filters, pool sizes)
// - Target:       what is crawled (root URL, host scope, blacklist,
//                 extensions) plus the shared tested-count
// - HttpSettings: what the HTTP evaluator needs
//
// Nothing here changes after construction except the tested-count, which is
// an atomic counter.
// =============================================================================

use anyhow::{anyhow, bail, Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct Config {
    pub show_all: bool,
    pub no_spider: bool,
    pub debug: bool,
    /// Worker pool capacity.
    pub threads: usize,
    /// Directory-slot pool capacity.
    pub max_dirs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_all: false,
            no_spider: false,
            debug: false,
            threads: 10,
            max_dirs: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Target {
    pub root: Url,
    /// `host[:port]` of the root URL.
    pub host: String,
    pub blacklist: HashSet<String>,
    pub whitelist: HashSet<String>,
    pub extensions: Vec<String>,
    tested: Arc<AtomicU64>,
}

impl Target {
    pub fn new(root: Url) -> Result<Self> {
        if root.host_str().is_none() {
            bail!("URL has no host: {}", root);
        }
        let host = authority(&root);
        Ok(Self {
            root,
            host,
            blacklist: HashSet::new(),
            whitelist: HashSet::new(),
            extensions: Vec::new(),
            tested: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn scheme(&self) -> &str {
        self.root.scheme()
    }

    pub fn is_blacklisted(&self, url: &str) -> bool {
        self.blacklist.contains(url)
    }

    /// True when the URL's host is the target host or whitelisted.
    /// Whitelist entries may name a bare host or `host:port`.
    pub fn in_scope(&self, url: &Url) -> bool {
        let auth = authority(url);
        if auth == self.host || self.whitelist.contains(&auth) {
            return true;
        }
        url.host_str()
            .map(|host| self.whitelist.contains(host))
            .unwrap_or(false)
    }

    /// Words are crossed with extensions only when the first entry is
    /// non-blank; `-x ""` therefore means "no extensions".
    pub fn extensions_enabled(&self) -> bool {
        self.extensions
            .first()
            .map(|ext| !ext.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn record_tested(&self) {
        self.tested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tested(&self) -> u64 {
        self.tested.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub bad_codes: Vec<u16>,
    pub timeout: Duration,
    pub user_agent: String,
    /// Skip TLS certificate verification.
    pub insecure: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            bad_codes: vec![404],
            timeout: Duration::from_secs(10),
            user_agent: format!("pathspider/{}", env!("CARGO_PKG_VERSION")),
            insecure: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub target: Target,
    pub http: HttpSettings,
    /// Brute-forcing is enabled only when this is set.
    pub wordlist: Option<PathBuf>,
    pub json: bool,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = Url::parse(cli.url.trim())
            .map_err(|e| anyhow!("Invalid URL '{}': {}", cli.url, e))?;

        if cli.threads == 0 {
            bail!("--threads must be at least 1");
        }
        if cli.max_dirs == 0 {
            bail!("--max-dirs must be at least 1");
        }

        let mut target = Target::new(root)?;
        target.extensions = cli
            .extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .collect();
        target.whitelist = cli.whitelist.iter().map(|h| h.trim().to_string()).collect();
        target.blacklist = cli.blacklist.iter().map(|u| u.trim().to_string()).collect();
        if let Some(path) = &cli.blacklist_file {
            target.blacklist.extend(load_blacklist(path)?);
        }

        let config = Config {
            show_all: cli.show_all,
            no_spider: cli.no_spider,
            debug: cli.debug,
            threads: cli.threads,
            max_dirs: cli.max_dirs,
        };

        let http = HttpSettings {
            bad_codes: cli.bad_codes.clone(),
            timeout: Duration::from_secs(cli.timeout),
            user_agent: cli.user_agent.clone(),
            insecure: cli.insecure,
        };

        Ok(Self {
            config,
            target,
            http,
            wordlist: cli.wordlist.clone(),
            json: cli.json,
        })
    }
}

/// `host` or `host:port` when the port is not the scheme default.
pub fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn load_blacklist(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read blacklist file {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
