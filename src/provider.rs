use crate::endpoint::{EndpointRecord, Proto};
use crate::extract;
use crate::fetcher::{Fetch, FetchRequest, HttpFetcher};
use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error, info};
use std::collections::HashSet;

/// Per-source limits and the protocol set the source is known to serve.
/// Built once per catalog entry and immutable for the run's duration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub protocols: Vec<Proto>,
    pub max_conn: usize,
    pub max_tries: usize,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            protocols: Vec::new(),
            max_conn: 4,
            max_tries: 3,
            timeout_secs: 20,
        }
    }
}

impl ProviderConfig {
    pub fn new(protocols: Vec<Proto>) -> Self {
        Self {
            protocols,
            ..Default::default()
        }
    }

    pub fn with_max_conn(mut self, max_conn: usize) -> Self {
        self.max_conn = max_conn.max(1);
        self
    }

    pub fn with_max_tries(mut self, max_tries: usize) -> Self {
        self.max_tries = max_tries.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// One listing source: discovery (which requests to issue) plus extraction
/// (page text to raw host/port pairs). Discovery may fetch index pages
/// through the same gated fetcher the page tasks use; an index that cannot
/// be fetched yields an empty plan, never an error.
#[async_trait]
pub trait Source: Send + Sync {
    fn name(&self) -> &'static str;

    async fn plan(&self, fetcher: &dyn Fetch) -> Vec<FetchRequest>;

    fn extract(&self, page: &str) -> Result<Vec<(String, String)>> {
        Ok(extract::scan_ip_port(page))
    }
}

/// A source paired with its limits; `run` drives the whole pipeline for it.
pub struct Provider {
    pub config: ProviderConfig,
    source: Box<dyn Source>,
}

impl Provider {
    pub fn new(source: impl Source + 'static, config: ProviderConfig) -> Self {
        Self {
            config,
            source: Box::new(source),
        }
    }

    pub fn name(&self) -> &'static str {
        self.source.name()
    }

    /// Harvest everything the source currently advertises. Broken pages,
    /// failed discovery, and extraction errors all degrade to fewer
    /// endpoints; nothing here aborts the run.
    pub async fn run(&self) -> HashSet<EndpointRecord> {
        let fetcher = match HttpFetcher::new(&self.config) {
            Ok(f) => f,
            Err(e) => {
                error!("{}: cannot build http client: {}", self.name(), e);
                return HashSet::new();
            }
        };
        self.run_with(&fetcher).await
    }

    /// Same as `run` but over a caller-supplied fetcher.
    pub async fn run_with(&self, fetcher: &dyn Fetch) -> HashSet<EndpointRecord> {
        debug!("trying to get endpoints from {}", self.name());

        let mut requests = self.source.plan(fetcher).await;
        let mut seen = HashSet::new();
        requests.retain(|r| seen.insert(r.clone()));

        let tasks = requests.iter().map(|req| async move {
            let page = fetcher.get(req).await;
            if page.is_empty() {
                debug!("{}: empty page from {}", self.name(), req.url);
                return (req, Vec::new());
            }
            match self.source.extract(&page) {
                Ok(pairs) => (req, pairs),
                Err(e) => {
                    error!("extraction failed; source: {}; error: {:#}", self.name(), e);
                    (req, Vec::new())
                }
            }
        });

        let mut found = HashSet::new();
        for (req, pairs) in futures::future::join_all(tasks).await {
            if pairs.is_empty() {
                debug!("{}: got 0 endpoints from {}", self.name(), req.url);
                continue;
            }
            let received = pairs.len();
            let before = found.len();
            for (host, port) in pairs {
                if port.is_empty() {
                    continue;
                }
                found.insert(EndpointRecord {
                    host,
                    port,
                    protocols: self.config.protocols.clone(),
                });
            }
            debug!(
                "{}({}) endpoints added(received) from {}",
                found.len() - before,
                received,
                req.url
            );
        }

        info!("{} endpoints received from {}", found.len(), self.name());
        found
    }
}
