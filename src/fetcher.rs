use crate::provider::ProviderConfig;
use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::sync::Semaphore;

const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// One page request produced by a source's discovery phase and
/// consumed once by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    pub url: String,
    pub method: Method,
    pub form: Option<Vec<(String, String)>>,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
            form: None,
            headers: Vec::new(),
        }
    }

    pub fn post(url: impl Into<String>, form: Vec<(String, String)>) -> Self {
        Self {
            url: url.into(),
            method: Method::Post,
            form: Some(form),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// The shared fetch contract every provider run drives its pages through.
///
/// `fetch_page` is one attempt: every failure mode (non-200 status,
/// transport error, timeout, undecodable body) is absorbed into an empty
/// page and logged at debug level, never raised. The provided `get` adds
/// the retry loop and the concurrency gate on top.
#[async_trait]
pub trait Fetch: Send + Sync {
    fn gate(&self) -> &Semaphore;

    fn attempts(&self) -> usize;

    async fn fetch_page(&self, req: &FetchRequest) -> String;

    /// Fetch with retry: up to `attempts()` tries, no backoff, first
    /// non-empty page wins. Each attempt holds one gate permit for its
    /// duration so no more than the permit count of requests are in
    /// flight at once for this provider.
    async fn get(&self, req: &FetchRequest) -> String {
        for _ in 0..self.attempts() {
            let permit = match self.gate().acquire().await {
                Ok(p) => p,
                Err(_) => return String::new(),
            };
            let page = self.fetch_page(req).await;
            drop(permit);
            if !page.is_empty() {
                return page;
            }
        }
        String::new()
    }
}

/// reqwest-backed fetcher; one instance per provider run, owning that
/// run's connection pool and concurrency gate.
pub struct HttpFetcher {
    client: Client,
    gate: Semaphore,
    max_tries: usize,
}

impl HttpFetcher {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
        headers.insert(ACCEPT, HeaderValue::from_static("text/html, */*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.8"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            gate: Semaphore::new(config.max_conn.max(1)),
            max_tries: config.max_tries.max(1),
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    fn gate(&self) -> &Semaphore {
        &self.gate
    }

    fn attempts(&self) -> usize {
        self.max_tries
    }

    async fn fetch_page(&self, req: &FetchRequest) -> String {
        let mut builder = match req.method {
            Method::Get => self.client.get(&req.url),
            Method::Post => self.client.post(&req.url),
        };
        if let Some(form) = &req.form {
            builder = builder.form(form);
        }
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!("{} failed: {}", req.url, e);
                return String::new();
            }
        };

        if resp.status() != StatusCode::OK {
            debug!("{} returned status {}", req.url, resp.status());
            return String::new();
        }

        match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("{} body decode failed: {}", req.url, e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FlakyFetcher {
        gate: Semaphore,
        max_tries: usize,
        fail_first: usize,
        calls: AtomicUsize,
    }

    impl FlakyFetcher {
        fn new(max_tries: usize, fail_first: usize) -> Self {
            Self {
                gate: Semaphore::new(4),
                max_tries,
                fail_first,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Fetch for FlakyFetcher {
        fn gate(&self) -> &Semaphore {
            &self.gate
        }

        fn attempts(&self) -> usize {
            self.max_tries
        }

        async fn fetch_page(&self, _req: &FetchRequest) -> String {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first {
                String::new()
            } else {
                "page".to_string()
            }
        }
    }

    #[tokio::test]
    async fn retry_stops_at_first_success() {
        let fetcher = FlakyFetcher::new(3, 2);
        let page = fetcher.get(&FetchRequest::get("http://x/")).await;
        assert_eq!(page, "page");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_gives_up_after_budget() {
        let fetcher = FlakyFetcher::new(3, usize::MAX);
        let page = fetcher.get(&FetchRequest::get("http://x/")).await;
        assert!(page.is_empty());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    struct SlowFetcher {
        gate: Semaphore,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Fetch for SlowFetcher {
        fn gate(&self) -> &Semaphore {
            &self.gate
        }

        fn attempts(&self) -> usize {
            1
        }

        async fn fetch_page(&self, _req: &FetchRequest) -> String {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            "page".to_string()
        }
    }

    #[tokio::test]
    async fn gate_bounds_in_flight_requests() {
        let fetcher = SlowFetcher {
            gate: Semaphore::new(3),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        };
        let requests: Vec<FetchRequest> = (0..20)
            .map(|n| FetchRequest::get(format!("http://x/{n}")))
            .collect();
        futures::future::join_all(requests.iter().map(|r| fetcher.get(r))).await;
        assert!(fetcher.peak.load(Ordering::SeqCst) <= 3);
        assert!(fetcher.peak.load(Ordering::SeqCst) >= 2);
    }
}
