use crate::fetcher::{Fetch, FetchRequest};
use crate::provider::Source;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;

// Host is base64 inside a decode("...") call; the literal port follows in
// the next script call on the same row.
static ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)decode\("([\w=]+)".*?\("(\d+)"\)"#).unwrap());

/// free-proxy.cz keeps a fixed-depth paginated list with base64 hosts.
pub struct FreeProxyCz;

#[async_trait]
impl Source for FreeProxyCz {
    fn name(&self) -> &'static str {
        "free-proxy.cz"
    }

    async fn plan(&self, _fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        (1..=14)
            .map(|n| {
                FetchRequest::get(format!(
                    "http://free-proxy.cz/en/proxylist/country/all/http/uptime/all/{}",
                    n
                ))
            })
            .collect()
    }

    fn extract(&self, page: &str) -> Result<Vec<(String, String)>> {
        ROW_RE
            .captures_iter(page)
            .map(|c| {
                let host = general_purpose::STANDARD
                    .decode(&c[1])
                    .ok()
                    .and_then(|b| String::from_utf8(b).ok())
                    .ok_or_else(|| anyhow!("undecodable host token '{}'", &c[1]))?;
                Ok((host, c[2].to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_host_with_literal_port() {
        // "127.0.0.1"
        let page = r#"decode("MTI3LjAuMC4x")</script><span>("8080")</span>"#;
        assert_eq!(
            FreeProxyCz.extract(page).unwrap(),
            vec![("127.0.0.1".to_string(), "8080".to_string())]
        );
    }

    #[tokio::test]
    async fn fourteen_fixed_pages() {
        use crate::sources::tests::NoFetch;
        let plan = FreeProxyCz.plan(&NoFetch::empty()).await;
        assert_eq!(plan.len(), 14);
        assert!(plan[13].url.ends_with("/14"));
    }
}
