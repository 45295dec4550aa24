use crate::endpoint::Proto;
use crate::extract::scan_ip_colon_port;
use crate::fetcher::{Fetch, FetchRequest};
use crate::provider::Source;
use anyhow::Result;
use async_trait::async_trait;
use log::warn;
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Deserialize)]
struct Listing {
    code: String,
}

/// openproxy.space serves a JSON index of list codes through an API that
/// expects browser-looking Origin/Referer headers. The first three codes
/// are the current socks5, socks4 and http lists, in that order.
pub struct OpenProxySpace {
    index: usize,
}

impl OpenProxySpace {
    pub fn new(protocols: &[Proto]) -> Self {
        let index = if protocols.contains(&Proto::Socks5) {
            0
        } else if protocols.contains(&Proto::Socks4) {
            1
        } else {
            2
        };
        Self { index }
    }
}

#[async_trait]
impl Source for OpenProxySpace {
    fn name(&self) -> &'static str {
        "openproxy.space"
    }

    async fn plan(&self, fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let index_req =
            FetchRequest::get(format!("https://api.openproxy.space/list?skip=0&ts={}", ts))
                .with_header("Accept", "application/json, text/plain, */*")
                .with_header("Origin", "https://openproxy.space")
                .with_header("Referer", "https://openproxy.space/");

        let page = fetcher.get(&index_req).await;
        if page.is_empty() {
            return Vec::new();
        }
        let listings: Vec<Listing> = match serde_json::from_str(&page) {
            Ok(listings) => listings,
            Err(e) => {
                warn!("{}: unparseable list index: {}", self.name(), e);
                return Vec::new();
            }
        };
        match listings.get(self.index) {
            Some(listing) => vec![FetchRequest::get(format!(
                "https://openproxy.space/list/{}",
                listing.code
            ))],
            None => Vec::new(),
        }
    }

    fn extract(&self, page: &str) -> Result<Vec<(String, String)>> {
        Ok(scan_ip_colon_port(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::http_family;
    use crate::sources::tests::NoFetch;

    #[tokio::test]
    async fn list_code_picked_by_declared_protocol() {
        let body = r#"[{"code":"s5list"},{"code":"s4list"},{"code":"httplist"}]"#;
        let fetcher = NoFetch::with_page_prefix("https://api.openproxy.space/list", body);

        let plan = OpenProxySpace::new(&[Proto::Socks5]).plan(&fetcher).await;
        assert_eq!(plan[0].url, "https://openproxy.space/list/s5list");

        let plan = OpenProxySpace::new(&[Proto::Socks4]).plan(&fetcher).await;
        assert_eq!(plan[0].url, "https://openproxy.space/list/s4list");

        let plan = OpenProxySpace::new(&http_family()).plan(&fetcher).await;
        assert_eq!(plan[0].url, "https://openproxy.space/list/httplist");
    }

    #[tokio::test]
    async fn bad_json_is_a_handled_zero_result() {
        let fetcher = NoFetch::with_page_prefix("https://api.openproxy.space/list", "<html>");
        assert!(OpenProxySpace::new(&http_family()).plan(&fetcher).await.is_empty());
    }
}
