use crate::codec::hex_to_decimal_port;
use crate::extract::scan_with_port_pattern;
use crate::fetcher::{Fetch, FetchRequest, Method};
use crate::provider::Source;
use crate::sources::max_numeric_token;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

const LIST_URL: &str = "http://www.gatherproxy.com/proxylist/anonymity/";

// Pagination is exposed as fragment anchors: href="#12".
static PAGE_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r##"href="#(\d+)""##).unwrap());

// Ports are quoted hexadecimal literals next to the address.
static HEX_PORT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([0-9A-Fa-f]{1,4})'").unwrap());

fn tier_form(tier: &str, page: u32) -> Vec<(String, String)> {
    vec![
        ("Type".to_string(), tier.to_string()),
        ("PageIdx".to_string(), page.to_string()),
    ]
}

/// gatherproxy.com drives its listing with form posts, one anonymity tier
/// at a time; page 1 of each tier reveals that tier's last page index.
pub struct GatherProxy;

#[async_trait]
impl Source for GatherProxy {
    fn name(&self) -> &'static str {
        "gatherproxy.com"
    }

    async fn plan(&self, fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        let mut requests = Vec::new();
        for tier in ["anonymous", "elite"] {
            let page = fetcher
                .get(&FetchRequest::post(LIST_URL, tier_form(tier, 1)))
                .await;
            if page.is_empty() {
                continue;
            }
            let last = match max_numeric_token(&PAGE_ANCHOR_RE, &page) {
                Some(last) => last,
                None => {
                    warn!("{}: no page anchors for tier {}", self.name(), tier);
                    continue;
                }
            };
            requests.extend(
                (1..=last).map(|pid| FetchRequest::post(LIST_URL, tier_form(tier, pid))),
            );
        }
        requests
    }

    fn extract(&self, page: &str) -> Result<Vec<(String, String)>> {
        scan_with_port_pattern(page, &HEX_PORT_RE)
            .into_iter()
            .map(|(host, hex)| {
                let port = hex_to_decimal_port(&hex)
                    .ok_or_else(|| anyhow!("bad hex port '{}'", hex))?;
                Ok((host, port))
            })
            .collect()
    }
}

/// The socks listing is a single form post with plain ip:port text.
pub struct GatherProxySocks;

#[async_trait]
impl Source for GatherProxySocks {
    fn name(&self) -> &'static str {
        "gatherproxy.com^socks"
    }

    async fn plan(&self, _fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        let mut req = FetchRequest::get("http://www.gatherproxy.com/sockslist/");
        req.method = Method::Post;
        vec![req]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::tests::NoFetch;

    #[tokio::test]
    async fn both_tiers_contribute_pages() {
        let page = r##"<a href="#1">1</a><a href="#3">3</a>"##;
        let fetcher = NoFetch::with_page(LIST_URL, page);
        let plan = GatherProxy.plan(&fetcher).await;
        // 3 pages per tier, both tiers answered with the same stub page
        assert_eq!(plan.len(), 6);
        assert_eq!(plan[0].form.as_ref().unwrap()[0].1, "anonymous");
        assert_eq!(plan[3].form.as_ref().unwrap()[0].1, "elite");
    }

    #[tokio::test]
    async fn missing_anchors_skip_the_tier() {
        let fetcher = NoFetch::with_page(LIST_URL, "<html>no anchors</html>");
        assert!(GatherProxy.plan(&fetcher).await.is_empty());
    }

    #[test]
    fn hex_ports_decode_to_decimal() {
        let page = "addr('1.2.3.4')port('1F90') addr('5.6.7.8')port('50')";
        assert_eq!(
            GatherProxy.extract(page).unwrap(),
            vec![
                ("1.2.3.4".to_string(), "8080".to_string()),
                ("5.6.7.8".to_string(), "80".to_string()),
            ]
        );
    }
}
