use crate::codec::{parse_xor_table, rewrite_xor_ports};
use crate::extract::scan_ip_port;
use crate::fetcher::{Fetch, FetchRequest};
use crate::provider::Source;
use anyhow::Result;
use async_trait::async_trait;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

const LIST_URL: &str = "http://spys.one/proxies/";

static SESSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([a-z0-9]{32})'").unwrap());

/// spys.one needs a session token scraped from the landing page, then one
/// form post per anonymity level (3 = anonymous, 4 = high-anonymous).
/// Ports are obfuscated with the XOR symbol-table scheme.
pub struct Spys;

#[async_trait]
impl Source for Spys {
    fn name(&self) -> &'static str {
        "spys.one"
    }

    async fn plan(&self, fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        let page = fetcher.get(&FetchRequest::get(LIST_URL)).await;
        if page.is_empty() {
            return Vec::new();
        }
        let session = match SESSION_RE.captures(&page) {
            Some(c) => c[1].to_string(),
            None => {
                warn!("{}: no session token on landing page, skipping run", self.name());
                return Vec::new();
            }
        };
        [3, 4]
            .iter()
            .map(|lvl| {
                FetchRequest::post(
                    LIST_URL,
                    vec![
                        ("xf0".to_string(), session.clone()),
                        ("xpp".to_string(), "3".to_string()),
                        ("xf1".to_string(), lvl.to_string()),
                    ],
                )
            })
            .collect()
    }

    fn extract(&self, page: &str) -> Result<Vec<(String, String)>> {
        let table = parse_xor_table(page)?;
        let rewritten = rewrite_xor_ports(page, &table)?;
        Ok(scan_ip_port(&rewritten))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::tests::NoFetch;

    #[tokio::test]
    async fn session_token_feeds_both_tier_posts() {
        let page = "var s = 'abcdef0123456789abcdef0123456789';";
        let fetcher = NoFetch::with_page(LIST_URL, page);
        let plan = Spys.plan(&fetcher).await;
        assert_eq!(plan.len(), 2);
        let form = plan[0].form.as_ref().unwrap();
        assert!(form.contains(&("xf0".to_string(), "abcdef0123456789abcdef0123456789".to_string())));
        assert!(form.contains(&("xf1".to_string(), "3".to_string())));
    }

    #[tokio::test]
    async fn missing_session_token_skips_the_run() {
        let fetcher = NoFetch::with_page(LIST_URL, "<html>rotated layout</html>");
        assert!(Spys.plan(&fetcher).await.is_empty());
    }

    #[test]
    fn xor_cipher_port_decodes() {
        // digits: 9^1=8, 6^6=0, 9^1=8, 2^2=0; i9u1 resolves through y5c3
        let page = ">y5c3=2;i9u1=3^y5c3;d4r8=9;g7g7=6;v2e5=6;t0z6=2\
                    <td>10.2.2.2</td>document.write(\"<font>:<\\/font>\"+(d4r8^i9u1)+(g7g7^v2e5)+(d4r8^i9u1)+(y5c3^t0z6))";
        let pairs = Spys.extract(page).unwrap();
        assert_eq!(pairs, vec![("10.2.2.2".to_string(), "8080".to_string())]);
    }
}
