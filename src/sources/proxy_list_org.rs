use crate::codec::decode_base64_hostport;
use crate::fetcher::{Fetch, FetchRequest};
use crate::provider::Source;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

const FIRST_PAGE: &str = "http://proxy-list.org/english/index.php?p=1";

static PAGE_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href\s*=\s*['"]\./([^'"]?index\.php\?p=\d+[^'"]*)['"]"#).unwrap());

// Endpoints are rendered as Proxy('<base64 "host:port">') script calls.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Proxy\('([\w=]+)'\)").unwrap());

/// proxy-list.org hides each endpoint behind a base64 token inside a
/// `Proxy('...')` call; pagination links are harvested from page 1.
pub struct ProxyListOrg;

#[async_trait]
impl Source for ProxyListOrg {
    fn name(&self) -> &'static str {
        "proxy-list.org"
    }

    async fn plan(&self, fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        let page = fetcher.get(&FetchRequest::get(FIRST_PAGE)).await;
        if page.is_empty() {
            return Vec::new();
        }
        let mut requests: Vec<FetchRequest> = PAGE_HREF_RE
            .captures_iter(&page)
            .map(|c| FetchRequest::get(format!("http://proxy-list.org/english/{}", &c[1])))
            .collect();
        requests.push(FetchRequest::get(FIRST_PAGE));
        requests
    }

    fn extract(&self, page: &str) -> Result<Vec<(String, String)>> {
        TOKEN_RE
            .captures_iter(page)
            .map(|c| {
                decode_base64_hostport(&c[1])
                    .ok_or_else(|| anyhow!("undecodable proxy token '{}'", &c[1]))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::tests::NoFetch;

    #[tokio::test]
    async fn base64_tokens_decode_to_endpoints() {
        // "127.0.0.1:8080"
        let page = "Proxy('MTI3LjAuMC4xOjgwODA=')";
        assert_eq!(
            ProxyListOrg.extract(page).unwrap(),
            vec![("127.0.0.1".to_string(), "8080".to_string())]
        );
    }

    #[test]
    fn corrupt_token_is_an_extraction_error() {
        assert!(ProxyListOrg.extract("Proxy('aaaa')").is_err());
    }

    #[tokio::test]
    async fn pagination_links_plus_first_page() {
        let page = r#"<a href="./index.php?p=2">2</a><a href="./index.php?p=3">3</a>"#;
        let fetcher = NoFetch::with_page(FIRST_PAGE, page);
        let plan = ProxyListOrg.plan(&fetcher).await;
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[2].url, FIRST_PAGE);
    }
}
