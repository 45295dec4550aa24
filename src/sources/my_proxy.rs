use crate::fetcher::{Fetch, FetchRequest};
use crate::provider::Source;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

const INDEX_URL: &str = "https://www.my-proxy.com/free-proxy-list.html";

static FREE_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href\s*=\s*['"]([^'"]?free-[^'"]*)['"]"#).unwrap());

/// my-proxy.com cross-links its free-* list pages from the main list;
/// the index page itself also carries endpoints.
pub struct MyProxy;

#[async_trait]
impl Source for MyProxy {
    fn name(&self) -> &'static str {
        "my-proxy.com"
    }

    async fn plan(&self, fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        let page = fetcher.get(&FetchRequest::get(INDEX_URL)).await;
        if page.is_empty() {
            return Vec::new();
        }
        let mut requests: Vec<FetchRequest> = FREE_HREF_RE
            .captures_iter(&page)
            .map(|c| FetchRequest::get(format!("https://www.my-proxy.com/{}", &c[1])))
            .collect();
        requests.push(FetchRequest::get(INDEX_URL));
        requests
    }
}
