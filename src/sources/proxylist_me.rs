use crate::fetcher::{Fetch, FetchRequest};
use crate::provider::Source;
use crate::sources::max_numeric_token;
use async_trait::async_trait;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

static PAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href\s*=\s*['"][^'"]*/?page=(\d+)['"]"#).unwrap());

/// proxylist.me paginates with `?page=N` links; the largest page number
/// on the front page bounds the crawl.
pub struct ProxyListMe;

#[async_trait]
impl Source for ProxyListMe {
    fn name(&self) -> &'static str {
        "proxylist.me"
    }

    async fn plan(&self, fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        let page = fetcher
            .get(&FetchRequest::get("https://proxylist.me/"))
            .await;
        if page.is_empty() {
            return Vec::new();
        }
        let last = match max_numeric_token(&PAGE_RE, &page) {
            Some(last) => last,
            None => {
                warn!("{}: no page links found, skipping run", self.name());
                return Vec::new();
            }
        };
        (0..last)
            .map(|n| FetchRequest::get(format!("https://proxylist.me/?page={}", n)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::tests::NoFetch;

    #[tokio::test]
    async fn crawls_up_to_the_largest_page_link() {
        let page = r#"<a href="/?page=2">2</a> <a href="/?page=17">17</a>"#;
        let fetcher = NoFetch::with_page("https://proxylist.me/", page);
        let plan = ProxyListMe.plan(&fetcher).await;
        assert_eq!(plan.len(), 17);
        assert_eq!(plan[0].url, "https://proxylist.me/?page=0");
        assert_eq!(plan[16].url, "https://proxylist.me/?page=16");
    }

    #[tokio::test]
    async fn no_page_links_is_a_handled_zero_result() {
        let fetcher = NoFetch::with_page("https://proxylist.me/", "<html>no pagination</html>");
        assert!(ProxyListMe.plan(&fetcher).await.is_empty());
    }
}
