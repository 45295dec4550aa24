use crate::fetcher::{Fetch, FetchRequest};
use crate::provider::Source;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

static LIST_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href\s*=\s*['"]([^'"]*proxylist_at_[^'"]*)['"]"#).unwrap());

/// webanetlabs.net links dated proxylist pages from its publ/24 index.
pub struct Webanetlabs;

#[async_trait]
impl Source for Webanetlabs {
    fn name(&self) -> &'static str {
        "webanetlabs.net"
    }

    async fn plan(&self, fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        let page = fetcher
            .get(&FetchRequest::get("https://webanetlabs.net/publ/24"))
            .await;
        if page.is_empty() {
            return Vec::new();
        }
        LIST_HREF_RE
            .captures_iter(&page)
            .map(|c| FetchRequest::get(format!("https://webanetlabs.net{}", &c[1])))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::tests::NoFetch;

    #[tokio::test]
    async fn harvest_proxylist_hrefs() {
        let page = r#"<a href="/publ/proxylist_at_01.01.2023">list</a>"#;
        let fetcher = NoFetch::with_page("https://webanetlabs.net/publ/24", page);
        let plan = Webanetlabs.plan(&fetcher).await;
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].url, "https://webanetlabs.net/publ/proxylist_at_01.01.2023");
    }
}
