use crate::fetcher::{Fetch, FetchRequest};
use crate::provider::Source;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

static ARCHIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href\s*=\s*['"](/archive/\d{4}-\d{2}-\d{2})['"]"#).unwrap());

/// checkerproxy.net publishes daily archive dumps behind an index of
/// `/archive/YYYY-MM-DD` links; the actual lists live under `/api`.
pub struct CheckerProxy;

#[async_trait]
impl Source for CheckerProxy {
    fn name(&self) -> &'static str {
        "checkerproxy.net"
    }

    async fn plan(&self, fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        let page = fetcher
            .get(&FetchRequest::get("https://checkerproxy.net/"))
            .await;
        if page.is_empty() {
            return Vec::new();
        }
        ARCHIVE_RE
            .captures_iter(&page)
            .map(|c| FetchRequest::get(format!("https://checkerproxy.net/api{}", &c[1])))
            .collect()
    }
}
