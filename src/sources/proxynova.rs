use crate::fetcher::{Fetch, FetchRequest};
use crate::provider::Source;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

static COUNTRY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([a-z]{2})""#).unwrap());

/// proxynova.com splits its list by country; the index page embeds the
/// two-letter country codes ("en" is the site language selector, not a
/// country).
pub struct ProxyNova;

#[async_trait]
impl Source for ProxyNova {
    fn name(&self) -> &'static str {
        "proxynova.com"
    }

    async fn plan(&self, fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        let page = fetcher
            .get(&FetchRequest::get(
                "https://www.proxynova.com/proxy-server-list/",
            ))
            .await;
        if page.is_empty() {
            return Vec::new();
        }
        COUNTRY_RE
            .captures_iter(&page)
            .filter(|c| &c[1] != "en")
            .map(|c| {
                FetchRequest::get(format!(
                    "https://www.proxynova.com/proxy-server-list/country-{}/",
                    &c[1]
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::tests::NoFetch;

    #[tokio::test]
    async fn country_codes_become_pages_except_en() {
        let page = r#"codes: "us" "de" "en""#;
        let fetcher = NoFetch::with_page("https://www.proxynova.com/proxy-server-list/", page);
        let plan = ProxyNova.plan(&fetcher).await;
        let urls: Vec<&str> = plan.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://www.proxynova.com/proxy-server-list/country-us/",
                "https://www.proxynova.com/proxy-server-list/country-de/",
            ]
        );
    }
}
