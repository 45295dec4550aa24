use crate::codec::{parse_digit_table, rewrite_concat_ports};
use crate::extract::scan_ip_port;
use crate::fetcher::{Fetch, FetchRequest};
use crate::provider::Source;
use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

// Same digit-variable cipher as xseo.in, but the concatenation is written
// as (":"+a+b+c) so the rendered page shows "ip:port".
static PORT_EXPR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\(":"\+([a-z+]+)\)"#).unwrap());

/// nntime.com keeps a fixed set of 30 numbered pages.
pub struct Nntime;

#[async_trait]
impl Source for Nntime {
    fn name(&self) -> &'static str {
        "nntime.com"
    }

    async fn plan(&self, _fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        (1..=30)
            .map(|n| FetchRequest::get(format!("http://www.nntime.com/proxy-updated-{:02}.htm", n)))
            .collect()
    }

    fn extract(&self, page: &str) -> Result<Vec<(String, String)>> {
        let table = parse_digit_table(page);
        let rewritten = rewrite_concat_ports(page, &table, &PORT_EXPR_RE)?;
        Ok(scan_ip_port(&rewritten))
    }
}
