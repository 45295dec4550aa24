use crate::codec::{parse_digit_table, rewrite_concat_ports};
use crate::extract::scan_ip_port;
use crate::fetcher::{Fetch, FetchRequest};
use crate::provider::Source;
use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

// Ports are rendered as document.write(""+a+b+c) over an inline a=7;b=2;...
// symbol table.
static PORT_EXPR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\(""\+([a-z+]+)\)"#).unwrap());

pub struct Xseo;

#[async_trait]
impl Source for Xseo {
    fn name(&self) -> &'static str {
        "xseo.in"
    }

    async fn plan(&self, _fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        vec![FetchRequest::post(
            "https://xseo.in/proxylist",
            vec![("submit".to_string(), "1".to_string())],
        )]
    }

    fn extract(&self, page: &str) -> Result<Vec<(String, String)>> {
        let table = parse_digit_table(page);
        let rewritten = rewrite_concat_ports(page, &table, &PORT_EXPR_RE)?;
        Ok(scan_ip_port(&rewritten))
    }
}
