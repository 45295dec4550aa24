//! The source catalog: one module per listing site that needs its own
//! discovery or extraction logic, plus `ListPage` for the many sources
//! that are just fixed URL lists scanned with the baseline pattern.

pub mod checkerproxy;
pub mod free_proxy_cz;
pub mod gatherproxy;
pub mod my_proxy;
pub mod nntime;
pub mod openproxy_space;
pub mod proxy_list_org;
pub mod proxylist_me;
pub mod proxynova;
pub mod spys;
pub mod webanetlabs;
pub mod xseo;

use crate::endpoint::{http_family, Proto};
use crate::fetcher::{Fetch, FetchRequest};
use crate::provider::{Provider, ProviderConfig, Source};
use async_trait::async_trait;
use regex::Regex;

use checkerproxy::CheckerProxy;
use free_proxy_cz::FreeProxyCz;
use gatherproxy::{GatherProxy, GatherProxySocks};
use my_proxy::MyProxy;
use nntime::Nntime;
use openproxy_space::OpenProxySpace;
use proxy_list_org::ProxyListOrg;
use proxylist_me::ProxyListMe;
use proxynova::ProxyNova;
use spys::Spys;
use webanetlabs::Webanetlabs;
use xseo::Xseo;

/// Largest numeric token captured by `re` (group 1) on the page. `None`
/// when nothing matches, so callers turn a layout change into a logged
/// zero-result run instead of a crash.
pub(crate) fn max_numeric_token(re: &Regex, page: &str) -> Option<u32> {
    re.captures_iter(page)
        .filter_map(|c| c[1].parse().ok())
        .max()
}

/// A source that is nothing but a fixed list of GET pages with baseline
/// ip:port extraction.
pub struct ListPage {
    name: &'static str,
    urls: Vec<String>,
}

impl ListPage {
    pub fn new<I, S>(name: &'static str, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name,
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Source for ListPage {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn plan(&self, _fetcher: &dyn Fetch) -> Vec<FetchRequest> {
        self.urls.iter().map(|url| FetchRequest::get(url.clone())).collect()
    }
}

/// Every known source with its declared protocol set and limits.
pub fn default_catalog() -> Vec<Provider> {
    let mut catalog = Vec::new();

    catalog.push(Provider::new(
        ListPage::new(
            "api.proxyscrape.com^http",
            ["https://api.proxyscrape.com/?request=getproxies&proxytype=http"],
        ),
        ProviderConfig::new(http_family()),
    ));
    catalog.push(Provider::new(
        ListPage::new(
            "api.proxyscrape.com^socks4",
            ["https://api.proxyscrape.com/?request=getproxies&proxytype=socks4"],
        ),
        ProviderConfig::new(vec![Proto::Socks4]),
    ));
    catalog.push(Provider::new(
        ListPage::new(
            "api.proxyscrape.com^socks5",
            ["https://api.proxyscrape.com/?request=getproxies&proxytype=socks5"],
        ),
        ProviderConfig::new(vec![Proto::Socks5]),
    ));
    catalog.push(Provider::new(
        ListPage::new(
            "free-proxy-list.net",
            [
                "https://free-proxy-list.net/",
                "https://us-proxy.org/",
                "https://free-proxy-list.net/uk-proxy.html",
                "https://www.sslproxies.org/",
                "https://free-proxy-list.net/anonymous-proxy.html",
            ],
        ),
        ProviderConfig::new(http_family()),
    ));
    catalog.push(Provider::new(
        ListPage::new("socks-proxy.net", ["https://www.socks-proxy.net/"]),
        ProviderConfig::new(vec![Proto::Socks4]),
    ));

    for protocols in [http_family(), vec![Proto::Socks4], vec![Proto::Socks5]] {
        catalog.push(Provider::new(
            OpenProxySpace::new(&protocols),
            ProviderConfig::new(protocols),
        ));
    }

    catalog.push(Provider::new(
        ListPage::new(
            "www.xroxy.com^http",
            (0..9).map(|n| format!("https://www.xroxy.com/proxylist.php?type=All_http&pnum={}", n)),
        ),
        ProviderConfig::new(http_family()),
    ));
    catalog.push(Provider::new(
        ListPage::new(
            "www.xroxy.com^socks4",
            (0..4).map(|n| format!("https://www.xroxy.com/proxylist.php?type=Socks4&pnum={}", n)),
        ),
        ProviderConfig::new(vec![Proto::Socks4]),
    ));
    catalog.push(Provider::new(
        ListPage::new(
            "www.xroxy.com^socks5",
            (0..4).map(|n| format!("https://www.xroxy.com/proxylist.php?type=Socks5&pnum={}", n)),
        ),
        ProviderConfig::new(vec![Proto::Socks5]),
    ));

    catalog.push(Provider::new(
        ListPage::new("t.me/s/proxiesfine", ["https://t.me/s/proxiesfine"]),
        ProviderConfig::new(http_family()),
    ));
    catalog.push(Provider::new(
        ListPage::new("cn-proxy.com", ["http://cn-proxy.com/archives/218"]),
        ProviderConfig::new(http_family()),
    ));
    catalog.push(Provider::new(
        ListPage::new("ipaddress.com", ["https://www.ipaddress.com/proxy-list/"]),
        ProviderConfig::new(http_family()),
    ));
    catalog.push(Provider::new(
        ListPage::new(
            "pubproxy.com",
            ["http://pubproxy.com/api/proxy?limit=20&format=txt"],
        ),
        ProviderConfig::new(http_family()).with_max_conn(1),
    ));

    catalog.push(Provider::new(ProxyListOrg, ProviderConfig::new(http_family())));
    catalog.push(Provider::new(Xseo, ProviderConfig::new(http_family())));
    catalog.push(Provider::new(Spys, ProviderConfig::new(http_family())));

    catalog.push(Provider::new(
        ListPage::new(
            "list.proxylistplus.com",
            ["Fresh-HTTP-Proxy", "SSL", "Socks"].iter().flat_map(|kind| {
                (1..7).map(move |n| {
                    format!("http://list.proxylistplus.com/{}-List-{}", kind, n)
                })
            }),
        ),
        ProviderConfig::new(http_family()),
    ));

    catalog.push(Provider::new(ProxyListMe, ProviderConfig::new(http_family())));
    catalog.push(Provider::new(
        ListPage::new(
            "foxtools.ru",
            (1..3).map(|n| format!("http://api.foxtools.ru/v2/Proxy.txt?page={}", n)),
        ),
        ProviderConfig::new(http_family()).with_max_conn(1),
    ));
    catalog.push(Provider::new(GatherProxy, ProviderConfig::new(http_family())));
    catalog.push(Provider::new(Nntime, ProviderConfig::new(http_family())));
    catalog.push(Provider::new(
        GatherProxySocks,
        ProviderConfig::new(vec![Proto::Socks4, Proto::Socks5]),
    ));
    catalog.push(Provider::new(
        MyProxy,
        ProviderConfig::default().with_max_conn(2),
    ));
    catalog.push(Provider::new(CheckerProxy, ProviderConfig::default()));
    catalog.push(Provider::new(
        ListPage::new(
            "aliveproxy.com",
            [
                "socks5-list",
                "high-anonymity-proxy-list",
                "anonymous-proxy-list",
                "fastest-proxies",
                "us-proxy-list",
                "gb-proxy-list",
                "fr-proxy-list",
                "de-proxy-list",
                "jp-proxy-list",
                "ca-proxy-list",
                "ru-proxy-list",
                "proxy-list-port-80",
                "proxy-list-port-81",
                "proxy-list-port-3128",
                "proxy-list-port-8000",
                "proxy-list-port-8080",
            ]
            .iter()
            .map(|path| format!("http://www.aliveproxy.com/{}/", path)),
        ),
        ProviderConfig::default(),
    ));
    catalog.push(Provider::new(Webanetlabs, ProviderConfig::default()));
    catalog.push(Provider::new(
        ListPage::new(
            "www.proxy-list.download",
            [
                "https://www.proxy-list.download/api/v1/get?type=http",
                "https://www.proxy-list.download/api/v1/get?type=https",
            ],
        ),
        ProviderConfig::new(http_family()),
    ));
    catalog.push(Provider::new(
        ListPage::new(
            "www.proxy-list.download^socks4",
            ["https://www.proxy-list.download/api/v1/get?type=socks4"],
        ),
        ProviderConfig::new(vec![Proto::Socks4]),
    ));
    catalog.push(Provider::new(
        ListPage::new(
            "www.proxy-list.download^socks5",
            ["https://www.proxy-list.download/api/v1/get?type=socks5"],
        ),
        ProviderConfig::new(vec![Proto::Socks5]),
    ));
    catalog.push(Provider::new(
        ListPage::new("proxylists.net", ["http://www.proxylists.net/"]),
        ProviderConfig::new(http_family()),
    ));
    catalog.push(Provider::new(
        ListPage::new("marcosbl.com", ["https://www.marcosbl.com/lab/proxies/"]),
        ProviderConfig::new(http_family()),
    ));
    catalog.push(Provider::new(ProxyNova, ProviderConfig::new(http_family())));
    catalog.push(Provider::new(FreeProxyCz, ProviderConfig::default()));

    catalog
}
