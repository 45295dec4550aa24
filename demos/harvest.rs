use proxyscout::endpoint::http_family;
use proxyscout::sources::ListPage;
use proxyscout::{Provider, ProviderConfig};

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    // One hand-picked source; use sources::default_catalog() for all of them.
    let provider = Provider::new(
        ListPage::new("free-proxy-list.net", ["https://free-proxy-list.net/"]),
        ProviderConfig::new(http_family()).with_timeout(10),
    );

    let found = provider.run().await;
    println!("{} candidate endpoints from {}", found.len(), provider.name());
    for record in found {
        println!("{}", record);
    }
}
