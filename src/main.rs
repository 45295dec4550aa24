use proxyscout::configuration::Settings;
use proxyscout::sources::default_catalog;

#[tokio::main]
async fn main() {
    // Initialize logger
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn) // Default warn
        .filter_module("proxyscout", log::LevelFilter::Debug) // proxyscout debug
        .init();

    let catalog = default_catalog();
    let catalog = match Settings::new() {
        Ok(settings) => settings.apply(catalog),
        Err(e) => {
            log::warn!("Failed to load config.toml: {}. Using the full catalog.", e);
            catalog
        }
    };

    let runs = catalog.iter().map(|provider| async move {
        let found = provider.run().await;
        (provider.name(), found)
    });

    let mut total = 0;
    for (name, found) in futures::future::join_all(runs).await {
        total += found.len();
        println!("{}: {} endpoints", name, found.len());
        for record in &found {
            println!("  {}", record);
        }
    }
    println!("total: {} candidate endpoints", total);
}
