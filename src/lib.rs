pub mod codec;
pub mod configuration;
pub mod endpoint;
pub mod extract;
pub mod fetcher;
pub mod provider;
pub mod sources;

pub use endpoint::{EndpointRecord, Proto};
pub use fetcher::{Fetch, FetchRequest};
pub use provider::{Provider, ProviderConfig, Source};
