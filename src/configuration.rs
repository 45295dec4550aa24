use crate::provider::Provider;
use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

/// Optional per-source overrides loaded from config.toml, keyed by source
/// name:
///
/// ```toml
/// [sources."gatherproxy.com"]
/// enabled = false
///
/// [sources."checkerproxy.net"]
/// max_conn = 2
/// timeout = 30
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub sources: HashMap<String, SourceSettings>,
}

#[derive(Debug, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub max_conn: Option<usize>,
    pub max_tries: Option<usize>,
    pub timeout: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl Settings {
    pub fn new() -> Result<Self> {
        let config_data = fs::read_to_string("config.toml").unwrap_or_default();
        if config_data.is_empty() {
            return Ok(Settings::default());
        }
        Ok(toml::from_str(&config_data)?)
    }

    /// Drop disabled sources and apply limit overrides to the rest.
    pub fn apply(&self, catalog: Vec<Provider>) -> Vec<Provider> {
        catalog
            .into_iter()
            .filter_map(|mut provider| {
                if let Some(overrides) = self.sources.get(provider.name()) {
                    if !overrides.enabled {
                        return None;
                    }
                    if let Some(max_conn) = overrides.max_conn {
                        provider.config.max_conn = max_conn.max(1);
                    }
                    if let Some(max_tries) = overrides.max_tries {
                        provider.config.max_tries = max_tries.max(1);
                    }
                    if let Some(timeout) = overrides.timeout {
                        provider.config.timeout_secs = timeout;
                    }
                }
                Some(provider)
            })
            .collect()
    }
}
