use crate::defaults::default_user_config;
use crate::storage::{MemoryStorage, StorageBackend, StoredItems};
use anyhow::Context;
use arxivgpt_core::config::{
    KEY_LANGUAGE, KEY_LEGACY_SUPPORTED_URLS, KEY_SITE_CONFIGS, KEY_SUPPORTED_HOSTS, KEY_THEME,
    KEY_TRIGGER_MODE, SiteConfigs, SiteEntry, USER_CONFIG_KEYS, UserConfig, UserConfigPatch,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct ConfigStore {
    backend: Arc<dyn StorageBackend>,
    defaults: UserConfig,
}

impl ConfigStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_defaults(backend, default_user_config())
    }

    pub fn with_defaults(backend: Arc<dyn StorageBackend>, defaults: UserConfig) -> Self {
        Self { backend, defaults }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn defaults(&self) -> &UserConfig {
        &self.defaults
    }

    /// Stored config merged over the defaults. Never fails: if the backend
    /// cannot be read the defaults are returned as they are.
    pub async fn read(&self) -> UserConfig {
        match self.try_read().await {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("config read failed, using defaults: {e:#}");
                self.defaults.clone()
            }
        }
    }

    // Read-modify-write callers use this so a failed read never becomes a
    // write of the defaults.
    pub async fn try_read(&self) -> anyhow::Result<UserConfig> {
        let mut keys = USER_CONFIG_KEYS.to_vec();
        keys.push(KEY_LEGACY_SUPPORTED_URLS);
        let stored = self
            .backend
            .get(&keys)
            .await
            .context("read user config")?;
        Ok(merge_stored(self.defaults.clone(), &stored))
    }

    pub async fn write(&self, patch: UserConfigPatch) -> anyhow::Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let items = match serde_json::to_value(&patch).context("encode config patch")? {
            Value::Object(items) => items,
            _ => anyhow::bail!("config patch did not encode as an object"),
        };

        log::debug!(
            "writing config keys: {:?}",
            items.keys().collect::<Vec<_>>()
        );
        self.backend
            .set(items)
            .await
            .context("write user config")
    }
}

fn merge_stored(mut cfg: UserConfig, stored: &StoredItems) -> UserConfig {
    let default_sites = cfg.site_configs.clone();

    cfg.apply(UserConfigPatch {
        supported_hosts: decode_key(stored, KEY_SUPPORTED_HOSTS)
            .or_else(|| decode_key(stored, KEY_LEGACY_SUPPORTED_URLS)),
        site_configs: decode_site_configs(stored),
        trigger_mode: decode_key(stored, KEY_TRIGGER_MODE),
        theme: decode_key(stored, KEY_THEME),
        language: decode_key(stored, KEY_LANGUAGE),
    });

    // A supported host whose stored entry is gone gets the built-in one back if there is one.
    for host in &cfg.supported_hosts {
        if cfg.site_configs.contains_key(host) {
            continue;
        }
        if let Some(entry) = default_sites.get(host) {
            cfg.site_configs.insert(host.clone(), entry.clone());
        }
    }

    cfg
}

fn decode_key<T: DeserializeOwned>(stored: &StoredItems, key: &str) -> Option<T> {
    let value = stored.get(key).filter(|v| !v.is_null())?;
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("ignoring stored {key}: {e}");
            None
        }
    }
}

// Entries are decoded one by one; a bad entry only drops itself.
fn decode_site_configs(stored: &StoredItems) -> Option<SiteConfigs> {
    let value = stored.get(KEY_SITE_CONFIGS).filter(|v| !v.is_null())?;
    let Value::Object(entries) = value else {
        log::warn!("ignoring stored {KEY_SITE_CONFIGS}: not an object");
        return None;
    };

    let mut sites = SiteConfigs::new();
    for (host, raw) in entries {
        match serde_json::from_value::<SiteEntry>(raw.clone()) {
            Ok(entry) => {
                sites.insert(host.clone(), entry);
            }
            Err(e) => log::warn!("ignoring stored site config for {host}: {e}"),
        }
    }
    Some(sites)
}
