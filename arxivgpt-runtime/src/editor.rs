use crate::config_store::ConfigStore;
use arxivgpt_core::config::{ConfigError, SiteEntry, UserConfig, UserConfigPatch};
use arxivgpt_core::types::{Language, Theme, TriggerMode};
use tokio::sync::Mutex;

/// Site edits rewrite `supportedHosts` and `siteConfigs` together in one write.
pub struct ConfigEditor {
    store: ConfigStore,
    edits: Mutex<()>,
}

impl ConfigEditor {
    pub fn new(store: ConfigStore) -> Self {
        Self {
            store,
            edits: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub async fn list_site_entries(&self) -> Vec<(String, SiteEntry)> {
        let cfg = self.store.read().await;
        cfg.supported_hosts
            .iter()
            .filter_map(|host| match cfg.site_entry(host) {
                Ok(entry) => Some((host.clone(), entry.clone())),
                Err(e) => {
                    log::error!("{e}");
                    None
                }
            })
            .collect()
    }

    pub async fn upsert_site_entry(&self, host: &str, entry: SiteEntry) -> anyhow::Result<()> {
        let host = clean_host(host)?;
        entry.validate()?;

        let _guard = self.edits.lock().await;
        let mut cfg = self.store.try_read().await?;
        if !cfg.supported_hosts.contains(&host) {
            cfg.supported_hosts.push(host.clone());
        }
        cfg.site_configs.insert(host.clone(), entry);

        log::info!("saving site config for {host}");
        self.write_sites(cfg).await
    }

    /// Saves an edited site card: the host may have been renamed as well.
    ///
    /// The new host takes the old one's place in the list. If the new host is
    /// already listed elsewhere, the old position is dropped instead.
    pub async fn rename_site_entry(
        &self,
        old_host: &str,
        new_host: &str,
        entry: SiteEntry,
    ) -> anyhow::Result<()> {
        let new_host = clean_host(new_host)?;
        entry.validate()?;

        let _guard = self.edits.lock().await;
        let mut cfg = self.store.try_read().await?;
        let idx = cfg
            .supported_hosts
            .iter()
            .position(|h| h == old_host)
            .ok_or_else(|| ConfigError::UnknownHost(old_host.to_string()))?;

        if new_host != old_host {
            if cfg.supported_hosts.contains(&new_host) {
                cfg.supported_hosts.remove(idx);
            } else {
                cfg.supported_hosts[idx] = new_host.clone();
            }
            cfg.site_configs.remove(old_host);
        }
        cfg.site_configs.insert(new_host.clone(), entry);

        log::info!("saving site config {old_host} -> {new_host}");
        self.write_sites(cfg).await
    }

    pub async fn remove_site_entry(&self, host: &str) -> anyhow::Result<()> {
        let _guard = self.edits.lock().await;
        let mut cfg = self.store.try_read().await?;
        let before = cfg.supported_hosts.len();
        cfg.supported_hosts.retain(|h| h != host);
        let removed_entry = cfg.site_configs.remove(host).is_some();

        if cfg.supported_hosts.len() == before && !removed_entry {
            return Err(ConfigError::UnknownHost(host.to_string()).into());
        }

        log::info!("removing site config for {host}");
        self.write_sites(cfg).await
    }

    pub async fn set_theme(&self, theme: Theme) -> anyhow::Result<()> {
        self.store.write(UserConfigPatch::theme(theme)).await
    }

    pub async fn set_trigger_mode(&self, mode: TriggerMode) -> anyhow::Result<()> {
        self.store.write(UserConfigPatch::trigger_mode(mode)).await
    }

    pub async fn set_language(&self, language: Language) -> anyhow::Result<()> {
        self.store.write(UserConfigPatch::language(language)).await
    }

    async fn write_sites(&self, cfg: UserConfig) -> anyhow::Result<()> {
        self.store
            .write(UserConfigPatch::sites(cfg.supported_hosts, cfg.site_configs))
            .await
    }
}

fn clean_host(host: &str) -> Result<String, ConfigError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ConfigError::EmptyHost);
    }
    Ok(host.to_string())
}
