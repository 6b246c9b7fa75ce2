use crate::types::{Language, SelectorList, Theme, TriggerMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const KEY_SUPPORTED_HOSTS: &str = "supportedHosts";
pub const KEY_SITE_CONFIGS: &str = "siteConfigs";
pub const KEY_TRIGGER_MODE: &str = "triggerMode";
pub const KEY_THEME: &str = "theme";
pub const KEY_LANGUAGE: &str = "language";

// Host list key written by older releases of the options page.
pub const KEY_LEGACY_SUPPORTED_URLS: &str = "supportedURLs";

pub const USER_CONFIG_KEYS: [&str; 5] = [
    KEY_SUPPORTED_HOSTS,
    KEY_SITE_CONFIGS,
    KEY_TRIGGER_MODE,
    KEY_THEME,
    KEY_LANGUAGE,
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no site config for supported host {0:?}")]
    MissingSiteEntry(String),

    #[error("host {0:?} is not in the supported host list")]
    UnknownHost(String),

    #[error("host must not be empty")]
    EmptyHost,

    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteEntry {
    pub prompt: String,
    pub body_tag: SelectorList,
    pub display_tag: SelectorList,
    // Appended to when no display tag matches.
    #[serde(default, alias = "appendContainerQuery")]
    pub append_container: SelectorList,
}

impl SiteEntry {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.body_tag.validate()?;
        self.display_tag.validate()?;
        self.append_container.validate()
    }
}

pub type SiteConfigs = BTreeMap<String, SiteEntry>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    pub supported_hosts: Vec<String>,
    pub site_configs: SiteConfigs,
    pub trigger_mode: TriggerMode,
    pub theme: Theme,
    pub language: Language,
}

impl UserConfig {
    pub fn site_entry(&self, host: &str) -> Result<&SiteEntry, ConfigError> {
        self.site_configs
            .get(host)
            .ok_or_else(|| ConfigError::MissingSiteEntry(host.to_string()))
    }

    pub fn check_site_entries(&self) -> Result<(), ConfigError> {
        for host in &self.supported_hosts {
            self.site_entry(host)?;
        }
        Ok(())
    }

    pub fn apply(&mut self, patch: UserConfigPatch) {
        if let Some(v) = patch.supported_hosts {
            self.supported_hosts = v;
        }
        if let Some(v) = patch.site_configs {
            self.site_configs = v;
        }
        if let Some(v) = patch.trigger_mode {
            self.trigger_mode = v;
        }
        if let Some(v) = patch.theme {
            self.theme = v;
        }
        if let Some(v) = patch.language {
            self.language = v;
        }
    }
}

/// A partial `UserConfig`. Absent fields are left untouched by a write and
/// are not serialized, so a write only ever carries the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_hosts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_configs: Option<SiteConfigs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_mode: Option<TriggerMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl UserConfigPatch {
    pub fn theme(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            ..Default::default()
        }
    }

    pub fn trigger_mode(mode: TriggerMode) -> Self {
        Self {
            trigger_mode: Some(mode),
            ..Default::default()
        }
    }

    pub fn language(language: Language) -> Self {
        Self {
            language: Some(language),
            ..Default::default()
        }
    }

    pub fn sites(supported_hosts: Vec<String>, site_configs: SiteConfigs) -> Self {
        Self {
            supported_hosts: Some(supported_hosts),
            site_configs: Some(site_configs),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
