use crate::document::Placement;
use arxivgpt_core::config::SiteEntry;
use arxivgpt_core::types::{ColorScheme, PromptSource, TriggerMode};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRequest {
    pub host: String,
    pub seed_text: String,
    pub prompt_source: PromptSource,
    pub site_entry: SiteEntry,
    pub trigger_mode: TriggerMode,
    pub color_scheme: ColorScheme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedContainer {
    pub placement: Placement,
    pub target_selector: String,
    pub classes: Vec<String>,
}

impl MountedContainer {
    pub fn is_fallback(&self) -> bool {
        self.placement == Placement::Fallback
    }
}

#[async_trait]
pub trait UiLayer: Send + Sync {
    async fn render(
        &self,
        request: &MountRequest,
        container: &MountedContainer,
    ) -> anyhow::Result<()>;
}
