use crate::traits::{MountRequest, MountedContainer, UiLayer};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct StdoutUi;

#[async_trait::async_trait]
impl UiLayer for StdoutUi {
    async fn render(
        &self,
        request: &MountRequest,
        container: &MountedContainer,
    ) -> anyhow::Result<()> {
        println!(
            "[render:{:?} in {}] ({}, {:?}) {}",
            container.placement,
            container.target_selector,
            request.prompt_source.as_str(),
            request.trigger_mode,
            request.seed_text
        );
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct RecordingUi {
    pub rendered: Arc<Mutex<Vec<(MountRequest, MountedContainer)>>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(MountRequest, MountedContainer)> {
        match self.rendered.lock() {
            Ok(v) => v.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait::async_trait]
impl UiLayer for RecordingUi {
    async fn render(
        &self,
        request: &MountRequest,
        container: &MountedContainer,
    ) -> anyhow::Result<()> {
        let mut rendered = match self.rendered.lock() {
            Ok(v) => v,
            Err(poisoned) => poisoned.into_inner(),
        };
        rendered.push((request.clone(), container.clone()));
        Ok(())
    }
}
