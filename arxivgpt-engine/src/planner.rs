use crate::document::{CONTAINER_CLASS, FALLBACK_CLASS, Page, Placement, SharedPage};
use crate::outcome::{MountOutcome, MountReport, PlannerState};
use crate::resolver::resolve_first;
use crate::traits::{MountRequest, MountedContainer, UiLayer};
use arxivgpt_core::config::{ConfigError, SiteEntry, UserConfig};
use arxivgpt_core::site_match::match_host;
use arxivgpt_core::text::{compose_seed_text, extract_page_text};
use arxivgpt_core::types::PromptSource;
use arxivgpt_runtime::config_store::ConfigStore;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MountError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// `run` mounts at most one container and does nothing if one is already
/// present. `remount` tears the old container down first.
pub struct MountPlanner {
    store: ConfigStore,
    ui: Arc<dyn UiLayer>,
}

impl MountPlanner {
    pub fn new(store: ConfigStore, ui: Arc<dyn UiLayer>) -> Self {
        Self { store, ui }
    }

    pub async fn run(&self, page: &SharedPage) -> Result<MountOutcome, MountError> {
        enter(PlannerState::Idle);
        let outcome = self.plan(page).await?;
        enter(outcome.state());
        Ok(outcome)
    }

    pub async fn remount(&self, page: &SharedPage) -> Result<MountOutcome, MountError> {
        let removed = page.borrow_mut().document.remove_containers();
        if removed > 0 {
            log::debug!("removed {removed} container(s) before remount");
        }
        self.run(page).await
    }

    pub async fn append_question(&self, page: &SharedPage, index: usize, question: &str) -> bool {
        let cfg = self.store.read().await;

        let mut page = page.borrow_mut();
        let class = cfg.theme.resolve(page.color_scheme).css_class();
        let added = page.document.append_question(index, question, class);
        if !added {
            log::debug!("no question list on {}", page.host);
        }
        added
    }

    async fn plan(&self, page: &SharedPage) -> Result<MountOutcome, MountError> {
        enter(PlannerState::Resolving);
        let host = page.borrow().host.clone();

        // The page may go away while this is pending; checked again below.
        let cfg = self.store.read().await;

        let matched = match_host(&cfg.supported_hosts, &host);
        let Some(site_host) = matched.host() else {
            log::debug!("unsupported site: {host}");
            return Ok(MountOutcome::Unsupported { host });
        };
        let entry = cfg
            .site_entry(site_host)
            .inspect_err(|e| log::error!("{e}"))?
            .clone();
        log::info!("trying to mount on {site_host}");

        let mounted = mount_in_page(&mut page.borrow_mut(), site_host, &entry, &cfg);
        let (request, container) = match mounted {
            Ok(v) => v,
            Err(outcome) => return Ok(outcome),
        };

        let render_error = match self.ui.render(&request, &container).await {
            Ok(()) => None,
            Err(e) => {
                log::error!("assistant render failed on {site_host}: {e:#}");
                Some(e.to_string())
            }
        };

        Ok(MountOutcome::Mounted(MountReport {
            request,
            container,
            render_error,
        }))
    }
}

// Every DOM read and write of a mount happens here, under one borrow of the page.
fn mount_in_page(
    page: &mut Page,
    host: &str,
    entry: &SiteEntry,
    cfg: &UserConfig,
) -> Result<(MountRequest, MountedContainer), MountOutcome> {
    let doc = &mut page.document;
    if !doc.is_attached() {
        log::debug!("page for {host} is gone; not mounting");
        return Err(MountOutcome::Detached);
    }
    if doc.has_container() {
        log::debug!("assistant already mounted on {host}");
        return Err(MountOutcome::AlreadyMounted);
    }

    let page_text = resolve_first(doc, &entry.body_tag)
        .and_then(|body| extract_page_text(&body.text_content()));
    let Some(page_text) = page_text else {
        log::debug!("no body content on {host}");
        return Err(MountOutcome::NoBodyContent {
            host: host.to_string(),
        });
    };
    enter(PlannerState::Ready);
    log::debug!("body: {page_text}");

    let (placement, selector, source) = match resolve_first(doc, &entry.display_tag) {
        Some(r) => (Placement::Primary, r.selector, r.source),
        None => match resolve_first(doc, &entry.append_container) {
            Some(r) => {
                log::debug!("no display target on {host}; appending to {}", r.source);
                (Placement::Fallback, r.selector, r.source)
            }
            None => {
                log::debug!("no mount target on {host}");
                return Err(MountOutcome::NoMountTarget {
                    host: host.to_string(),
                });
            }
        },
    };

    let color_scheme = cfg.theme.resolve(page.color_scheme);
    let mut classes = vec![CONTAINER_CLASS, color_scheme.css_class()];
    if placement == Placement::Fallback {
        classes.push(FALLBACK_CLASS);
    }

    if !page.document.insert_container(&selector, placement, &classes) {
        return Err(MountOutcome::NoMountTarget {
            host: host.to_string(),
        });
    }

    let request = MountRequest {
        host: host.to_string(),
        seed_text: compose_seed_text(&entry.prompt, &page_text),
        prompt_source: PromptSource::Default,
        site_entry: entry.clone(),
        trigger_mode: cfg.trigger_mode,
        color_scheme,
    };
    let container = MountedContainer {
        placement,
        target_selector: source,
        classes: classes.into_iter().map(str::to_string).collect(),
    };
    Ok((request, container))
}

fn enter(state: PlannerState) {
    log::debug!("mount planner -> {}", state.as_str());
}
