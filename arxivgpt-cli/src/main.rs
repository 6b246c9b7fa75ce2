use anyhow::Context;
use arxivgpt_core::types::ColorScheme;
use arxivgpt_engine::document::{Document, Page};
use arxivgpt_engine::outcome::MountOutcome;
use arxivgpt_engine::planner::MountPlanner;
use arxivgpt_engine::ui::StdoutUi;
use arxivgpt_runtime::config_store::ConfigStore;
use arxivgpt_runtime::storage::JsonFileStorage;
use std::sync::Arc;

const USAGE: &str = "usage: arxivgpt-cli <host> <page.html> [storage.json]";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Dry run of the content script: plan a mount for a saved page and show the result.
    // Set ARXIVGPT_DARK=1 to pretend the page prefers a dark color scheme.

    let mut args = std::env::args().skip(1);
    let host = args.next().context(USAGE)?;
    let html_path = args.next().context(USAGE)?;
    let storage_path = args.next();

    let html = std::fs::read_to_string(&html_path)
        .with_context(|| format!("read page: {html_path}"))?;

    let store = match storage_path {
        Some(path) => ConfigStore::new(Arc::new(JsonFileStorage::at_path(path))),
        None => ConfigStore::in_memory(),
    };

    let scheme = match std::env::var("ARXIVGPT_DARK").as_deref() {
        Ok("1") => ColorScheme::Dark,
        _ => ColorScheme::Light,
    };
    let page = Page::new(host, Document::parse(&html))
        .with_color_scheme(scheme)
        .shared();

    let planner = MountPlanner::new(store, Arc::new(StdoutUi));
    let outcome = planner.run(&page).await?;

    println!("state={}", outcome.state().as_str());
    match &outcome {
        MountOutcome::Mounted(report) => {
            println!(
                "container: {:?} in {} classes={:?}",
                report.container.placement,
                report.container.target_selector,
                report.container.classes
            );
            if let Some(err) = &report.render_error {
                println!("render error: {err}");
            }
        }
        MountOutcome::Unsupported { host } => println!("{host} is not a supported site"),
        other => println!("{other:?}"),
    }

    Ok(())
}
