//! CLI subcommands.

pub mod copy;
pub mod goto;
pub mod init;
pub mod track;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use waymark_core::{
    Clipboard, CommandClipboard, Config, NoClipboard, Page, SimulatedViewport, StaticLayout,
    ViewportEvents,
};

/// A page composed on a simulated viewport.
pub struct SimulatedPage {
    pub page: Page<Box<dyn Clipboard>>,
    pub viewport: Arc<SimulatedViewport>,
    pub config: Config,
}

/// Load the config and compose a page from its regions.
pub fn open_page(config_path: &Path) -> Result<SimulatedPage> {
    let config = Config::load(config_path)?;

    if config.regions.is_empty() {
        anyhow::bail!(
            "No regions configured in {}. Run 'waymark init' first.",
            config_path.display()
        );
    }

    let layout = StaticLayout::from_specs(&config.regions).context("Invalid page layout")?;
    let events = ViewportEvents::new();
    let viewport = Arc::new(SimulatedViewport::new(events.clone()));

    let page = Page::new(
        &config,
        Arc::new(layout),
        viewport.clone(),
        events,
        clipboard_for(&config),
    )
    .context("Invalid observer configuration")?;

    Ok(SimulatedPage {
        page,
        viewport,
        config,
    })
}

fn clipboard_for(config: &Config) -> Box<dyn Clipboard> {
    match config
        .clipboard
        .command
        .as_deref()
        .and_then(CommandClipboard::from_argv)
    {
        Some(clipboard) => Box::new(clipboard),
        None => Box::new(NoClipboard),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn refuses_config_without_regions() {
        let temp = tempdir().unwrap();

        let result = open_page(&temp.path().join("waymark.toml"));

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn composes_page_from_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("waymark.toml");
        fs::write(&path, init::DEFAULT_CONFIG).unwrap();

        let simulated = open_page(&path).unwrap();

        assert_eq!(simulated.page.active_section().as_ref(), "home");
        assert!(simulated.config.snippet("install").is_some());
    }
}
