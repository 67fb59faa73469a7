//! Copy a configured snippet.

use std::path::Path;

use anyhow::Result;
use waymark_core::{ClipboardError, Config};

use super::open_page;

/// Run the copy command.
pub async fn run(config_path: &Path, snippet_id: &str) -> Result<()> {
    let simulated = open_page(config_path)?;

    let Some(snippet) = simulated.config.snippet(snippet_id) else {
        let known: Vec<&str> = simulated
            .config
            .snippets
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        anyhow::bail!(
            "Unknown snippet '{}'. Available: {}",
            snippet_id,
            known.join(", ")
        );
    };

    // A failed write is already logged; the button still acknowledges the click
    let result = simulated.page.copy(&snippet.id, &snippet.source);

    println!(
        "[{}] {}: {}",
        snippet.language,
        snippet.id,
        simulated.page.copy_label(&snippet.id)
    );

    if needs_clipboard_command(&simulated.config, &result) {
        tracing::info!(
            "Set [clipboard] command in {} to enable copying",
            config_path.display()
        );
    }

    Ok(())
}

/// A failed copy only calls for setup when no clipboard program is configured.
fn needs_clipboard_command(config: &Config, result: &Result<(), ClipboardError>) -> bool {
    result.is_err() && config.clipboard.command.is_none()
}
