//! Write a starter configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());
    tracing::info!("Run 'waymark track 0 750 1150' to try it out.");

    Ok(())
}

pub(crate) const DEFAULT_CONFIG: &str = r#"# Waymark Configuration

[observer]
# Added to the scroll offset to clear the fixed header
bias = 100.0

# Sections in priority order; the first one starts active
sections = ["home", "features", "quickstart", "docs"]

[flags]
# How long "Copied!" stays on a copy button
expiry_ms = 2000

[clipboard]
# Program that reads clipboard text from stdin
# command = ["wl-copy"]
# command = ["pbcopy"]
# command = ["xclip", "-selection", "clipboard"]

[[region]]
key = "home"
start = 0.0
height = 800.0

[[region]]
key = "features"
start = 800.0
height = 400.0

[[region]]
key = "quickstart"
start = 1200.0
height = 400.0

[[region]]
key = "docs"
start = 1600.0
height = 900.0

[[snippet]]
id = "install"
language = "bash"
source = "npm install diaflow"

[[snippet]]
id = "quickstart"
source = """
import { Agent } from "diaflow";

const agent = new Agent({ model: "gemini-2.0-flash" });
const reply = await agent.run("Hello!");
"""
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use waymark_core::Config;

    #[tokio::test]
    async fn writes_loadable_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("waymark.toml");

        run(&path, false).await.unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.regions.len(), 4);
        assert_eq!(config.snippets.len(), 2);
        assert_eq!(config.observer, Config::default().observer);
    }

    #[tokio::test]
    async fn keeps_existing_config_without_yes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("waymark.toml");
        fs::write(&path, "# mine\n").unwrap();

        run(&path, false).await.unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

        run(&path, true).await.unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
