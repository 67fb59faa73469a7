//! Replay scroll offsets against the configured layout.

use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use waymark_core::Scroller;

use super::{open_page, SimulatedPage};

const LISTENER_TIMEOUT: Duration = Duration::from_secs(5);

/// Active section after one scroll offset.
#[derive(Debug, Serialize, PartialEq)]
pub struct TrackedOffset {
    pub offset: f64,
    pub active: String,
    pub changed: bool,
}

/// Run the track command.
pub async fn run(config_path: &Path, offsets: Vec<f64>, json: bool) -> Result<()> {
    let offsets = if offsets.is_empty() {
        read_offsets(io::stdin().lock())?
    } else {
        offsets
    };

    for tracked in track(config_path, &offsets).await? {
        if json {
            println!("{}", serde_json::to_string(&tracked)?);
        } else {
            let marker = if tracked.changed { "*" } else { " " };
            println!("{:>8} {} {}", tracked.offset, marker, tracked.active);
        }
    }

    Ok(())
}

/// Scroll a freshly mounted page to each offset and record the active section.
pub async fn track(config_path: &Path, offsets: &[f64]) -> Result<Vec<TrackedOffset>> {
    let mut simulated = open_page(config_path)?;

    simulated.page.mount();
    let tracked = replay(&simulated, offsets).await;
    simulated.page.teardown().await;

    tracked
}

/// Feed offsets to the viewport and wait for the page's listener to handle each.
async fn replay(simulated: &SimulatedPage, offsets: &[f64]) -> Result<Vec<TrackedOffset>> {
    let page = &simulated.page;
    if !page.is_mounted() {
        anyhow::bail!("Page is not following scroll events");
    }

    let mut recomputes = page.observer().subscribe_recomputes();
    let mut tracked = Vec::with_capacity(offsets.len());

    for &requested in offsets {
        let before = page.active_section();
        recomputes.borrow_and_update();

        simulated.viewport.scroll_by_user(requested);
        tokio::time::timeout(LISTENER_TIMEOUT, recomputes.changed())
            .await
            .context("Scroll listener did not respond")?
            .context("Scroll listener stopped")?;

        let active = page.active_section();
        tracked.push(TrackedOffset {
            offset: simulated.viewport.offset(),
            changed: !Arc::ptr_eq(&before, &active),
            active: active.to_string(),
        });
    }

    Ok(tracked)
}

fn read_offsets(reader: impl BufRead) -> Result<Vec<f64>> {
    let mut offsets = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read offsets")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let offset: f64 = trimmed
            .parse()
            .with_context(|| format!("Invalid offset on line {}: {}", index + 1, trimmed))?;
        offsets.push(offset);
    }

    Ok(offsets)
}
