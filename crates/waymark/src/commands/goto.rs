//! Navigate to a section.

use std::path::Path;

use anyhow::Result;
use waymark_core::Scroller;

use super::open_page;

/// Where the viewport ended up after navigating.
#[derive(Debug, PartialEq)]
pub struct Arrival {
    pub offset: f64,
    pub active: String,
    pub found: bool,
}

/// Run the goto command.
pub async fn run(config_path: &Path, section: &str, from: f64) -> Result<()> {
    let arrival = goto(config_path, section, from).await?;

    if !arrival.found {
        println!("Unknown section '{}'; staying at {}", section, arrival.offset);
    }
    println!("offset: {}", arrival.offset);
    println!("active: {}", arrival.active);

    Ok(())
}

/// Start at `from`, navigate to `section` and report where the page lands.
pub async fn goto(config_path: &Path, section: &str, from: f64) -> Result<Arrival> {
    let mut simulated = open_page(config_path)?;
    let found = simulated.page.has_section(section);

    simulated.viewport.scroll_by_user(from);
    simulated.page.mount();

    simulated.page.navigate(section);

    // Settle on the final offset regardless of listener scheduling
    let offset = simulated.viewport.offset();
    simulated.page.on_scroll(offset);
    simulated.page.teardown().await;

    Ok(Arrival {
        offset,
        active: simulated.page.active_section().to_string(),
        found,
    })
}
