//! `linkpilot orphans`: published documents nothing links to.

use anyhow::Result;

use linkpilot_core::models::OrphanResult;
use linkpilot_core::Engine;

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// One page of orphans. Empty `types` scans `[orphans].post_types`, and a
/// missing `per_page` falls back to `[orphans].per_page`.
pub async fn find_orphans(
    config: &Config,
    types: &[String],
    page: usize,
    per_page: Option<usize>,
) -> Result<OrphanResult> {
    let store = SqliteStore::open(config).await?;
    let site = config.site_context()?;
    let signals = config.exclusion_signals();
    let settings = config.engine_settings();

    Engine::new(&store, &site, &signals, &settings)
        .list_orphans(types, page, per_page.unwrap_or(config.orphans.per_page))
        .await
}

pub async fn run_orphans(
    config: &Config,
    types: &[String],
    page: usize,
    per_page: Option<usize>,
    json: bool,
) -> Result<()> {
    let result = find_orphans(config, types, page, per_page).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.total == 0 {
        println!("No orphaned content.");
        return Ok(());
    }

    for o in &result.posts {
        println!("{:>8}  {:<6} {}  {}", o.id, o.doc_type, o.date, o.title);
        println!("          {}", o.url);
    }
    println!();
    println!(
        "page {} of {} ({} orphaned)",
        result.current_page, result.total_pages, result.total
    );
    Ok(())
}
