//! `list` command: importers and their datasource catalogs

use crate::app::services::importers::{Importer, ImporterKind};
use anyhow::Result;
use colored::*;

pub fn run_list() -> Result<()> {
    for importer in ImporterKind::all() {
        let provider = importer.provider();
        println!(
            "{} {}",
            importer.name().bold(),
            format!("({}, {})", provider.name, provider.label).dimmed()
        );
        for datasource_id in importer.datasource_ids() {
            println!("  {}", datasource_id);
        }
        println!();
    }
    Ok(())
}
