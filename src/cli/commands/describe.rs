//! `describe` command: provider, subject types and attributes of a datasource

use super::shared::resolve_importer;
use crate::app::models::Datasource;
use crate::app::services::importers::Importer;
use crate::cli::args::{DescribeArgs, OutputFormat};
use anyhow::{Context, Result};
use colored::*;

pub fn run_describe(args: &DescribeArgs) -> Result<()> {
    let importer = resolve_importer(&args.importer)?;
    let datasource = importer
        .datasource(&args.datasource)
        .with_context(|| format!("Cannot describe {}/{}", args.importer, args.datasource))?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&datasource)
                .context("Failed to serialize datasource")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_text(&datasource),
    }
    Ok(())
}

fn print_text(datasource: &Datasource) {
    println!("{} {}", datasource.id.bold(), datasource.name);
    println!("  {}", datasource.description);
    println!(
        "  Provider: {} ({})",
        datasource.provider.name, datasource.provider.label
    );
    if let Some(url) = &datasource.url {
        println!("  Source:   {}", url.dimmed());
    }

    println!("{}", "Subject types".bold());
    for subject_type in &datasource.subject_types {
        println!("  {:<20} {}", subject_type.label, subject_type.name);
    }

    if !datasource.timed_value_attributes.is_empty() {
        println!(
            "{} ({})",
            "Timed value attributes".bold(),
            datasource.timed_value_attributes.len()
        );
    }
    for attribute in &datasource.timed_value_attributes {
        let unit = attribute.unit.as_deref().unwrap_or("-");
        println!("  {:<24} {:<10} {}", attribute.label, unit, attribute.description);
    }

    if !datasource.fixed_value_attributes.is_empty() {
        println!(
            "{} ({})",
            "Fixed value attributes".bold(),
            datasource.fixed_value_attributes.len()
        );
    }
    for attribute in &datasource.fixed_value_attributes {
        println!("  {:<24} {}", attribute.label, attribute.description);
    }
}
