//! Target listing

use crate::config::Config;
use crate::error::AuraError;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

/// Output formats of `aura list`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// Summary of one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetInfo<'a> {
    pub name: &'a str,
    pub commands: usize,
    #[serde(rename = "dependencies", skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<&'a str>,
}

/// Listing of all targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetListing<'a> {
    pub targets: Vec<TargetInfo<'a>>,
    pub total: usize,
}

impl<'a> TargetListing<'a> {
    /// Collect the targets of a configuration, sorted by name
    pub fn new(config: &'a Config) -> Self {
        let targets: Vec<TargetInfo<'a>> = config
            .target_names()
            .into_iter()
            .map(|name| {
                let target = &config.targets[name];
                TargetInfo {
                    name,
                    commands: target.run.len(),
                    deps: target.deps.iter().map(String::as_str).collect(),
                }
            })
            .collect();

        TargetListing {
            total: targets.len(),
            targets,
        }
    }
}

/// Write the targets of `config` in the requested format
pub fn print_targets<W: Write>(
    config: &Config,
    format: ListFormat,
    out: &mut W,
) -> Result<(), AuraError> {
    let listing = TargetListing::new(config);

    match format {
        ListFormat::Table => write_table(&listing, out)?,
        ListFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &listing)?;
            writeln!(out)?;
        }
        ListFormat::Yaml => serde_yaml::to_writer(&mut *out, &listing)?,
    }

    Ok(())
}

fn write_table<W: Write>(listing: &TargetListing<'_>, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", "Available targets:".bold())?;
    writeln!(out, "------------------")?;

    if listing.targets.is_empty() {
        writeln!(out, "No targets found")?;
        return Ok(());
    }

    let width = listing
        .targets
        .iter()
        .map(|info| info.name.len())
        .max()
        .unwrap_or(0);

    for info in &listing.targets {
        let deps = if info.deps.is_empty() {
            String::new()
        } else {
            format!(" (depends: {})", info.deps.join(", "))
        };
        writeln!(
            out,
            "  {:<width$}  {} commands{}",
            info.name.cyan(),
            info.commands,
            deps,
            width = width
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Total: {} targets", listing.total)
}
