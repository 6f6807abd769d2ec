//! kwoon import / export

use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use console::style;

use crate::context::Context;

#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Profile document previously written by `kwoon export`
    pub file: PathBuf,
}

impl ImportCommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        let content = fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let document: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", self.file.display()))?;

        let events = ctx.dojo.import(document, ctx.now())?;
        if !ctx.json {
            let profile = ctx.profile()?;
            println!(
                "{} Imported {} with {} XP",
                style("✓").green(),
                style(profile.name()).bold(),
                profile.xp()
            );
        }
        ctx.report(&events)
    }
}

#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ExportCommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        let document = serde_json::to_string_pretty(&ctx.dojo.export()?)?;

        match &self.output {
            Some(path) => {
                fs::write(path, document)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if !ctx.json {
                    println!("{} Exported to {}", style("✓").green(), path.display());
                }
            }
            None => println!("{}", document),
        }
        Ok(())
    }
}
