//! kwoon plan - recommended and custom training plans

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use kwoon_domain::{EngineEvent, PlanTemplate};
use shared::DocumentFormat;

use crate::context::Context;
use crate::render;

#[derive(Debug, Args)]
pub struct PlanCommand {
    #[command(subcommand)]
    pub action: PlanAction,
}

#[derive(Debug, Subcommand)]
pub enum PlanAction {
    /// List recommended and custom plans
    List,
    /// Show the phases and items of a plan
    Show {
        plan: String,
    },
    /// Run a plan as a timed session
    Run {
        plan: String,

        /// Session seconds advanced per real second
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        speed: u64,
    },
    /// Add or replace a custom plan from a YAML or JSON file
    Add {
        file: PathBuf,
    },
    /// Remove a custom plan
    Remove {
        plan: String,
    },
}

impl PlanCommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        match &self.action {
            PlanAction::List => list(ctx),
            PlanAction::Show { plan } => show(ctx, plan),
            PlanAction::Run { plan, speed } => run_session(ctx, plan, *speed),
            PlanAction::Add { file } => add(ctx, file),
            PlanAction::Remove { plan } => {
                let removed = ctx.dojo.remove_custom_plan(plan)?;
                if !ctx.json {
                    println!("{} Removed plan {}", style("✓").green(), removed.name);
                }
                Ok(())
            }
        }
    }
}

fn find_plan<'a>(ctx: &'a Context, id: &str) -> anyhow::Result<&'a PlanTemplate> {
    ctx.dojo
        .plans()
        .into_iter()
        .find(|p| p.id.as_str() == id)
        .with_context(|| format!("Unknown plan: {}", id))
}

fn list(ctx: &Context) -> anyhow::Result<()> {
    ctx.profile()?;
    let plans = ctx.dojo.plans();

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    for plan in plans {
        let origin = if ctx.dojo.catalog().plan(plan.id.as_str()).is_some() {
            match (plan.category, plan.difficulty) {
                (Some(category), Some(difficulty)) => format!("{:?}/{:?}", category, difficulty),
                _ => "recommended".to_string(),
            }
        } else {
            "custom".to_string()
        };
        println!(
            "  {:<18} {:<26} {} {:>5} XP {:>3} stamina {:>6}",
            plan.id.as_str(),
            plan.name,
            style(format!("{:<24}", origin)).dim(),
            plan.xp_reward,
            plan.stamina_cost,
            render::clock(plan.total_duration_seconds())
        );
    }
    Ok(())
}

fn show(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let plan = find_plan(ctx, id)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(plan)?);
        return Ok(());
    }

    println!(
        "{} ({} XP, {} stamina, {})",
        style(&plan.name).bold(),
        plan.xp_reward,
        plan.stamina_cost,
        render::clock(plan.total_duration_seconds())
    );
    for phase in &plan.phases {
        println!("  {}", style(phase.kind).underlined());
        for item in &phase.items {
            println!(
                "    {:>6}  {}",
                render::clock(u64::from(item.duration_seconds)),
                render::activity_title(ctx.dojo.catalog(), &item.activity_id)
            );
        }
    }
    Ok(())
}

fn add(ctx: &mut Context, file: &Path) -> anyhow::Result<()> {
    let plan: PlanTemplate = DocumentFormat::read_file(file)
        .with_context(|| format!("Failed to read plan from {}", file.display()))?;
    let name = plan.name.clone();

    ctx.dojo.add_custom_plan(plan)?;
    if !ctx.json {
        println!("{} Saved plan {}", style("✓").green(), name);
    }
    Ok(())
}

/// Drive a session in real time until it completes
fn run_session(ctx: &mut Context, id: &str, speed: u64) -> anyhow::Result<()> {
    let events = ctx.dojo.start_plan(id, ctx.now())?;
    ctx.report(&events)?;

    let bar = if ctx.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    bar.set_style(
        ProgressStyle::with_template("{prefix:>9.bold} [{bar:30.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    loop {
        let Some(session) = ctx.dojo.session() else {
            break;
        };
        let Some(item) = session.current_item() else {
            break;
        };

        bar.set_length(u64::from(item.duration_seconds));
        bar.set_position(session.elapsed_in_item());
        if let Some(kind) = session.current_phase() {
            bar.set_prefix(kind.to_string());
        }
        bar.set_message(format!(
            "{} {}",
            render::activity_title(ctx.dojo.catalog(), &item.activity_id),
            render::clock(session.remaining_in_item())
        ));

        thread::sleep(Duration::from_secs(1));
        let events = ctx.dojo.tick(speed, ctx.now())?;

        for event in &events {
            if matches!(event, EngineEvent::ItemAdvanced { .. }) {
                continue;
            }
            if ctx.json {
                println!("{}", serde_json::to_string(event)?);
            } else {
                bar.println(render::event_line(event, ctx.dojo.catalog()));
            }
        }
    }

    bar.finish_and_clear();
    Ok(())
}
