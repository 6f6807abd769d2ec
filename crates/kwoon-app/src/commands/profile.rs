//! kwoon init / status / edit / reset

use anyhow::bail;
use clap::Args;
use console::style;
use kwoon_domain::NewProfile;

use crate::context::Context;
use crate::render;

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Display name
    #[arg(long)]
    pub name: String,

    /// Height in centimetres
    #[arg(long)]
    pub height: Option<f64>,

    /// Weight in kilograms
    #[arg(long)]
    pub weight: Option<f64>,

    /// Avatar id (must be available at the first belt)
    #[arg(long)]
    pub avatar: Option<String>,
}

impl InitCommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        let input = NewProfile {
            name: self.name.clone(),
            height_cm: self.height,
            weight_kg: self.weight,
            avatar: self.avatar.clone(),
        };
        let events = ctx.dojo.create_profile(input, ctx.now())?;

        if !ctx.json {
            let profile = ctx.profile()?;
            println!(
                "{} Welcome to the kwoon, {} ({})",
                style("✓").green(),
                style(profile.name()).bold(),
                profile.student_id()
            );
        }
        ctx.report(&events)
    }
}

#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Keep the "new content" markers instead of clearing them
    #[arg(long)]
    pub keep_markers: bool,
}

impl StatusCommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        let progress = ctx.dojo.progress()?;

        if ctx.json {
            let mut document = ctx.dojo.export()?;
            document["rank"] = serde_json::json!({
                "level": progress.current.level,
                "name": progress.current.name,
                "xpToNext": progress.xp_to_next,
                "percent": progress.percent,
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
            return Ok(());
        }

        let catalog = ctx.dojo.catalog();
        let profile = ctx.profile()?;

        println!("{} {}", style(profile.name()).bold(), style(profile.student_id()).dim());
        println!(
            "  Belt:     {} {} {}%",
            style(&progress.current.name).yellow().bold(),
            render::rank_bar(&progress, 20),
            progress.percent
        );
        match &progress.next {
            Some(next) => println!(
                "  XP:       {} ({} to {})",
                progress.xp, progress.xp_to_next, next.name
            ),
            None => println!("  XP:       {} (highest belt)", progress.xp),
        }
        println!("  Stamina:  {}/{}", profile.stamina(), profile.max_stamina());
        println!("  Streak:   {} day(s)", profile.streak());

        let daily = profile.daily();
        match &daily.activity {
            Some(activity) => println!(
                "  Today:    {} {}",
                render::activity_title(catalog, activity),
                if daily.completed {
                    style("(done)").green()
                } else {
                    style("(open)").cyan()
                }
            ),
            None => println!("  Today:    no challenge available"),
        }
        println!(
            "  Trained:  {} min, {}/{} achievements",
            profile.total_training_seconds() / 60,
            profile.achievements().len(),
            catalog.achievements().len()
        );
        if let Some(bmi) = profile.bmi() {
            println!("  BMI:      {:.1}", bmi);
        }

        let markers = profile.new_content();
        if markers.belts {
            println!("{} New belt unlocked!", style("★").yellow());
        }
        if markers.skill {
            println!("{} New skills are available to train", style("★").yellow());
        }
        if (markers.belts || markers.skill || profile.is_new()) && !self.keep_markers {
            ctx.dojo.acknowledge_new_content()?;
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct EditCommand {
    /// New display name (defaults to the current one)
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub height: Option<f64>,

    #[arg(long)]
    pub weight: Option<f64>,

    /// Switch avatar (must be unlocked at the current belt)
    #[arg(long)]
    pub avatar: Option<String>,
}

impl EditCommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        let profile = ctx.profile()?;
        let input = NewProfile {
            name: self.name.clone().unwrap_or_else(|| profile.name().to_string()),
            height_cm: self.height.or(profile.height_cm()),
            weight_kg: self.weight.or(profile.weight_kg()),
            avatar: self.avatar.clone(),
        };

        ctx.dojo.update_details(input)?;
        if !ctx.json {
            println!("{} Profile updated", style("✓").green());
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct ResetCommand {
    /// Confirm that the profile should be deleted
    #[arg(long)]
    pub yes: bool,
}

impl ResetCommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        if !self.yes {
            bail!("Refusing to delete the profile without --yes");
        }
        ctx.dojo.reset()?;
        if !ctx.json {
            println!("{} Profile deleted", style("✓").green());
        }
        Ok(())
    }
}
