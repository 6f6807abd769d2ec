//! kwoon activities / train / daily

use clap::Args;
use console::style;
use kwoon_domain::Discipline;

use crate::context::Context;
use crate::render;

#[derive(Debug, Args)]
pub struct ActivitiesCommand {
    /// Include activities locked behind a higher belt
    #[arg(long)]
    pub all: bool,

    /// Only list one discipline
    #[arg(long, value_parser = parse_discipline)]
    pub discipline: Option<Discipline>,
}

fn parse_discipline(value: &str) -> Result<Discipline, String> {
    match value.to_ascii_lowercase().as_str() {
        "skill" => Ok(Discipline::Skill),
        "conditioning" => Ok(Discipline::Conditioning),
        other => Err(format!("unknown discipline '{}' (skill, conditioning)", other)),
    }
}

impl ActivitiesCommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        let level = ctx.profile()?.rank_level();
        let activities: Vec<_> = ctx
            .dojo
            .catalog()
            .activities()
            .iter()
            .filter(|a| self.all || a.is_unlocked_at(level))
            .filter(|a| self.discipline.map_or(true, |d| a.discipline == d))
            .collect();

        if ctx.json {
            println!("{}", serde_json::to_string_pretty(&activities)?);
            return Ok(());
        }

        let mut group = "";
        for activity in activities {
            if activity.group != group {
                group = &activity.group;
                println!("{}", style(group).bold().underlined());
            }
            let lock = if activity.is_unlocked_at(level) {
                String::new()
            } else {
                format!(" {}", style(format!("(belt {})", activity.required_rank)).red())
            };
            println!(
                "  {:<24} {:<34} {:>4} XP {:>3} stamina {:>5}{}",
                activity.id.as_str(),
                activity.title,
                activity.xp_yield,
                activity.stamina_cost,
                render::clock(u64::from(activity.duration_seconds)),
                lock
            );
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct TrainCommand {
    /// Activity id, see `kwoon activities`
    pub activity: String,
}

impl TrainCommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        let events = ctx.dojo.complete_activity(&self.activity, ctx.now())?;
        ctx.report(&events)
    }
}

#[derive(Debug, Args)]
pub struct DailyCommand {
    /// Complete today's challenge right away
    #[arg(long)]
    pub complete: bool,
}

impl DailyCommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        let profile = ctx.profile()?;
        let daily = profile.daily().clone();
        let streak = profile.streak();

        let Some(activity) = daily.activity else {
            println!("No challenge available today");
            return Ok(());
        };

        if self.complete && !daily.completed {
            let events = ctx.dojo.complete_activity(activity.as_str(), ctx.now())?;
            return ctx.report(&events);
        }

        if ctx.json {
            println!("{}", serde_json::to_string_pretty(ctx.profile()?.daily())?);
            return Ok(());
        }

        println!(
            "Today's challenge: {} ({})",
            style(render::activity_title(ctx.dojo.catalog(), &activity)).cyan().bold(),
            activity
        );
        if daily.completed {
            println!("{} Done. Streak: {} day(s)", style("✓").green(), streak);
        } else {
            println!("Streak: {} day(s). Run `kwoon daily --complete` to train it", streak);
        }
        Ok(())
    }
}
