//! kwoon theme / avatar / achievements

use clap::Args;
use console::style;

use crate::context::Context;

#[derive(Debug, Args)]
pub struct ThemeCommand {
    /// Theme to switch to; lists themes when omitted
    pub theme: Option<String>,
}

impl ThemeCommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        if let Some(theme) = &self.theme {
            ctx.dojo.set_theme(theme)?;
            if !ctx.json {
                println!("{} Theme set to {}", style("✓").green(), theme);
            }
            return Ok(());
        }

        let current = ctx.profile()?.theme();
        let themes = ctx.dojo.catalog().themes();
        if ctx.json {
            println!("{}", serde_json::json!({ "current": current, "themes": themes }));
            return Ok(());
        }
        for theme in themes {
            let marker = if theme == current { "*" } else { " " };
            println!("{} {}", marker, theme);
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct AvatarCommand {
    /// Avatar to switch to; lists avatars when omitted
    pub avatar: Option<String>,
}

impl AvatarCommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        if let Some(avatar) = &self.avatar {
            ctx.dojo.set_avatar(avatar)?;
            if !ctx.json {
                println!("{} Avatar set to {}", style("✓").green(), avatar);
            }
            return Ok(());
        }

        let profile = ctx.profile()?;
        let level = profile.rank_level();
        let avatars = ctx.dojo.catalog().avatars();
        if ctx.json {
            println!("{}", serde_json::to_string_pretty(avatars)?);
            return Ok(());
        }
        for avatar in avatars {
            let marker = if profile.avatar() == Some(avatar.id.as_str()) { "*" } else { " " };
            let lock = if avatar.required_rank > level {
                style(format!("(belt {})", avatar.required_rank)).red().to_string()
            } else {
                String::new()
            };
            println!("{} {:<10} {}", marker, avatar.id, lock);
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct AchievementsCommand {}

impl AchievementsCommand {
    pub fn run(&self, ctx: &mut Context) -> anyhow::Result<()> {
        let profile = ctx.profile()?;
        let achievements = ctx.dojo.catalog().achievements();

        if ctx.json {
            let unlocked: Vec<_> = achievements
                .iter()
                .map(|a| {
                    serde_json::json!({
                        "key": a.key,
                        "title": a.title,
                        "unlocked": profile.has_achievement(&a.key),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&unlocked)?);
            return Ok(());
        }

        for achievement in achievements {
            if profile.has_achievement(&achievement.key) {
                println!(
                    "{} {}  {}",
                    style("🏆").yellow(),
                    style(&achievement.title).bold(),
                    style(&achievement.description).dim()
                );
            } else {
                println!(
                    "{} {}  {}",
                    style("·").dim(),
                    style(&achievement.title).dim(),
                    achievement.description
                );
            }
        }
        Ok(())
    }
}
