//! Terminal rendering helpers

use console::style;
use kwoon_domain::{ActivityId, Catalog, EngineEvent, RankProgress};

/// Human title of an activity, falling back to its id
pub fn activity_title<'a>(catalog: &'a Catalog, id: &'a ActivityId) -> &'a str {
    if *id == ActivityId::plan() {
        return "training plan";
    }
    catalog
        .activity(id)
        .map(|a| a.title.as_str())
        .unwrap_or_else(|| id.as_str())
}

/// One styled line per event
pub fn event_line(event: &EngineEvent, catalog: &Catalog) -> String {
    match event {
        EngineEvent::XpAwarded {
            amount,
            activity,
            total_xp,
        } => format!(
            "{} {} from {} (total {})",
            style("✓").green(),
            style(format!("+{} XP", amount)).green().bold(),
            activity_title(catalog, activity),
            total_xp
        ),
        EngineEvent::RankUp { to, .. } => {
            let name = catalog
                .ladder()
                .by_level(*to)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| format!("level {}", to));
            format!("{} Promoted to {}!", style("★").yellow(), style(name).yellow().bold())
        }
        EngineEvent::AchievementUnlocked { key } => {
            let title = catalog.achievement(key).map_or(key.as_str(), |a| a.title.as_str());
            format!(
                "{} Achievement unlocked: {}",
                style("🏆").yellow(),
                style(title).bold()
            )
        }
        EngineEvent::DailyChallengeAssigned {
            activity: Some(activity),
            ..
        } => format!(
            "{} Today's challenge: {}",
            style("•").cyan(),
            style(activity_title(catalog, activity)).cyan()
        ),
        EngineEvent::DailyChallengeCompleted { streak, .. } => format!(
            "{} Daily challenge done, streak {} day(s)",
            style("🔥").red(),
            style(streak).bold()
        ),
        EngineEvent::StreakReset { previous } => format!(
            "{} Yesterday's challenge was missed, streak of {} reset",
            style("!").red(),
            previous
        ),
        EngineEvent::ItemAdvanced { phase, item } => {
            format!("{} Next: item {} of phase {}", style("→").dim(), item + 1, phase + 1)
        }
        other => format!("{} {}", style("•").dim(), other),
    }
}

/// `[######----]` style bar for rank progress
pub fn rank_bar(progress: &RankProgress, width: usize) -> String {
    let filled = usize::from(progress.percent).min(100) * width / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// `m:ss`
pub fn clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
