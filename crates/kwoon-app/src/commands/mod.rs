//! CLI Commands

pub mod data;
pub mod plan;
pub mod prefs;
pub mod profile;
pub mod train;

pub use data::{ExportCommand, ImportCommand};
pub use plan::PlanCommand;
pub use prefs::{AchievementsCommand, AvatarCommand, ThemeCommand};
pub use profile::{EditCommand, InitCommand, ResetCommand, StatusCommand};
pub use train::{ActivitiesCommand, DailyCommand, TrainCommand};
