//! Dependency Injection & Wiring
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  KwoonConfig                                                  │
//! │    ├── catalog_path  -> kwoon_adapter::catalog::load          │
//! │    ├── profile_path  -> JsonFileProfileRepository             │
//! │    ├── stamina       -> StaminaPolicy + max stamina           │
//! │    └── calendar      -> UTC offset for training days          │
//! │                                                              │
//! │  Dojo<JsonFileProfileRepository, StdRng>                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context as _;
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use kwoon_adapter::catalog;
use kwoon_adapter::repository::json_file::JsonFileProfileRepository;
use kwoon_domain::{EngineEvent, Profile, StaminaPolicy};
use kwoon_usecase::{Dojo, DojoSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::KwoonConfig;
use tracing::debug;

use crate::render;

pub type AppDojo = Dojo<JsonFileProfileRepository, StdRng>;

/// Everything a command needs
pub struct Context {
    pub dojo: AppDojo,
    /// Print machine-readable JSON instead of styled text
    pub json: bool,
}

impl Context {
    /// Wire the Dojo from configuration and open the stored profile
    ///
    /// Events raised while opening (regeneration, a new daily challenge)
    /// are returned so the caller can show them.
    pub fn open(config: &KwoonConfig, json: bool) -> anyhow::Result<(Self, Vec<EngineEvent>)> {
        let catalog = catalog::load(config.catalog_path.as_deref())?;
        let settings = settings_from_config(config)?;
        let repository = JsonFileProfileRepository::new(&config.profile_path);
        debug!(
            profile = %config.profile_path.display(),
            offset = %settings.utc_offset,
            "Wiring dojo"
        );

        let mut dojo = Dojo::new(repository, catalog, settings, StdRng::from_entropy());
        let events = dojo.open(Utc::now())?;
        Ok((Self { dojo, json }, events))
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    pub fn profile(&self) -> anyhow::Result<&Profile> {
        self.dojo
            .profile()
            .context("No profile yet. Run `kwoon init --name <NAME>` first")
    }

    /// Print events as text or JSON lines
    pub fn report(&self, events: &[EngineEvent]) -> anyhow::Result<()> {
        if self.json {
            for event in events {
                println!("{}", serde_json::to_string(event)?);
            }
        } else {
            for event in events {
                println!("{}", render::event_line(event, self.dojo.catalog()));
            }
        }
        Ok(())
    }
}

/// Translate configuration into Dojo settings
pub fn settings_from_config(config: &KwoonConfig) -> anyhow::Result<DojoSettings> {
    let utc_offset = match config.calendar.utc_offset_minutes {
        Some(minutes) => FixedOffset::east_opt(minutes * 60)
            .with_context(|| format!("UTC offset of {} minutes is out of range", minutes))?,
        None => Local::now().offset().fix(),
    };

    Ok(DojoSettings {
        stamina: StaminaPolicy::new(
            config.stamina.interval_minutes,
            config.stamina.units_per_interval,
        ),
        max_stamina: config.stamina.max,
        utc_offset,
    })
}
