//! Rank - A belt unlocked by cumulative XP
//!
//! Rank is a Value Object. Ranks are totally ordered by their XP threshold,
//! and the rank a profile holds is always derived from its XP.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A single belt in the ladder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rank {
    /// Ordinal of the rank (0 = first belt)
    pub level: u32,
    /// Display name, e.g. "Yellow Belt"
    pub name: String,
    /// Cumulative XP needed to hold this rank
    pub min_xp: u64,
}

impl Rank {
    pub fn new(level: u32, name: impl Into<String>, min_xp: u64) -> Self {
        Self {
            level,
            name: name.into(),
            min_xp,
        }
    }
}

/// Where a profile stands between two belts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankProgress {
    pub current: Rank,
    /// `None` at the top of the ladder
    pub next: Option<Rank>,
    pub xp: u64,
    /// XP still missing for the next rank (0 at the top)
    pub xp_to_next: u64,
    /// Progress through the current band, 0..=100
    pub percent: u8,
}

/// The ordered set of ranks
///
/// Invariants (checked in [`RankLadder::new`]):
/// - at least one rank
/// - thresholds and levels are unique
/// - levels increase together with thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rank>", into = "Vec<Rank>")]
pub struct RankLadder {
    ranks: Vec<Rank>,
}

impl RankLadder {
    pub fn new(mut ranks: Vec<Rank>) -> Result<Self, CatalogError> {
        if ranks.is_empty() {
            return Err(CatalogError::NoRanks);
        }

        ranks.sort_by_key(|r| r.min_xp);

        for pair in ranks.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if lower.min_xp == upper.min_xp {
                return Err(CatalogError::DuplicateRankThreshold {
                    min_xp: upper.min_xp,
                });
            }
            if lower.level == upper.level {
                return Err(CatalogError::DuplicateRankLevel { level: upper.level });
            }
            if lower.level > upper.level {
                return Err(CatalogError::RankOrder { level: upper.level });
            }
        }

        Ok(Self { ranks })
    }

    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    /// The first belt
    pub fn lowest(&self) -> &Rank {
        &self.ranks[0]
    }

    /// Highest rank whose threshold is at or below `xp`.
    ///
    /// Falls back to the lowest rank when `xp` is below every threshold.
    pub fn rank_for_xp(&self, xp: u64) -> &Rank {
        self.ranks
            .iter()
            .rev()
            .find(|r| r.min_xp <= xp)
            .unwrap_or_else(|| self.lowest())
    }

    pub fn by_level(&self, level: u32) -> Option<&Rank> {
        self.ranks.iter().find(|r| r.level == level)
    }

    /// The rank immediately above `level`
    pub fn next_after(&self, level: u32) -> Option<&Rank> {
        self.ranks.iter().find(|r| r.level > level)
    }

    pub fn progress(&self, xp: u64) -> RankProgress {
        let current = self.rank_for_xp(xp).clone();
        let next = self.next_after(current.level).cloned();

        let (xp_to_next, percent) = match &next {
            Some(next) => {
                let band = next.min_xp.saturating_sub(current.min_xp).max(1);
                let done = xp.saturating_sub(current.min_xp).min(band);
                let percent = (done.saturating_mul(100) / band).min(100) as u8;
                (next.min_xp.saturating_sub(xp), percent)
            }
            None => (0, 100),
        };

        RankProgress {
            current,
            next,
            xp,
            xp_to_next,
            percent,
        }
    }
}

impl TryFrom<Vec<Rank>> for RankLadder {
    type Error = CatalogError;

    fn try_from(ranks: Vec<Rank>) -> Result<Self, Self::Error> {
        Self::new(ranks)
    }
}

impl From<RankLadder> for Vec<Rank> {
    fn from(ladder: RankLadder) -> Self {
        ladder.ranks
    }
}
