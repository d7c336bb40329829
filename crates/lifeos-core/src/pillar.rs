//! Life pillars and the gamification scoring model.
//!
//! Each pillar accumulates experience points. Level and in-level progress are
//! derived from XP on every read and never stored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Width of every level in XP.
pub const LEVEL_WIDTH: i64 = 100;

/// The five fixed life domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pillar {
    Body,
    Finance,
    Career,
    Mind,
    Relationships,
}

impl Pillar {
    pub const ALL: [Pillar; 5] = [
        Pillar::Body,
        Pillar::Finance,
        Pillar::Career,
        Pillar::Mind,
        Pillar::Relationships,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pillar::Body => "Body",
            Pillar::Finance => "Finance",
            Pillar::Career => "Career",
            Pillar::Mind => "Mind",
            Pillar::Relationships => "Relationships",
        }
    }
}

impl Default for Pillar {
    fn default() -> Self {
        Pillar::Mind
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pillar {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pillar::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "pillar".into(),
                message: format!("unknown pillar '{s}'"),
            })
    }
}

/// Level breakdown derived from a raw XP total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: i64,
    pub current_xp: i64,
    pub next_level_xp: i64,
}

impl LevelProgress {
    /// Progress through the current level as a percentage.
    pub fn percent(&self) -> f64 {
        self.current_xp as f64 / self.next_level_xp as f64 * 100.0
    }
}

/// Map accumulated XP to a level.
///
/// Non-positive XP (negative totals are not a valid state) is treated as
/// zero, so the function is total.
pub fn level_of(xp: i64) -> LevelProgress {
    if xp <= 0 {
        return LevelProgress {
            level: 0,
            current_xp: 0,
            next_level_xp: LEVEL_WIDTH,
        };
    }
    LevelProgress {
        level: xp / LEVEL_WIDTH,
        current_xp: xp % LEVEL_WIDTH,
        next_level_xp: LEVEL_WIDTH,
    }
}

/// Per-pillar XP record as stored in the `pillars` document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarState {
    #[serde(default)]
    pub xp: u64,
}

/// XP totals for every pillar.
///
/// Serialized as `{"Body": {"xp": 0}, ...}`. Missing pillars read as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PillarXp(BTreeMap<Pillar, PillarState>);

impl PillarXp {
    pub fn new() -> Self {
        Self(Pillar::ALL.into_iter().map(|p| (p, PillarState::default())).collect())
    }

    pub fn xp(&self, pillar: Pillar) -> u64 {
        self.0.get(&pillar).map(|s| s.xp).unwrap_or(0)
    }

    pub fn level(&self, pillar: Pillar) -> LevelProgress {
        level_of(i64::try_from(self.xp(pillar)).unwrap_or(i64::MAX))
    }

    /// Add points to a pillar. XP only ever grows through this path.
    pub fn award(&mut self, pillar: Pillar, points: u32) {
        let state = self.0.entry(pillar).or_default();
        state.xp = state.xp.saturating_add(u64::from(points));
    }

    /// Reset a pillar back to zero XP.
    pub fn reset(&mut self, pillar: Pillar) {
        self.0.insert(pillar, PillarState::default());
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pillar, u64)> + '_ {
        Pillar::ALL.into_iter().map(move |p| (p, self.xp(p)))
    }
}

impl Default for PillarXp {
    fn default() -> Self {
        Self::new()
    }
}
