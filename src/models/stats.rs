//! Derived statistics models.

use serde::{Deserialize, Serialize};

use super::GameMode;

/// Highest mastery tier a rollup can reach.
pub const MAX_MASTERY_TIER: u8 = 7;

/// Mastery tier shown in the champion showcase: four base stars plus one
/// per two games, capped at seven.
pub fn mastery_tier(games: u32) -> u8 {
    let tier = games / 2 + 4;
    tier.min(MAX_MASTERY_TIER as u32) as u8
}

/// Per-champion statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionRollup {
    /// Champion name
    pub name: String,

    /// Icon of the first counted match
    pub image: String,

    /// Splash art of the first counted match
    pub splash: String,

    /// Role of the first counted match
    pub role: String,

    /// Non-remake games on this champion
    pub games: u32,

    pub wins: u32,

    /// Win rate as a rounded whole percentage
    pub win_rate: u32,

    /// Mean KDA rounded to one decimal
    pub avg_kda: f64,

    pub mastery_tier: u8,
}

impl ChampionRollup {
    /// KDA formatted for display, e.g. "4.0".
    pub fn kda_display(&self) -> String {
        format!("{:.1}", self.avg_kda)
    }
}

/// Per-role statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRollup {
    pub role: String,
    pub games: u32,
    pub wins: u32,

    /// Win rate percentage, one decimal
    pub win_rate: f64,

    /// Mean KDA, two decimals
    pub avg_kda: f64,

    /// Mean CS per minute, one decimal
    pub avg_cs_per_min: f64,
}

/// Totals for one game mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameModeSummary {
    pub mode: GameMode,
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub avg_kda: f64,

    /// Only meaningful on Summoner's Rift
    pub avg_cs_per_min: Option<f64>,
}

/// One point on the KDA progression chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// 1-based game index, oldest first
    pub game: u32,
    pub kda: f64,
    pub win: bool,
}

/// One point on the CS per minute chart. Summoner's Rift games only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsPoint {
    /// 1-based game index, oldest first
    pub game: u32,
    pub cs_per_min: f64,
}

/// Summary of the most recent games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentForm {
    pub games: u32,
    pub win_rate: f64,
    pub avg_kda: f64,
    pub avg_rift_cs_per_min: Option<f64>,
    pub most_played_mode: Option<GameMode>,
    pub kda_trend: Vec<TrendPoint>,
    pub cs_trend: Vec<CsPoint>,
}

/// Where headline numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsSource {
    Matches,
    Summary,
}

/// Top-line numbers for the hero banner and share text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineStats {
    pub games: u32,

    /// Win rate as a rounded whole percentage
    pub win_rate: u32,

    pub avg_kda: f64,
    pub source: StatsSource,
}
