//! Per-game match records as reported by the analysis service.

use serde::{Deserialize, Serialize};

/// Lane roles that only exist on the 5v5 map.
const RIFT_ROLES: [&str; 6] = ["top", "jungle", "mid", "bottom", "adc", "support"];

/// Bucket used when a match carries no role.
pub const FILL_ROLE: &str = "Fill";

/// Game mode inferred from the role a match was played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    #[serde(rename = "Summoner's Rift")]
    SummonersRift,
    #[serde(rename = "Other Modes")]
    OtherModes,
}

impl GameMode {
    /// Classify a role string. Unknown or missing roles (ARAM, Arena, URF...)
    /// fall into `OtherModes`.
    pub fn from_role(role: Option<&str>) -> Self {
        match role {
            Some(r) if RIFT_ROLES.contains(&r.trim().to_lowercase().as_str()) => {
                GameMode::SummonersRift
            }
            _ => GameMode::OtherModes,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameMode::SummonersRift => "Classic 5v5 with standard roles",
            GameMode::OtherModes => "ARAM, Arena, URF, and other game modes",
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::SummonersRift => write!(f, "Summoner's Rift"),
            GameMode::OtherModes => write!(f, "Other Modes"),
        }
    }
}

/// One played game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Champion name
    pub champion: String,

    /// Small champion icon URL
    #[serde(default)]
    pub champion_img: String,

    /// Splash art URL
    #[serde(default)]
    pub champion_splash: String,

    /// Lane role, or a mode marker for non-Rift games
    #[serde(default)]
    pub role: Option<String>,

    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,

    /// (kills + assists) / max(deaths, 1)
    pub kda: f64,

    pub cs: f64,
    pub cs_per_min: f64,
    pub vision_score: u32,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub dpm: f64,
    pub gpm: f64,
    pub gold_earned: u64,
    pub champ_level: u8,
    pub win: bool,

    /// Game length in seconds, when the service reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_type: Option<String>,
}

impl MatchRecord {
    /// A remake (or AFK game) has an all-zero combat and economy stat line.
    pub fn is_remake(&self) -> bool {
        self.kills == 0
            && self.deaths == 0
            && self.assists == 0
            && self.damage_dealt == 0
            && self.gold_earned == 0
    }

    /// Role used for grouping; missing or blank roles land in `Fill`.
    pub fn role_label(&self) -> &str {
        match self.role.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => r,
            _ => FILL_ROLE,
        }
    }

    pub fn detected_mode(&self) -> GameMode {
        GameMode::from_role(self.role.as_deref())
    }
}

#[cfg(test)]
impl MatchRecord {
    /// Build a plausible record with the given headline numbers.
    pub fn fixture(champion: &str, role: Option<&str>, win: bool, kda: f64) -> Self {
        Self {
            champion: champion.to_string(),
            champion_img: format!("https://cdn.example.com/{}.png", champion),
            champion_splash: format!("https://cdn.example.com/{}_splash.jpg", champion),
            role: role.map(str::to_string),
            kills: 5,
            deaths: 2,
            assists: 7,
            kda,
            cs: 180.0,
            cs_per_min: 6.0,
            vision_score: 20,
            damage_dealt: 18_000,
            damage_taken: 15_000,
            dpm: 600.0,
            gpm: 400.0,
            gold_earned: 12_000,
            champ_level: 16,
            win,
            game_duration: None,
            game_mode: None,
            queue_type: None,
        }
    }

    /// Build a remake record: no kills, deaths, assists, damage or gold.
    pub fn remake(champion: &str) -> Self {
        Self {
            kills: 0,
            deaths: 0,
            assists: 0,
            kda: 0.0,
            cs: 0.0,
            cs_per_min: 0.0,
            damage_dealt: 0,
            gold_earned: 0,
            ..Self::fixture(champion, Some("mid"), false, 0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remake_detection() {
        assert!(MatchRecord::remake("Yasuo").is_remake());
        assert!(!MatchRecord::fixture("Yasuo", Some("mid"), true, 3.0).is_remake());
    }

    #[test]
    fn test_remake_needs_every_stat_zero() {
        // A feeding game with no kills or assists still has gold and damage.
        let mut record = MatchRecord::remake("Teemo");
        record.deaths = 9;
        assert!(!record.is_remake());

        let mut record = MatchRecord::remake("Teemo");
        record.gold_earned = 500;
        assert!(!record.is_remake());
    }

    #[test]
    fn test_role_label_defaults_to_fill() {
        let mut record = MatchRecord::fixture("Ahri", None, true, 3.0);
        assert_eq!(record.role_label(), "Fill");

        record.role = Some("  ".to_string());
        assert_eq!(record.role_label(), "Fill");

        record.role = Some("mid".to_string());
        assert_eq!(record.role_label(), "mid");
    }

    #[test]
    fn test_game_mode_classification() {
        assert_eq!(GameMode::from_role(Some("mid")), GameMode::SummonersRift);
        assert_eq!(GameMode::from_role(Some("JUNGLE")), GameMode::SummonersRift);
        assert_eq!(GameMode::from_role(Some("adc")), GameMode::SummonersRift);
        assert_eq!(GameMode::from_role(Some("Support")), GameMode::SummonersRift);
        assert_eq!(GameMode::from_role(Some("ARAM")), GameMode::OtherModes);
        assert_eq!(GameMode::from_role(Some("arena")), GameMode::OtherModes);
        assert_eq!(GameMode::from_role(None), GameMode::OtherModes);
    }

    #[test]
    fn test_game_mode_serialization() {
        let json = serde_json::to_string(&GameMode::SummonersRift).unwrap();
        assert_eq!(json, "\"Summoner's Rift\"");
        assert_eq!(GameMode::OtherModes.to_string(), "Other Modes");
    }

    #[test]
    fn test_match_record_deserializes_upstream_shape() {
        let json = r#"{
            "champion": "Thresh",
            "champion_img": "https://cdn.example.com/Thresh.png",
            "champion_splash": "https://cdn.example.com/Thresh_0.jpg",
            "role": "support",
            "kills": 1, "deaths": 3, "assists": 17,
            "kda": 6.0,
            "cs": 32.0, "cs_per_min": 1.1,
            "vision_score": 71,
            "damage_dealt": 9800, "damage_taken": 21000,
            "dpm": 330.5, "gpm": 280.1,
            "gold_earned": 8400,
            "champ_level": 14,
            "win": true
        }"#;

        let record: MatchRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.champion, "Thresh");
        assert_eq!(record.role.as_deref(), Some("support"));
        assert_eq!(record.vision_score, 71);
        assert!(record.game_duration.is_none());
        assert_eq!(record.detected_mode(), GameMode::SummonersRift);
    }
}
