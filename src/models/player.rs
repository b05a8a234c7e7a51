//! Player-level payloads: the lookup query, season summary and AI recap.

use serde::{Deserialize, Serialize};

use super::{Confidence, MatchRecord};

/// A validated player lookup. Both parts are already trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerQuery {
    #[serde(rename = "summonerName")]
    pub summoner_name: String,
    pub tag: String,
}

impl PlayerQuery {
    pub fn new(summoner_name: &str, tag: &str) -> Self {
        Self {
            summoner_name: summoner_name.trim().to_string(),
            tag: tag.trim().to_string(),
        }
    }

    /// Riot ID form, e.g. `Faker#KR1`.
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.summoner_name, self.tag)
    }
}

impl std::fmt::Display for PlayerQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.summoner_name, self.tag)
    }
}

/// Season-wide averages precomputed by the analysis service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub games: u32,
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
    pub avg_kda: f64,
    pub avg_cs: f64,
    pub avg_cs_per_min: f64,
    pub avg_vision: f64,
    pub avg_dpm: f64,
    pub avg_gpm: f64,
    pub avg_damage_dealt: f64,
    pub avg_damage_taken: f64,
    pub avg_gold: f64,
    pub avg_champ_level: f64,

    /// Win rate (0.0 to 1.0)
    pub win_rate: f64,
}

/// A single coaching point from the recap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Improvement {
    pub issue: String,
    pub drill: String,
}

/// AI-generated season recap, relayed as the service produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRecap {
    pub strengths: String,

    #[serde(default)]
    pub improvements: Vec<Improvement>,

    pub next_match_tip: String,

    /// Usually "low", "medium" or "high"; kept verbatim
    pub confidence: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trends: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_roles: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_champions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actionable_advice: Option<Vec<String>>,
}

impl AiRecap {
    /// Parsed confidence, if the service sent one of the known levels.
    pub fn confidence_level(&self) -> Option<Confidence> {
        self.confidence.parse().ok()
    }

    pub fn trends(&self) -> &[String] {
        self.trends.as_deref().unwrap_or_default()
    }

    pub fn recommended_roles(&self) -> &[String] {
        self.recommended_roles.as_deref().unwrap_or_default()
    }

    pub fn recommended_champions(&self) -> &[String] {
        self.recommended_champions.as_deref().unwrap_or_default()
    }

    pub fn actionable_advice(&self) -> &[String] {
        self.actionable_advice.as_deref().unwrap_or_default()
    }
}

/// Full analysis payload for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puuid: Option<String>,

    pub matches: Vec<MatchRecord>,

    pub summary: SeasonSummary,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recap: Option<AiRecap>,
}

#[cfg(test)]
impl AiRecap {
    pub fn fixture() -> Self {
        Self {
            strengths: "Excellent vision control and roaming".to_string(),
            improvements: vec![
                Improvement {
                    issue: "dying before 10 minutes".to_string(),
                    drill: "Track enemy jungler every 30 seconds".to_string(),
                },
                Improvement {
                    issue: "low cs in mid game".to_string(),
                    drill: "Catch side waves between objectives".to_string(),
                },
                Improvement {
                    issue: "late objective setup".to_string(),
                    drill: "Ward dragon pit 60 seconds before spawn".to_string(),
                },
            ],
            next_match_tip: "Play for early dragon control".to_string(),
            confidence: "high".to_string(),
            style: Some("aggressive".to_string()),
            trends: Some(vec![
                "KDA improving over last 10 games".to_string(),
                "Vision score steady".to_string(),
            ]),
            recommended_roles: Some(vec!["support".to_string(), "jungle".to_string()]),
            recommended_champions: None,
            actionable_advice: None,
        }
    }
}
