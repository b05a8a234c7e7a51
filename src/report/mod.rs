//! Shareable recap content built from the AI recap and season numbers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{AiRecap, HeadlineStats};

/// Cards shown in the insights grid.
pub const MAX_INSIGHT_CARDS: usize = 4;

/// Improvement areas promoted to their own card.
const MAX_IMPROVEMENT_CARDS: usize = 2;

/// Tips shown in the advice grid.
pub const MAX_ADVICE_TIPS: usize = 6;

/// Fallback tips as (title, tip, category), used after the recap's own advice.
const GENERAL_TIPS: [(&str, &str, &str); 6] = [
    (
        "Farming Excellence",
        "Practice last-hitting for 10 minutes a day in the practice tool",
        "Fundamentals",
    ),
    (
        "Vision Control",
        "Buy a control ward every back and place wards proactively",
        "Map Awareness",
    ),
    (
        "Positioning",
        "Keep a safe distance and use terrain and teammates as shields",
        "Survival",
    ),
    (
        "Team Fighting",
        "Focus the same target as your team and protect your carries",
        "Teamwork",
    ),
    (
        "Objective Priority",
        "Dragons > Herald > Towers > Jungle camps",
        "Strategy",
    ),
    (
        "Game State Awareness",
        "Early game = farm, Mid game = objectives, Late game = positioning",
        "Game Knowledge",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Strength,
    Improvement,
}

/// One card in the insights grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightCard {
    pub title: String,
    pub description: String,
    pub highlight: String,
    pub kind: InsightKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub drill: Option<String>,
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn confidence_label(recap: &AiRecap) -> String {
    recap
        .confidence_level()
        .map(|c| c.label().to_string())
        .unwrap_or_else(|| capitalize(&recap.confidence))
}

/// Build the insights grid: strengths, up to two improvement areas, then
/// strategy, roles and trend cards while room remains.
pub fn insight_cards(recap: &AiRecap) -> Vec<InsightCard> {
    let mut cards = vec![InsightCard {
        title: "Key Strengths".to_string(),
        description: recap.strengths.clone(),
        highlight: "Strong Points".to_string(),
        kind: InsightKind::Strength,
        drill: None,
    }];

    for (i, improvement) in recap.improvements.iter().take(MAX_IMPROVEMENT_CARDS).enumerate() {
        cards.push(InsightCard {
            title: format!("Improvement Area {}", i + 1),
            description: capitalize(&improvement.issue),
            highlight: improvement.drill.clone(),
            kind: InsightKind::Improvement,
            drill: Some(improvement.drill.clone()),
        });
    }

    if cards.len() < MAX_INSIGHT_CARDS && !recap.next_match_tip.is_empty() {
        cards.push(InsightCard {
            title: "Next Match Strategy".to_string(),
            description: recap.next_match_tip.clone(),
            highlight: format!("{} Confidence", confidence_label(recap)),
            kind: InsightKind::Improvement,
            drill: Some("Apply this strategy in your next game".to_string()),
        });
    }

    let roles = recap.recommended_roles();
    if cards.len() < MAX_INSIGHT_CARDS && !roles.is_empty() {
        cards.push(InsightCard {
            title: "Recommended Roles".to_string(),
            description: format!("You excel at: {}", roles.join(", ")),
            highlight: "Role Mastery".to_string(),
            kind: InsightKind::Strength,
            drill: None,
        });
    }

    if let Some(trend) = recap.trends().first() {
        if cards.len() < MAX_INSIGHT_CARDS {
            cards.push(InsightCard {
                title: "Performance Pattern".to_string(),
                description: trend.clone(),
                highlight: "Current Trend".to_string(),
                kind: InsightKind::Strength,
                drill: None,
            });
        }
    }

    cards
}

/// One entry in the advice grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceTip {
    pub title: String,
    pub tip: String,
    pub category: String,
}

/// Advice grid: the recap's actionable advice first, then general tips,
/// capped at six.
pub fn advice_tips(recap: &AiRecap) -> Vec<AdviceTip> {
    let personal = recap
        .actionable_advice()
        .iter()
        .enumerate()
        .map(|(i, advice)| AdviceTip {
            title: format!("AI Recommendation {}", i + 1),
            tip: advice.clone(),
            category: "AI Insights".to_string(),
        });

    let general = GENERAL_TIPS.iter().map(|(title, tip, category)| AdviceTip {
        title: title.to_string(),
        tip: tip.to_string(),
        category: category.to_string(),
    });

    personal.chain(general).take(MAX_ADVICE_TIPS).collect()
}

/// Tips for one recommended role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleTips {
    pub role: String,
    pub tips: Vec<String>,
}

fn tips_for_role(role: &str) -> &'static [&'static str] {
    match role.trim().to_lowercase().as_str() {
        "adc" | "bottom" => &[
            "Stay behind your team in fights",
            "Focus on consistent DPS, not flashy plays",
            "Position to hit the closest enemy safely",
        ],
        "support" => &[
            "Roam to help other lanes when possible",
            "Control vision around objectives",
            "Protect your carry, don't chase kills",
        ],
        "mid" => &[
            "Push and roam to help side lanes",
            "Control river vision for team",
            "Balance farming with team impact",
        ],
        "top" => &[
            "Learn when to TP for team fights",
            "Manage the wave to control pressure",
            "Split push when team can't fight",
        ],
        "jungle" => &[
            "Track enemy jungler position",
            "Prioritize objectives over ganks",
            "Control river scuttles for vision",
        ],
        _ => &[],
    }
}

/// Role-specific tips for each recommended role, in the recap's order.
/// Unknown roles keep their entry with no tips.
pub fn role_tips(recap: &AiRecap) -> Vec<RoleTips> {
    recap
        .recommended_roles()
        .iter()
        .map(|role| RoleTips {
            role: role.clone(),
            tips: tips_for_role(role).iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}

/// Plain-text season summary for social sharing.
pub fn share_text(player_name: &str, recap: &AiRecap, headline: Option<&HeadlineStats>) -> String {
    let (win_rate, games, avg_kda) = headline
        .map(|h| (h.win_rate, h.games, h.avg_kda))
        .unwrap_or((0, 0, 0.0));
    let style = recap
        .style
        .as_deref()
        .map(capitalize)
        .unwrap_or_else(|| "Analyzed".to_string());

    let mut text = String::from("🏆 Check out my League of Legends Rift Rewind!\n\n");
    text.push_str(&format!("{}'s Season Summary:\n", player_name));
    text.push_str(&format!("• {}% Win Rate ({} games)\n", win_rate, games));
    text.push_str(&format!("• {:.1} Average KDA\n", avg_kda));
    text.push_str(&format!("• Play Style: {}\n", style));
    text.push_str(&format!("• Confidence Level: {}\n", confidence_label(recap)));

    let roles = recap.recommended_roles();
    if !roles.is_empty() {
        text.push_str(&format!("• Best Roles: {}\n", roles.join(", ")));
    }
    text.push_str(&format!("• Key Strengths: {}\n", recap.strengths));
    if let Some(trend) = recap.trends().first() {
        text.push_str(&format!("• Current Trend: {}\n", trend));
    }
    text.push_str(&format!("\n💡 Coach Tip: {}", recap.next_match_tip));

    text
}

/// File name for an exported recap, e.g. `Faker_KR1_RiftRewind_2024-12-01.pdf`.
pub fn export_file_name(player_name: &str, date: NaiveDate) -> String {
    let clean: String = player_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let clean = if clean.is_empty() {
        "Summoner".to_string()
    } else {
        clean
    };

    format!("{}_RiftRewind_{}.pdf", clean, date.format("%Y-%m-%d"))
}
