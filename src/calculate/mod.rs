//! Statistics calculation engine.
//!
//! Computes the display aggregates from a player's match history:
//! - Remake filtering
//! - Champion and role rollups
//! - Game mode distribution
//! - Recent form and headline numbers
//!
//! Every function here is pure. Remakes are dropped before anything is
//! counted, so callers may pass either raw or pre-filtered match lists.

use std::collections::HashMap;

use crate::models::{
    mastery_tier, ChampionRollup, CsPoint, GameMode, GameModeSummary, HeadlineStats,
    MatchRecord, RecentForm, RoleRollup, SeasonSummary, StatsSource, TrendPoint,
};

/// Number of champions shown in the showcase.
pub const SHOWCASE_SIZE: usize = 3;

/// Window used for the recent form summary.
pub const RECENT_WINDOW: usize = 20;

/// Points plotted on the KDA trend.
pub const TREND_POINTS: usize = 15;

/// Rift games on the CS per minute chart.
pub const CS_TREND_POINTS: usize = 10;

/// Drop remakes, keeping the original order.
pub fn filter_valid_matches(matches: &[MatchRecord]) -> Vec<MatchRecord> {
    matches.iter().filter(|m| !m.is_remake()).cloned().collect()
}

/// Calculate win rate (0.0 to 1.0) from wins and games played.
pub fn calculate_win_rate(wins: u32, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        wins as f64 / games as f64
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn mean<I: Iterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Group non-remake matches by key, in order of first appearance.
fn group_valid_by<'a, F>(matches: &'a [MatchRecord], key: F) -> Vec<(&'a str, Vec<&'a MatchRecord>)>
where
    F: Fn(&'a MatchRecord) -> &'a str,
{
    let mut groups: Vec<(&str, Vec<&MatchRecord>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in matches.iter().filter(|m| !m.is_remake()) {
        let k = key(record);
        match index.get(k) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(k, groups.len());
                groups.push((k, vec![record]));
            }
        }
    }

    groups
}

/// Per-champion rollups, most played first. Ties keep first-appearance order.
pub fn champion_rollups(matches: &[MatchRecord]) -> Vec<ChampionRollup> {
    let mut rollups: Vec<ChampionRollup> = group_valid_by(matches, |m| m.champion.as_str())
        .into_iter()
        .map(|(name, games)| {
            let first = games[0];
            let count = games.len() as u32;
            let wins = games.iter().filter(|m| m.win).count() as u32;
            ChampionRollup {
                name: name.to_string(),
                image: first.champion_img.clone(),
                splash: first.champion_splash.clone(),
                role: first.role_label().to_string(),
                games: count,
                wins,
                win_rate: (calculate_win_rate(wins, count) * 100.0).round() as u32,
                avg_kda: round_to(mean(games.iter().map(|m| m.kda)), 1),
                mastery_tier: mastery_tier(count),
            }
        })
        .collect();

    // sort_by is stable
    rollups.sort_by(|a, b| b.games.cmp(&a.games));
    rollups
}

/// The champions featured in the showcase.
pub fn showcase_champions(matches: &[MatchRecord]) -> Vec<ChampionRollup> {
    let mut rollups = champion_rollups(matches);
    rollups.truncate(SHOWCASE_SIZE);
    rollups
}

/// Most played champion, if any valid match exists.
pub fn top_champion(matches: &[MatchRecord]) -> Option<ChampionRollup> {
    champion_rollups(matches).into_iter().next()
}

/// Per-role rollups, most played first. Missing roles count as "Fill".
pub fn role_rollups(matches: &[MatchRecord]) -> Vec<RoleRollup> {
    let mut rollups: Vec<RoleRollup> = group_valid_by(matches, MatchRecord::role_label)
        .into_iter()
        .map(|(role, games)| {
            let count = games.len() as u32;
            let wins = games.iter().filter(|m| m.win).count() as u32;
            RoleRollup {
                role: role.to_string(),
                games: count,
                wins,
                win_rate: round_to(calculate_win_rate(wins, count) * 100.0, 1),
                avg_kda: round_to(mean(games.iter().map(|m| m.kda)), 2),
                avg_cs_per_min: round_to(mean(games.iter().map(|m| m.cs_per_min)), 1),
            }
        })
        .collect();

    rollups.sort_by(|a, b| b.games.cmp(&a.games));
    rollups
}

fn mode_summary(mode: GameMode, games: &[&MatchRecord]) -> GameModeSummary {
    let count = games.len() as u32;
    let wins = games.iter().filter(|m| m.win).count() as u32;
    let avg_cs_per_min = match mode {
        GameMode::SummonersRift => Some(round_to(mean(games.iter().map(|m| m.cs_per_min)), 1)),
        GameMode::OtherModes => None,
    };

    GameModeSummary {
        mode,
        games: count,
        wins,
        win_rate: round_to(calculate_win_rate(wins, count) * 100.0, 1),
        avg_kda: round_to(mean(games.iter().map(|m| m.kda)), 2),
        avg_cs_per_min,
    }
}

/// Games, win rate and KDA per game mode. Modes without games are omitted.
pub fn game_mode_distribution(matches: &[MatchRecord]) -> Vec<GameModeSummary> {
    let (rift, other): (Vec<&MatchRecord>, Vec<&MatchRecord>) = matches
        .iter()
        .filter(|m| !m.is_remake())
        .partition(|m| m.detected_mode() == GameMode::SummonersRift);

    let mut summaries = Vec::new();
    if !rift.is_empty() {
        summaries.push(mode_summary(GameMode::SummonersRift, &rift));
    }
    if !other.is_empty() {
        summaries.push(mode_summary(GameMode::OtherModes, &other));
    }
    summaries
}

/// Form over the most recent games. Matches are expected newest first.
pub fn recent_form(matches: &[MatchRecord]) -> RecentForm {
    let recent: Vec<&MatchRecord> = matches
        .iter()
        .filter(|m| !m.is_remake())
        .take(RECENT_WINDOW)
        .collect();

    if recent.is_empty() {
        return RecentForm::default();
    }

    let games = recent.len() as u32;
    let wins = recent.iter().filter(|m| m.win).count() as u32;

    let rift: Vec<&&MatchRecord> = recent
        .iter()
        .filter(|m| m.detected_mode() == GameMode::SummonersRift)
        .collect();
    let avg_rift_cs_per_min = if rift.is_empty() {
        None
    } else {
        Some(round_to(mean(rift.iter().map(|m| m.cs_per_min)), 1))
    };

    // Ties go to the mode seen first.
    let mut mode_counts: Vec<(GameMode, u32)> = Vec::new();
    for record in &recent {
        let mode = record.detected_mode();
        match mode_counts.iter_mut().find(|(m, _)| *m == mode) {
            Some((_, count)) => *count += 1,
            None => mode_counts.push((mode, 1)),
        }
    }
    let most_played_mode = mode_counts
        .iter()
        .fold(None::<(GameMode, u32)>, |best, &(mode, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((mode, count)),
        })
        .map(|(mode, _)| mode);

    let kda_trend = recent
        .iter()
        .take(TREND_POINTS)
        .rev()
        .enumerate()
        .map(|(i, m)| TrendPoint {
            game: i as u32 + 1,
            kda: m.kda,
            win: m.win,
        })
        .collect();

    let cs_trend = rift
        .iter()
        .take(CS_TREND_POINTS)
        .rev()
        .enumerate()
        .map(|(i, m)| CsPoint {
            game: i as u32 + 1,
            cs_per_min: m.cs_per_min,
        })
        .collect();

    RecentForm {
        games,
        win_rate: round_to(calculate_win_rate(wins, games) * 100.0, 1),
        avg_kda: round_to(mean(recent.iter().map(|m| m.kda)), 2),
        avg_rift_cs_per_min,
        most_played_mode,
        kda_trend,
        cs_trend,
    }
}

/// Headline numbers from the match list, or from the season summary when
/// no valid match is available.
pub fn headline_stats(summary: &SeasonSummary, matches: &[MatchRecord]) -> HeadlineStats {
    let valid: Vec<&MatchRecord> = matches.iter().filter(|m| !m.is_remake()).collect();

    if valid.is_empty() {
        return HeadlineStats {
            games: summary.games,
            win_rate: (summary.win_rate * 100.0).round() as u32,
            avg_kda: round_to(summary.avg_kda, 1),
            source: StatsSource::Summary,
        };
    }

    let games = valid.len() as u32;
    let wins = valid.iter().filter(|m| m.win).count() as u32;
    HeadlineStats {
        games,
        win_rate: (calculate_win_rate(wins, games) * 100.0).round() as u32,
        avg_kda: round_to(mean(valid.iter().map(|m| m.kda)), 1),
        source: StatsSource::Matches,
    }
}
