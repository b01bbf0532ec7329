//! One season at a glance: the regular-season table and the playoff bracket.

use crate::classify::round_label;
use crate::scoring::{ScoringMode, WinLossTie, pick};
use crate::types::{ManagerSummary, PlayoffMatchup, PlayoffResponse, Season};

#[derive(Debug, Clone, PartialEq)]
pub struct StandingRow {
    pub rank: u32,
    pub team_name: String,
    pub manager: String,
    pub record: WinLossTie,
    pub playoff_seed: Option<u32>,
    pub finish: Option<u32>,
}

/// Seeded teams first in seed order, then everyone else by wins minus losses
/// under `mode`. Ranks are 1-based positions in that order.
pub fn season_standings(
    managers: &[ManagerSummary],
    season: i32,
    mode: ScoringMode,
) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = managers
        .iter()
        .flat_map(|m| {
            m.season_records
                .iter()
                .filter(move |r| r.season == season)
                .map(move |r| StandingRow {
                    rank: 0,
                    team_name: r.team_name.clone(),
                    manager: m.name.clone(),
                    record: pick(r, mode),
                    playoff_seed: r.playoff_seed,
                    finish: r.finish,
                })
        })
        .collect();

    let margin = |row: &StandingRow| i64::from(row.record.wins) - i64::from(row.record.losses);
    rows.sort_by(|a, b| {
        let seed_a = a.playoff_seed.unwrap_or(u32::MAX);
        let seed_b = b.playoff_seed.unwrap_or(u32::MAX);
        seed_a
            .cmp(&seed_b)
            .then_with(|| margin(b).cmp(&margin(a)))
            .then_with(|| a.team_name.cmp(&b.team_name))
    });
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx as u32 + 1;
    }
    rows
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketSide {
    pub team_name: String,
    pub manager: String,
    pub seed: Option<u32>,
    /// Categories won that week.
    pub score: u32,
    pub won: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketGame {
    pub top: BracketSide,
    pub bottom: BracketSide,
    pub cats_tied: u32,
    pub tied: bool,
}

impl BracketGame {
    pub fn from_matchup(m: &PlayoffMatchup) -> Self {
        let winner = m.winner.as_deref();
        BracketGame {
            top: BracketSide {
                team_name: m.team_1_name.clone(),
                manager: m.team_1_manager.clone(),
                seed: m.team_1_seed,
                score: m.cats_won_1,
                won: winner == Some(m.team_1_name.as_str()),
            },
            bottom: BracketSide {
                team_name: m.team_2_name.clone(),
                manager: m.team_2_manager.clone(),
                seed: m.team_2_seed,
                score: m.cats_won_2,
                won: winner == Some(m.team_2_name.as_str()),
            },
            cats_tied: m.cats_tied,
            tied: m.is_tied,
        }
    }

    pub fn winner(&self) -> Option<&BracketSide> {
        [&self.top, &self.bottom].into_iter().find(|side| side.won)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketRound {
    pub label: String,
    pub week: u32,
    pub games: Vec<BracketGame>,
    pub consolation: Vec<BracketGame>,
}

/// Rounds in week order, labelled counting back from the final.
pub fn bracket_rounds(playoffs: &PlayoffResponse) -> Vec<BracketRound> {
    let mut rounds: Vec<_> = playoffs.rounds.iter().collect();
    rounds.sort_by_key(|round| round.week);
    let total = rounds.len();
    rounds
        .into_iter()
        .enumerate()
        .map(|(idx, round)| BracketRound {
            label: round_label(idx, total),
            week: round.week,
            games: round.matchups.iter().map(BracketGame::from_matchup).collect(),
            consolation: round.consolation.iter().map(BracketGame::from_matchup).collect(),
        })
        .collect()
}

/// Winner of the last round's first game, if it was decided.
pub fn champion(rounds: &[BracketRound]) -> Option<&BracketSide> {
    rounds.last()?.games.first()?.winner()
}

/// Seasons to page through, newest first. Falls back to the seasons found in
/// manager histories when the season list is empty.
pub fn season_list(seasons: &[Season], managers: &[ManagerSummary]) -> Vec<i32> {
    let mut years: Vec<i32> = if seasons.is_empty() {
        managers
            .iter()
            .flat_map(|m| m.season_records.iter().map(|r| r.season))
            .collect()
    } else {
        seasons.iter().map(|s| s.season).collect()
    };
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}
