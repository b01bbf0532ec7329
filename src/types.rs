use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::aggregate::SeasonTotals;
use crate::scoring::{Tally, WinLossTie};

pub type H2HRecord = WinLossTie;

/// Row entity id -> column entity id -> record of row against column.
pub type H2HMap = HashMap<String, HashMap<String, H2HRecord>>;

/// The API sends `null` for empty lists in a few places.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub league_key: String,
    pub season: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_finished: bool,
}

/// One manager's or franchise's season. Franchise payloads also name the manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub season: i32,
    #[serde(default)]
    pub team_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub cat_wins: u32,
    #[serde(default)]
    pub cat_losses: u32,
    #[serde(default)]
    pub cat_ties: u32,
    #[serde(default)]
    pub finish: Option<u32>,
    #[serde(default)]
    pub playoff_seed: Option<u32>,
}

impl Tally for SeasonRecord {
    fn matchup(&self) -> WinLossTie {
        WinLossTie::new(self.wins, self.losses, self.ties)
    }

    fn category(&self) -> WinLossTie {
        WinLossTie::new(self.cat_wins, self.cat_losses, self.cat_ties)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipEntry {
    pub manager: String,
    pub guid: String,
    pub from: i32,
    #[serde(default)]
    pub to: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerSummary {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub seasons: Vec<i32>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub cat_wins: u32,
    #[serde(default)]
    pub cat_losses: u32,
    #[serde(default)]
    pub cat_ties: u32,
    #[serde(default)]
    pub playoff_wins: u32,
    #[serde(default)]
    pub playoff_losses: u32,
    #[serde(default)]
    pub championships: u32,
    #[serde(default)]
    pub regular_season_firsts: u32,
    #[serde(default)]
    pub best_finish: Option<u32>,
    #[serde(default)]
    pub worst_finish: Option<u32>,
    #[serde(default, deserialize_with = "null_default")]
    pub season_records: Vec<SeasonRecord>,
    #[serde(default)]
    pub franchise_id: Option<String>,
}

impl Tally for ManagerSummary {
    fn matchup(&self) -> WinLossTie {
        WinLossTie::new(self.wins, self.losses, self.ties)
    }

    fn category(&self) -> WinLossTie {
        WinLossTie::new(self.cat_wins, self.cat_losses, self.cat_ties)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FranchiseSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub current_manager: String,
    #[serde(default, deserialize_with = "null_default")]
    pub ownership: Vec<OwnershipEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FranchiseStats {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub current_manager: String,
    #[serde(default)]
    pub current_team_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub ownership: Vec<OwnershipEntry>,
    #[serde(default, deserialize_with = "null_default")]
    pub seasons: Vec<i32>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub cat_wins: u32,
    #[serde(default)]
    pub cat_losses: u32,
    #[serde(default)]
    pub cat_ties: u32,
    #[serde(default)]
    pub championships: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub season_records: Vec<SeasonRecord>,
}

impl Tally for FranchiseStats {
    fn matchup(&self) -> WinLossTie {
        WinLossTie::new(self.wins, self.losses, self.ties)
    }

    fn category(&self) -> WinLossTie {
        WinLossTie::new(self.cat_wins, self.cat_losses, self.cat_ties)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagersResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub managers: Vec<ManagerSummary>,
    #[serde(default, deserialize_with = "null_default")]
    pub h2h: H2HMap,
    #[serde(default, deserialize_with = "null_default")]
    pub franchises: Vec<FranchiseSummary>,
    #[serde(default, deserialize_with = "null_default")]
    pub franchise_h2h: H2HMap,
    #[serde(default, deserialize_with = "null_default")]
    pub franchise_stats: Vec<FranchiseStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FranchiseOverview {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub current_manager: String,
    #[serde(default)]
    pub current_team_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub ownership: Vec<OwnershipEntry>,
    #[serde(default, deserialize_with = "null_default")]
    pub seasons: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FranchiseH2HEntry {
    pub franchise_id: String,
    pub name: String,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
}

impl FranchiseH2HEntry {
    pub fn record(&self) -> WinLossTie {
        WinLossTie::new(self.wins, self.losses, self.ties)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeeperEntry {
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub round_cost: Option<u32>,
    #[serde(default)]
    pub kept_from_season: Option<i32>,
    #[serde(default)]
    pub tenure: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonKeepers {
    pub season: i32,
    #[serde(default, deserialize_with = "null_default")]
    pub keepers: Vec<KeeperEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCount {
    pub season: i32,
    #[serde(default)]
    pub adds: u32,
    #[serde(default)]
    pub drops: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradePlayer {
    pub name: String,
    pub source_team: String,
    pub dest_team: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub season: i32,
    #[serde(default)]
    pub week: Option<u32>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, deserialize_with = "null_default")]
    pub players: Vec<TradePlayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transactions {
    #[serde(default, deserialize_with = "null_default")]
    pub counts: Vec<TransactionCount>,
    #[serde(default, deserialize_with = "null_default")]
    pub trades: Vec<Trade>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentMatchup {
    pub season: i32,
    pub week: u32,
    #[serde(default)]
    pub opponent_team_name: String,
    #[serde(default)]
    pub opponent_manager: String,
    #[serde(default)]
    pub cats_won: u32,
    #[serde(default)]
    pub cats_lost: u32,
    #[serde(default)]
    pub cats_tied: u32,
    #[serde(default)]
    pub is_playoffs: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FranchiseDetailResponse {
    pub overview: FranchiseOverview,
    #[serde(default, deserialize_with = "null_default")]
    pub stats: SeasonTotals,
    #[serde(default, deserialize_with = "null_default")]
    pub season_records: Vec<SeasonRecord>,
    #[serde(default, deserialize_with = "null_default")]
    pub h2h: Vec<FranchiseH2HEntry>,
    #[serde(default, deserialize_with = "null_default")]
    pub keepers: Vec<SeasonKeepers>,
    #[serde(default, deserialize_with = "null_default")]
    pub transactions: Transactions,
    #[serde(default)]
    pub current_matchup: Option<CurrentMatchup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub category: String,
    pub value: f64,
    pub manager: String,
    #[serde(default)]
    pub team_name: String,
    pub season: i32,
    #[serde(default)]
    pub week: u32,
    #[serde(default)]
    pub higher_is_better: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    pub manager: String,
    #[serde(default)]
    pub team_name: String,
    pub streak: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Streaks {
    #[serde(default)]
    pub longest_win_streak: Option<StreakRecord>,
    #[serde(default)]
    pub longest_loss_streak: Option<StreakRecord>,
    #[serde(default)]
    pub longest_undefeated_streak: Option<StreakRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupRecord {
    pub winner: String,
    pub loser: String,
    #[serde(default)]
    pub winner_team: String,
    #[serde(default)]
    pub loser_team: String,
    pub score: String,
    pub season: i32,
    #[serde(default)]
    pub week: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchupRecords {
    #[serde(default)]
    pub biggest_blowout: Option<MatchupRecord>,
    #[serde(default)]
    pub closest_match: Option<MatchupRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub category_records: Vec<CategoryRecord>,
    #[serde(default, deserialize_with = "null_default")]
    pub streaks: Streaks,
    #[serde(default, deserialize_with = "null_default")]
    pub matchup_records: MatchupRecords,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayoffMatchup {
    pub team_1_name: String,
    #[serde(default)]
    pub team_1_manager: String,
    #[serde(default)]
    pub team_1_seed: Option<u32>,
    pub team_2_name: String,
    #[serde(default)]
    pub team_2_manager: String,
    #[serde(default)]
    pub team_2_seed: Option<u32>,
    #[serde(default)]
    pub cats_won_1: u32,
    #[serde(default)]
    pub cats_won_2: u32,
    #[serde(default)]
    pub cats_tied: u32,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub is_tied: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayoffRound {
    pub week: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub matchups: Vec<PlayoffMatchup>,
    #[serde(default, deserialize_with = "null_default")]
    pub consolation: Vec<PlayoffMatchup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayoffResponse {
    #[serde(default)]
    pub league_key: String,
    #[serde(default, deserialize_with = "null_default")]
    pub rounds: Vec<PlayoffRound>,
}
