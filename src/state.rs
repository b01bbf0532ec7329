use std::collections::{HashMap, HashSet, VecDeque};

use crate::aggregate::{
    ActivityTotals, Era, RecordLine, ScopedSummary, SeasonBoard, SeasonTotals, aggregate,
    aggregate_activity, build_eras, season_leaderboards, summarize,
};
use crate::classify::{FinishClassification, FinishGroup, Medal, classify_finishes};
use crate::config::AppConfig;
use crate::h2h::{H2HMatrix, build_h2h_matrix, h2h_win_pct};
use crate::records::scoped_records;
use crate::scope::{Cutoff, Scope, scope_cutoff};
use crate::season::{BracketRound, StandingRow, bracket_rounds, season_list, season_standings};
use crate::scoring::{ScoringMode, WinLossTie, WinPctBasis};
use crate::types::{
    CurrentMatchup, FranchiseDetailResponse, ManagerSummary, ManagersResponse, OwnershipEntry,
    PlayoffResponse, RecordsResponse, Season, SeasonRecord,
};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Managers,
    Franchises,
    FranchiseDetail { franchise_id: String },
    HeadToHead,
    Records,
    Season,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum H2HView {
    Managers,
    Franchises,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub sport: String,
    pub scope: Scope,
    pub scoring: ScoringMode,
    pub win_pct_basis: WinPctBasis,
    pub h2h_view: H2HView,
    /// Managers screen shows season leaderboards instead of manager cards.
    pub team_view: bool,
    pub selected: usize,
    pub detail_scroll: u16,
    pub league: ManagersResponse,
    pub league_loaded: bool,
    pub franchise_details: HashMap<String, FranchiseDetailResponse>,
    pub pending_franchises: HashSet<String>,
    pub records: Option<RecordsResponse>,
    pub seasons: Vec<Season>,
    /// Index into [`AppState::season_list`] on the season screen.
    pub season_idx: usize,
    pub playoffs: HashMap<i32, PlayoffResponse>,
    pub pending_playoffs: HashSet<i32>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

/// One card on the managers or franchises screen.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRow {
    pub id: String,
    pub name: String,
    pub subtitle: String,
    pub franchise_id: Option<String>,
    pub cutoff: Cutoff,
    pub totals: SeasonTotals,
    pub line: RecordLine,
    pub medals: Vec<Medal>,
    pub championship_years: Vec<i32>,
    /// Playoff-seed groups for seeds 1..=3.
    pub seed_finishes: Vec<FinishGroup>,
    pub season_records: Vec<SeasonRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FranchiseH2HRow {
    pub franchise_id: String,
    pub name: String,
    pub record: WinLossTie,
    /// `None` when the two never met.
    pub win_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FranchiseView {
    pub id: String,
    pub name: String,
    pub current_manager: String,
    pub current_team_name: String,
    pub ownership: Vec<OwnershipEntry>,
    pub cutoff: Cutoff,
    pub summary: ScopedSummary,
    pub finishes: FinishClassification,
    pub eras: Vec<Era>,
    pub activity: ActivityTotals,
    pub h2h: Vec<FranchiseH2HRow>,
    pub current_matchup: Option<CurrentMatchup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonView {
    pub season: i32,
    pub name: String,
    pub is_finished: bool,
    pub standings: Vec<StandingRow>,
    /// `None` until the bracket for this season has arrived.
    pub bracket: Option<Vec<BracketRound>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Managers,
            sport: "baseball".to_string(),
            scope: Scope::AllTime,
            scoring: ScoringMode::default_for_sport("baseball"),
            win_pct_basis: WinPctBasis::AllGames,
            h2h_view: H2HView::Managers,
            team_view: false,
            selected: 0,
            detail_scroll: 0,
            league: ManagersResponse::default(),
            league_loaded: false,
            franchise_details: HashMap::new(),
            pending_franchises: HashSet::new(),
            records: None,
            seasons: Vec::new(),
            season_idx: 0,
            playoffs: HashMap::new(),
            pending_playoffs: HashSet::new(),
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            sport: cfg.sport.clone(),
            scope: cfg.scope,
            scoring: cfg.scoring,
            win_pct_basis: cfg.win_pct_basis,
            ..Self::new()
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn toggle_scope(&mut self) {
        self.scope = self.scope.toggle();
        self.clamp_selection();
    }

    pub fn toggle_scoring(&mut self) {
        self.scoring = self.scoring.toggle();
    }

    pub fn toggle_h2h_view(&mut self) {
        self.h2h_view = match self.h2h_view {
            H2HView::Managers => H2HView::Franchises,
            H2HView::Franchises => H2HView::Managers,
        };
    }

    pub fn toggle_team_view(&mut self) {
        self.team_view = !self.team_view;
        self.selected = 0;
    }

    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            self.selected = 0;
            self.detail_scroll = 0;
        }
        self.screen = screen;
    }

    pub fn back(&mut self) {
        if matches!(self.screen, Screen::FranchiseDetail { .. }) {
            self.screen = Screen::Franchises;
            self.detail_scroll = 0;
        } else {
            self.screen = Screen::Managers;
        }
        self.clamp_selection();
    }

    fn row_count(&self) -> usize {
        match self.screen {
            Screen::Managers if self.team_view => self.season_boards().len(),
            Screen::Managers => self.manager_rows().len(),
            Screen::Franchises => self.franchise_rows().len(),
            Screen::HeadToHead => self.h2h_matrix().headers.len(),
            Screen::Records => self
                .scoped_records()
                .map(|r| r.category_records.len())
                .unwrap_or(0),
            Screen::Season => self
                .season_view()
                .map(|view| view.standings.len())
                .unwrap_or(0),
            Screen::FranchiseDetail { .. } => 0,
        }
    }

    pub fn select_next(&mut self) {
        if matches!(self.screen, Screen::FranchiseDetail { .. }) {
            self.detail_scroll = self.detail_scroll.saturating_add(1);
            return;
        }
        let total = self.row_count();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        if matches!(self.screen, Screen::FranchiseDetail { .. }) {
            self.detail_scroll = self.detail_scroll.saturating_sub(1);
            return;
        }
        let total = self.row_count();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    fn clamp_selection(&mut self) {
        let total = self.row_count();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    /// Managers visible under the active scope: current-owner scope hides
    /// managers who no longer own a team.
    pub fn scoped_managers(&self) -> Vec<&ManagerSummary> {
        self.league
            .managers
            .iter()
            .filter(|m| self.scope == Scope::AllTime || m.is_current)
            .collect()
    }

    pub fn manager_rows(&self) -> Vec<EntityRow> {
        self.scoped_managers()
            .into_iter()
            .map(|m| {
                let seasons = m.season_records.len();
                let mut subtitle = format!("{seasons} season{}", if seasons == 1 { "" } else { "s" });
                if m.playoff_wins + m.playoff_losses > 0 {
                    subtitle.push_str(&format!(" · playoffs {}-{}", m.playoff_wins, m.playoff_losses));
                }
                self.entity_row(
                    &m.guid,
                    &m.name,
                    subtitle,
                    m.franchise_id.clone(),
                    &m.season_records,
                    Cutoff::Unbounded,
                )
            })
            .collect()
    }

    pub fn franchise_rows(&self) -> Vec<EntityRow> {
        self.league
            .franchise_stats
            .iter()
            .map(|f| {
                let cutoff = scope_cutoff(&f.ownership, self.scope);
                let subtitle = if f.current_team_name.is_empty() {
                    f.current_manager.clone()
                } else {
                    format!("{} · {}", f.current_manager, f.current_team_name)
                };
                self.entity_row(
                    &f.id,
                    &f.name,
                    subtitle,
                    Some(f.id.clone()),
                    &f.season_records,
                    cutoff,
                )
            })
            .collect()
    }

    fn entity_row(
        &self,
        id: &str,
        name: &str,
        subtitle: String,
        franchise_id: Option<String>,
        records: &[SeasonRecord],
        cutoff: Cutoff,
    ) -> EntityRow {
        let scoped = aggregate(records, cutoff);
        let finishes = classify_finishes(&scoped.filtered);
        let seed_finishes = finishes
            .seed_groups
            .into_iter()
            .filter(|g| g.rank <= 3)
            .collect();
        EntityRow {
            id: id.to_string(),
            name: name.to_string(),
            subtitle,
            franchise_id,
            cutoff,
            line: scoped.totals.line(self.scoring, self.win_pct_basis),
            totals: scoped.totals,
            medals: finishes.medals,
            championship_years: finishes.championship_years,
            seed_finishes,
            season_records: scoped.filtered,
        }
    }

    pub fn season_boards(&self) -> Vec<SeasonBoard> {
        let managers: Vec<ManagerSummary> = self.scoped_managers().into_iter().cloned().collect();
        season_leaderboards(&managers, self.scoring)
    }

    pub fn selected_franchise_id(&self) -> Option<String> {
        match &self.screen {
            Screen::FranchiseDetail { franchise_id } => Some(franchise_id.clone()),
            Screen::Franchises => self
                .franchise_rows()
                .get(self.selected)
                .map(|row| row.id.clone()),
            Screen::Managers if !self.team_view => self
                .manager_rows()
                .get(self.selected)
                .and_then(|row| row.franchise_id.clone()),
            _ => None,
        }
    }

    /// Switches to the detail screen of the selected franchise. Returns the id
    /// when its detail still needs to be fetched.
    pub fn open_selected_franchise(&mut self) -> Option<String> {
        let franchise_id = self.selected_franchise_id()?;
        self.screen = Screen::FranchiseDetail {
            franchise_id: franchise_id.clone(),
        };
        self.detail_scroll = 0;
        self.request_franchise(&franchise_id)
            .then_some(franchise_id)
    }

    /// Marks a franchise detail as in flight. `false` when it is already
    /// loaded or requested.
    pub fn request_franchise(&mut self, franchise_id: &str) -> bool {
        if self.franchise_details.contains_key(franchise_id) {
            return false;
        }
        self.pending_franchises.insert(franchise_id.to_string())
    }

    pub fn franchise_view(&self, franchise_id: &str) -> Option<FranchiseView> {
        let detail = self.franchise_details.get(franchise_id)?;
        let ownership = detail.overview.ownership.clone();
        let cutoff = scope_cutoff(&ownership, self.scope);
        let summary = summarize(
            &detail.season_records,
            cutoff,
            self.scoring,
            self.win_pct_basis,
        );
        let finishes = classify_finishes(&summary.filtered);
        let eras = build_eras(&ownership, &detail.season_records)
            .into_iter()
            .filter(|era| cutoff.admits(era.from))
            .collect();
        let activity = aggregate_activity(
            &detail.transactions.counts,
            &detail.transactions.trades,
            &detail.keepers,
            cutoff,
        );
        let h2h = detail
            .h2h
            .iter()
            .map(|entry| {
                let record = entry.record();
                FranchiseH2HRow {
                    franchise_id: entry.franchise_id.clone(),
                    name: entry.name.clone(),
                    record,
                    win_pct: (record.games() > 0).then(|| h2h_win_pct(&record)),
                }
            })
            .collect();

        Some(FranchiseView {
            id: detail.overview.id.clone(),
            name: detail.overview.name.clone(),
            current_manager: detail.overview.current_manager.clone(),
            current_team_name: detail.overview.current_team_name.clone(),
            ownership,
            cutoff,
            summary,
            finishes,
            eras,
            activity,
            h2h,
            current_matchup: detail.current_matchup.clone(),
        })
    }

    pub fn season_list(&self) -> Vec<i32> {
        season_list(&self.seasons, &self.league.managers)
    }

    pub fn selected_season(&self) -> Option<i32> {
        let seasons = self.season_list();
        seasons
            .get(self.season_idx.min(seasons.len().saturating_sub(1)))
            .copied()
    }

    /// Steps to an older (`forward`) or newer season. Returns the season when
    /// its bracket still needs to be fetched.
    pub fn cycle_season(&mut self, forward: bool) -> Option<i32> {
        let total = self.season_list().len();
        if total == 0 {
            self.season_idx = 0;
            return None;
        }
        let current = self.season_idx.min(total - 1);
        self.season_idx = if forward {
            (current + 1) % total
        } else {
            (current + total - 1) % total
        };
        self.selected = 0;
        let season = self.selected_season()?;
        self.request_playoffs(season).then_some(season)
    }

    /// Switches to the season screen. Returns the selected season when its
    /// bracket still needs to be fetched.
    pub fn open_season_screen(&mut self) -> Option<i32> {
        self.set_screen(Screen::Season);
        let season = self.selected_season()?;
        self.request_playoffs(season).then_some(season)
    }

    /// Marks a bracket as in flight. `false` when it is already loaded or requested.
    pub fn request_playoffs(&mut self, season: i32) -> bool {
        if self.playoffs.contains_key(&season) {
            return false;
        }
        self.pending_playoffs.insert(season)
    }

    /// Standings come from manager histories, so every manager who played
    /// that season is listed regardless of scope.
    pub fn season_view(&self) -> Option<SeasonView> {
        let season = self.selected_season()?;
        let meta = self.seasons.iter().find(|s| s.season == season);
        Some(SeasonView {
            season,
            name: meta
                .map(|s| s.name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| season.to_string()),
            is_finished: meta.map(|s| s.is_finished).unwrap_or(true),
            standings: season_standings(&self.league.managers, season, self.scoring),
            bracket: self.playoffs.get(&season).map(bracket_rounds),
        })
    }

    pub fn h2h_matrix(&self) -> H2HMatrix {
        match self.h2h_view {
            H2HView::Managers => {
                let managers: Vec<ManagerSummary> =
                    self.scoped_managers().into_iter().cloned().collect();
                build_h2h_matrix(&managers, &self.league.h2h)
            }
            H2HView::Franchises => {
                build_h2h_matrix(&self.league.franchise_stats, &self.league.franchise_h2h)
            }
        }
    }

    pub fn scoped_records(&self) -> Option<RecordsResponse> {
        self.records
            .as_ref()
            .map(|r| scoped_records(r, self.scope, &self.league.managers))
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetLeague(ManagersResponse),
    SetFranchiseDetail {
        franchise_id: String,
        detail: Box<FranchiseDetailResponse>,
    },
    FranchiseDetailFailed {
        franchise_id: String,
        error: String,
    },
    SetRecords(RecordsResponse),
    SetSeasons(Vec<Season>),
    SetPlayoffs {
        season: i32,
        playoffs: Box<PlayoffResponse>,
    },
    PlayoffsFailed {
        season: i32,
        error: String,
    },
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchLeague,
    FetchRecords,
    FetchFranchiseDetail { franchise_id: String },
    PrefetchFranchises { franchise_ids: Vec<String> },
    FetchSeasons,
    FetchPlayoffs { season: i32 },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetLeague(league) => {
            let managers = league.managers.len();
            let franchises = league.franchise_stats.len();
            state.league = league;
            state.league_loaded = true;
            state.clamp_selection();
            state.push_log(format!(
                "[INFO] League loaded: {managers} managers, {franchises} franchises"
            ));
        }
        Delta::SetFranchiseDetail {
            franchise_id,
            detail,
        } => {
            state.pending_franchises.remove(&franchise_id);
            state.franchise_details.insert(franchise_id, *detail);
        }
        Delta::FranchiseDetailFailed {
            franchise_id,
            error,
        } => {
            state.pending_franchises.remove(&franchise_id);
            state.push_log(format!("[WARN] Franchise {franchise_id} failed: {error}"));
        }
        Delta::SetRecords(records) => {
            state.records = Some(records);
            state.clamp_selection();
        }
        Delta::SetSeasons(seasons) => {
            let previous = state.selected_season();
            state.seasons = seasons;
            // Stay on the same season when the list changes underneath.
            state.season_idx = previous
                .and_then(|season| state.season_list().iter().position(|s| *s == season))
                .unwrap_or(0);
            state.clamp_selection();
        }
        Delta::SetPlayoffs { season, playoffs } => {
            state.pending_playoffs.remove(&season);
            state.playoffs.insert(season, *playoffs);
            state.clamp_selection();
        }
        Delta::PlayoffsFailed { season, error } => {
            state.pending_playoffs.remove(&season);
            state.push_log(format!("[WARN] Playoffs {season} failed: {error}"));
        }
        Delta::Log(line) => state.push_log(line),
    }
}
