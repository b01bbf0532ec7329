//! Seeded synthetic league served when no API is configured.

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::aggregate::total_seasons;
use crate::feed::LeagueSource;
use crate::types::{
    CategoryRecord, FranchiseDetailResponse, FranchiseH2HEntry, FranchiseOverview, FranchiseStats,
    FranchiseSummary, H2HMap, H2HRecord, KeeperEntry, ManagerSummary, ManagersResponse,
    MatchupRecord, MatchupRecords, OwnershipEntry, PlayoffMatchup, PlayoffResponse, PlayoffRound,
    RecordsResponse, Season, SeasonKeepers, SeasonRecord, StreakRecord, Streaks, Trade,
    TradePlayer, TransactionCount, Transactions,
};

const FIRST_SEASON: i32 = 2016;
const WEEKS: u32 = 20;
const CATEGORIES_PER_WEEK: u32 = 10;
const PLAYOFF_TEAMS: usize = 6;

const FRANCHISES: [(&str, &str); 8] = [
    ("f1", "Ballpark Bandits"),
    ("f2", "Dinger Dynasty"),
    ("f3", "Bullpen Brigade"),
    ("f4", "Sac Fly Society"),
    ("f5", "Triple Play Club"),
    ("f6", "Grand Slam Guild"),
    ("f7", "Walk-Off Union"),
    ("f8", "Knuckleball Kings"),
];

const CURRENT_MANAGERS: [&str; 8] = [
    "Avery Quinn",
    "Blake Moreno",
    "Casey Lind",
    "Devon Park",
    "Emery Shaw",
    "Finley Ortiz",
    "Gray Holt",
    "Harper Voss",
];

/// Franchises that changed hands, with the previous owner and the takeover season offset.
const HANDOVERS: [(usize, &str, i32); 2] = [(2, "Indy Cole", 4), (5, "Jordan Reyes", 3)];

const PLAYERS: [&str; 16] = [
    "M. Alvarez", "J. Brooks", "T. Castillo", "R. Dunn", "K. Ellis", "S. Fujita", "L. Grant",
    "D. Hayes", "P. Ibarra", "N. Jensen", "C. Kato", "B. Lowe", "A. Marsh", "E. Novak",
    "O. Pryor", "V. Ruiz",
];

#[derive(Debug, Clone)]
pub struct DemoLeague {
    pub league: ManagersResponse,
    pub details: HashMap<String, FranchiseDetailResponse>,
    pub records: RecordsResponse,
    pub seasons: Vec<Season>,
    pub playoffs: HashMap<i32, PlayoffResponse>,
}

impl DemoLeague {
    pub fn generate(seed: u64, last_season: i32) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let last_season = last_season.max(FIRST_SEASON);
        let seasons: Vec<i32> = (FIRST_SEASON..=last_season).collect();

        let ownership: Vec<Vec<OwnershipEntry>> = (0..FRANCHISES.len())
            .map(|idx| franchise_ownership(idx, last_season))
            .collect();

        // season_records[franchise] in chronological order
        let mut season_records: Vec<Vec<SeasonRecord>> = vec![Vec::new(); FRANCHISES.len()];
        let mut playoffs = HashMap::new();
        for &season in &seasons {
            let (rows, bracket) = simulate_season(&mut rng, season, &ownership);
            for (idx, row) in rows.into_iter().enumerate() {
                season_records[idx].push(row);
            }
            playoffs.insert(season, bracket);
        }

        let franchise_h2h = simulate_h2h(&mut rng);
        let franchise_stats: Vec<FranchiseStats> = FRANCHISES
            .iter()
            .enumerate()
            .map(|(idx, (id, name))| {
                build_franchise_stats(idx, id, name, &ownership[idx], &season_records[idx])
            })
            .collect();

        let managers = manager_summaries(&mut rng, &franchise_stats);
        let h2h = manager_h2h(&franchise_h2h, &franchise_stats);

        let details = franchise_stats
            .iter()
            .map(|stats| {
                let detail = franchise_detail(&mut rng, stats, &franchise_h2h, &seasons);
                (stats.id.clone(), detail)
            })
            .collect();

        let records = league_records(&mut rng, &managers, &seasons);

        let franchises = franchise_stats
            .iter()
            .map(|f| FranchiseSummary {
                id: f.id.clone(),
                name: f.name.clone(),
                current_manager: f.current_manager.clone(),
                ownership: f.ownership.clone(),
            })
            .collect();

        Self {
            league: ManagersResponse {
                managers,
                h2h,
                franchises,
                franchise_h2h,
                franchise_stats,
            },
            details,
            records,
            seasons: seasons
                .iter()
                .map(|&season| Season {
                    league_key: format!("demo.l.{season}"),
                    season,
                    name: format!("{season} season"),
                    is_finished: true,
                })
                .collect(),
            playoffs,
        }
    }
}

impl LeagueSource for DemoLeague {
    fn describe(&self) -> String {
        "demo league".to_string()
    }

    fn league(&self) -> Result<ManagersResponse> {
        Ok(self.league.clone())
    }

    fn records(&self) -> Result<RecordsResponse> {
        Ok(self.records.clone())
    }

    fn franchise_detail(&self, franchise_id: &str) -> Result<FranchiseDetailResponse> {
        self.details
            .get(franchise_id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown franchise {franchise_id}"))
    }

    fn seasons(&self) -> Result<Vec<Season>> {
        Ok(self.seasons.clone())
    }

    fn playoffs(&self, season: i32) -> Result<PlayoffResponse> {
        self.playoffs
            .get(&season)
            .cloned()
            .ok_or_else(|| anyhow!("no playoffs for {season}"))
    }
}

fn guid_for(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

fn franchise_ownership(idx: usize, last_season: i32) -> Vec<OwnershipEntry> {
    let current = CURRENT_MANAGERS[idx];
    match HANDOVERS.iter().find(|(franchise, _, _)| *franchise == idx) {
        Some((_, former, offset)) => {
            let takeover = (FIRST_SEASON + offset).min(last_season);
            vec![
                OwnershipEntry {
                    manager: former.to_string(),
                    guid: guid_for(former),
                    from: FIRST_SEASON,
                    to: Some(takeover - 1),
                },
                OwnershipEntry {
                    manager: current.to_string(),
                    guid: guid_for(current),
                    from: takeover,
                    to: None,
                },
            ]
        }
        None => vec![OwnershipEntry {
            manager: current.to_string(),
            guid: guid_for(current),
            from: FIRST_SEASON,
            to: None,
        }],
    }
}

fn owner_in(ownership: &[OwnershipEntry], season: i32) -> &OwnershipEntry {
    ownership
        .iter()
        .rev()
        .find(|o| o.from <= season)
        .unwrap_or(&ownership[0])
}

fn simulate_season(
    rng: &mut StdRng,
    season: i32,
    ownership: &[Vec<OwnershipEntry>],
) -> (Vec<SeasonRecord>, PlayoffResponse) {
    let mut rows: Vec<SeasonRecord> = ownership
        .iter()
        .enumerate()
        .map(|(idx, owners)| {
            let owner = owner_in(owners, season);
            let ties = rng.gen_range(0..=1);
            let wins = rng.gen_range(4..=(WEEKS - 4));
            let cat_total = WEEKS * CATEGORIES_PER_WEEK;
            let cat_ties = rng.gen_range(0..=15);
            let cat_wins = rng.gen_range(70u32..=130).min(cat_total - cat_ties);
            SeasonRecord {
                season,
                team_name: format!("{} {}", FRANCHISES[idx].1, season % 100),
                manager: Some(owner.manager.clone()),
                wins,
                losses: WEEKS - wins - ties,
                ties,
                cat_wins,
                cat_losses: cat_total - cat_wins - cat_ties,
                cat_ties,
                finish: None,
                playoff_seed: None,
            }
        })
        .collect();

    let mut by_wins: Vec<usize> = (0..rows.len()).collect();
    by_wins.sort_by_key(|&idx| std::cmp::Reverse((rows[idx].wins, rows[idx].cat_wins)));
    for (seed, &idx) in by_wins.iter().enumerate().take(PLAYOFF_TEAMS) {
        rows[idx].playoff_seed = Some(seed as u32 + 1);
    }

    let (bracket, placed) = simulate_playoffs(rng, season, &rows, &by_wins[..PLAYOFF_TEAMS]);
    for (pos, &idx) in placed.iter().enumerate() {
        rows[idx].finish = Some(pos as u32 + 1);
    }
    for (pos, &idx) in by_wins.iter().enumerate().skip(PLAYOFF_TEAMS) {
        rows[idx].finish = Some(pos as u32 + 1);
    }
    (rows, bracket)
}

/// Six-team bracket: seeds 1 and 2 get a bye, the lowest remaining seed meets
/// seed 1. Returns the rounds and the row indices in final placing order.
fn simulate_playoffs(
    rng: &mut StdRng,
    season: i32,
    rows: &[SeasonRecord],
    seeded: &[usize],
) -> (PlayoffResponse, Vec<usize>) {
    let seed = |idx: usize| rows[idx].playoff_seed.unwrap_or(u32::MAX);

    let (q1, q1_won, q1_lost) = play(rng, rows, seeded[2], seeded[5]);
    let (q2, q2_won, q2_lost) = play(rng, rows, seeded[3], seeded[4]);

    let (low, high) = if seed(q1_won) > seed(q2_won) {
        (q1_won, q2_won)
    } else {
        (q2_won, q1_won)
    };
    let (s1, s1_won, s1_lost) = play(rng, rows, seeded[0], low);
    let (s2, s2_won, s2_lost) = play(rng, rows, seeded[1], high);
    let (fifth, fifth_won, fifth_lost) = play(rng, rows, q1_lost, q2_lost);

    let (finals, champ, runner_up) = play(rng, rows, s1_won, s2_won);
    let (third, third_won, third_lost) = play(rng, rows, s1_lost, s2_lost);

    let rounds = vec![
        PlayoffRound {
            week: WEEKS + 1,
            matchups: vec![q1, q2],
            consolation: Vec::new(),
        },
        PlayoffRound {
            week: WEEKS + 2,
            matchups: vec![s1, s2],
            consolation: vec![fifth],
        },
        PlayoffRound {
            week: WEEKS + 3,
            matchups: vec![finals],
            consolation: vec![third],
        },
    ];
    let placed = vec![champ, runner_up, third_won, third_lost, fifth_won, fifth_lost];
    (
        PlayoffResponse {
            league_key: format!("demo.l.{season}"),
            rounds,
        },
        placed,
    )
}

/// One playoff week between two rows, better seed listed first. Playoff
/// weeks never end level: a drawn week goes to the better seed.
fn play(rng: &mut StdRng, rows: &[SeasonRecord], a: usize, b: usize) -> (PlayoffMatchup, usize, usize) {
    let seed = |idx: usize| rows[idx].playoff_seed.unwrap_or(u32::MAX);
    let (top, bottom) = if seed(a) <= seed(b) { (a, b) } else { (b, a) };

    let mut cats_tied = rng.gen_range(0u32..=2);
    let mut won_1 = rng.gen_range(0..=(CATEGORIES_PER_WEEK - cats_tied));
    let mut won_2 = CATEGORIES_PER_WEEK - cats_tied - won_1;
    if won_1 == won_2 {
        if cats_tied > 0 {
            cats_tied -= 1;
        } else {
            won_2 -= 1;
        }
        won_1 += 1;
    }
    let (winner, loser) = if won_1 > won_2 { (top, bottom) } else { (bottom, top) };

    let matchup = PlayoffMatchup {
        team_1_name: rows[top].team_name.clone(),
        team_1_manager: rows[top].manager.clone().unwrap_or_default(),
        team_1_seed: rows[top].playoff_seed,
        team_2_name: rows[bottom].team_name.clone(),
        team_2_manager: rows[bottom].manager.clone().unwrap_or_default(),
        team_2_seed: rows[bottom].playoff_seed,
        cats_won_1: won_1,
        cats_won_2: won_2,
        cats_tied,
        winner: Some(rows[winner].team_name.clone()),
        is_tied: false,
    };
    (matchup, winner, loser)
}

fn simulate_h2h(rng: &mut StdRng) -> H2HMap {
    let mut map = H2HMap::new();
    for a in 0..FRANCHISES.len() {
        for b in (a + 1)..FRANCHISES.len() {
            // Some pairs never met.
            if rng.gen_bool(0.1) {
                continue;
            }
            let meetings: u32 = rng.gen_range(2..=12);
            let ties = rng.gen_range(0u32..=1).min(meetings);
            let wins = rng.gen_range(0..=(meetings - ties));
            let forward = H2HRecord::new(wins, meetings - ties - wins, ties);
            let backward = H2HRecord::new(forward.losses, forward.wins, forward.ties);
            map.entry(FRANCHISES[a].0.to_string())
                .or_default()
                .insert(FRANCHISES[b].0.to_string(), forward);
            map.entry(FRANCHISES[b].0.to_string())
                .or_default()
                .insert(FRANCHISES[a].0.to_string(), backward);
        }
    }
    map
}

fn build_franchise_stats(
    idx: usize,
    id: &str,
    name: &str,
    ownership: &[OwnershipEntry],
    records: &[SeasonRecord],
) -> FranchiseStats {
    let totals = total_seasons(records);
    FranchiseStats {
        id: id.to_string(),
        name: name.to_string(),
        current_manager: CURRENT_MANAGERS[idx].to_string(),
        current_team_name: records.last().map(|r| r.team_name.clone()).unwrap_or_default(),
        ownership: ownership.to_vec(),
        seasons: records.iter().map(|r| r.season).collect(),
        wins: totals.wins,
        losses: totals.losses,
        ties: totals.ties,
        cat_wins: totals.cat_wins,
        cat_losses: totals.cat_losses,
        cat_ties: totals.cat_ties,
        championships: totals.championships,
        season_records: records.to_vec(),
    }
}

fn manager_summaries(rng: &mut StdRng, franchises: &[FranchiseStats]) -> Vec<ManagerSummary> {
    let mut out = Vec::new();
    for f in franchises {
        for owner in &f.ownership {
            let records: Vec<SeasonRecord> = f
                .season_records
                .iter()
                .filter(|r| r.manager.as_deref() == Some(owner.manager.as_str()))
                .map(|r| SeasonRecord {
                    manager: None,
                    ..r.clone()
                })
                .collect();
            let totals = total_seasons(&records);
            let playoff_games = records.iter().filter(|r| r.playoff_seed.is_some()).count() as u32;
            let playoff_wins = rng.gen_range(0..=playoff_games * 2);
            out.push(ManagerSummary {
                guid: owner.guid.clone(),
                name: owner.manager.clone(),
                is_current: owner.to.is_none(),
                seasons: records.iter().map(|r| r.season).collect(),
                wins: totals.wins,
                losses: totals.losses,
                ties: totals.ties,
                cat_wins: totals.cat_wins,
                cat_losses: totals.cat_losses,
                cat_ties: totals.cat_ties,
                playoff_wins,
                playoff_losses: playoff_games * 2 - playoff_wins,
                championships: totals.championships,
                regular_season_firsts: records.iter().filter(|r| r.playoff_seed == Some(1)).count() as u32,
                best_finish: totals.best_finish,
                worst_finish: totals.worst_finish,
                season_records: records,
                franchise_id: owner.to.is_none().then(|| f.id.clone()),
            });
        }
    }
    out
}

/// Managers inherit the meetings of the franchise they currently run.
fn manager_h2h(franchise_h2h: &H2HMap, franchises: &[FranchiseStats]) -> H2HMap {
    let current_guid: HashMap<&str, String> = franchises
        .iter()
        .filter_map(|f| f.ownership.last().map(|o| (f.id.as_str(), o.guid.clone())))
        .collect();
    let mut map = H2HMap::new();
    for (row, cols) in franchise_h2h {
        let Some(row_guid) = current_guid.get(row.as_str()) else { continue };
        for (col, record) in cols {
            let Some(col_guid) = current_guid.get(col.as_str()) else { continue };
            map.entry(row_guid.clone())
                .or_default()
                .insert(col_guid.clone(), *record);
        }
    }
    map
}

fn franchise_detail(
    rng: &mut StdRng,
    stats: &FranchiseStats,
    franchise_h2h: &H2HMap,
    seasons: &[i32],
) -> FranchiseDetailResponse {
    let mut h2h: Vec<FranchiseH2HEntry> = franchise_h2h
        .get(&stats.id)
        .map(|cols| {
            cols.iter()
                .filter_map(|(other, record)| {
                    let name = FRANCHISES.iter().find(|(id, _)| *id == other.as_str())?.1;
                    Some(FranchiseH2HEntry {
                        franchise_id: other.clone(),
                        name: name.to_string(),
                        wins: record.wins,
                        losses: record.losses,
                        ties: record.ties,
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    h2h.sort_by(|a, b| a.name.cmp(&b.name));

    let counts = seasons
        .iter()
        .map(|&season| TransactionCount {
            season,
            adds: rng.gen_range(5..=40),
            drops: rng.gen_range(5..=40),
        })
        .collect();

    let mut trades = Vec::new();
    for &season in seasons {
        for _ in 0..rng.gen_range(0..=2) {
            let give = *PLAYERS.choose(rng).unwrap_or(&PLAYERS[0]);
            let get = *PLAYERS.choose(rng).unwrap_or(&PLAYERS[1]);
            let partner = FRANCHISES.choose(rng).map(|f| f.1).unwrap_or(FRANCHISES[0].1);
            let week = rng.gen_range(1..=WEEKS);
            trades.push(Trade {
                season,
                week: Some(week),
                timestamp: format!("{season}-{:02}-15T12:00:00Z", 4 + week / 4),
                players: vec![
                    TradePlayer {
                        name: give.to_string(),
                        source_team: stats.name.clone(),
                        dest_team: partner.to_string(),
                    },
                    TradePlayer {
                        name: get.to_string(),
                        source_team: partner.to_string(),
                        dest_team: stats.name.clone(),
                    },
                ],
            });
        }
    }

    let keepers = seasons
        .iter()
        .skip(1)
        .map(|&season| SeasonKeepers {
            season,
            keepers: PLAYERS
                .choose_multiple(rng, keeper_count(season))
                .map(|name| KeeperEntry {
                    name: name.to_string(),
                    position: None,
                    round_cost: Some((season % 7) as u32 + 3),
                    kept_from_season: Some(season - 1),
                    tenure: Some(1),
                })
                .collect(),
        })
        .collect();

    FranchiseDetailResponse {
        overview: FranchiseOverview {
            id: stats.id.clone(),
            name: stats.name.clone(),
            current_manager: stats.current_manager.clone(),
            current_team_name: stats.current_team_name.clone(),
            ownership: stats.ownership.clone(),
            seasons: stats.seasons.clone(),
        },
        stats: total_seasons(&stats.season_records),
        season_records: stats.season_records.clone(),
        h2h,
        keepers,
        transactions: Transactions { counts, trades },
        current_matchup: None,
    }
}

fn keeper_count(season: i32) -> usize {
    (season.rem_euclid(3) + 1) as usize
}

fn league_records(rng: &mut StdRng, managers: &[ManagerSummary], seasons: &[i32]) -> RecordsResponse {
    const CATEGORIES: [(&str, f64, f64, bool); 8] = [
        ("R", 40.0, 70.0, true),
        ("HR", 12.0, 25.0, true),
        ("RBI", 40.0, 75.0, true),
        ("SB", 8.0, 20.0, true),
        ("AVG", 0.300, 0.360, true),
        ("K", 70.0, 110.0, true),
        ("ERA", 0.80, 1.90, false),
        ("WHIP", 0.70, 0.95, false),
    ];
    let pick_manager = |rng: &mut StdRng| {
        managers
            .choose(rng)
            .map(|m| (m.name.clone(), m.season_records.first().map(|r| r.team_name.clone()).unwrap_or_default()))
            .unwrap_or_default()
    };
    let pick_season = |rng: &mut StdRng| *seasons.choose(rng).unwrap_or(&FIRST_SEASON);

    let category_records = CATEGORIES
        .iter()
        .map(|(category, lo, hi, higher)| {
            let (manager, team_name) = pick_manager(rng);
            let raw = rng.gen_range(*lo..*hi);
            let value = if *lo >= 5.0 { raw.round() } else { raw };
            CategoryRecord {
                category: category.to_string(),
                value,
                manager,
                team_name,
                season: pick_season(rng),
                week: rng.gen_range(1..=WEEKS),
                higher_is_better: *higher,
            }
        })
        .collect();

    let streak = |rng: &mut StdRng, lo: u32, hi: u32| {
        let (manager, team_name) = pick_manager(rng);
        Some(StreakRecord {
            manager,
            team_name,
            streak: rng.gen_range(lo..=hi),
        })
    };
    let streaks = Streaks {
        longest_win_streak: streak(rng, 6, 12),
        longest_loss_streak: streak(rng, 5, 10),
        longest_undefeated_streak: streak(rng, 7, 14),
    };

    let matchup = |rng: &mut StdRng, score: &str| {
        let (winner, winner_team) = pick_manager(rng);
        let (loser, loser_team) = pick_manager(rng);
        Some(MatchupRecord {
            winner,
            loser,
            winner_team,
            loser_team,
            score: score.to_string(),
            season: pick_season(rng),
            week: rng.gen_range(1..=WEEKS),
        })
    };
    let matchup_records = MatchupRecords {
        biggest_blowout: matchup(rng, "10-0"),
        closest_match: matchup(rng, "5-4-1"),
    };

    RecordsResponse {
        category_records,
        streaks,
        matchup_records,
    }
}
