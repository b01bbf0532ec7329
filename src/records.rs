use std::collections::HashSet;

use crate::scope::Scope;
use crate::types::{
    CategoryRecord, ManagerSummary, MatchupRecord, MatchupRecords, RecordsResponse, StreakRecord,
    Streaks,
};

pub fn current_manager_names(managers: &[ManagerSummary]) -> HashSet<String> {
    managers
        .iter()
        .filter(|m| m.is_current)
        .map(|m| m.name.clone())
        .collect()
}

/// League record book narrowed to what current managers hold. Under
/// current-owner scope a matchup record survives only if both sides are current.
pub fn scoped_records(
    records: &RecordsResponse,
    scope: Scope,
    managers: &[ManagerSummary],
) -> RecordsResponse {
    if scope == Scope::AllTime {
        return records.clone();
    }
    let current = current_manager_names(managers);
    let is_current = |name: &str| current.contains(name);

    let category_records: Vec<CategoryRecord> = records
        .category_records
        .iter()
        .filter(|r| is_current(&r.manager))
        .cloned()
        .collect();

    let keep_streak = |s: &Option<StreakRecord>| s.clone().filter(|s| is_current(&s.manager));
    let keep_matchup = |m: &Option<MatchupRecord>| {
        m.clone()
            .filter(|m| is_current(&m.winner) && is_current(&m.loser))
    };

    RecordsResponse {
        category_records,
        streaks: Streaks {
            longest_win_streak: keep_streak(&records.streaks.longest_win_streak),
            longest_loss_streak: keep_streak(&records.streaks.longest_loss_streak),
            longest_undefeated_streak: keep_streak(&records.streaks.longest_undefeated_streak),
        },
        matchup_records: MatchupRecords {
            biggest_blowout: keep_matchup(&records.matchup_records.biggest_blowout),
            closest_match: keep_matchup(&records.matchup_records.closest_match),
        },
    }
}

/// Rate categories print with three decimals, counts as integers.
pub fn format_category_value(category: &str, value: f64) -> String {
    const RATE_STATS: [&str; 9] = ["AVG", "OBP", "SLG", "OPS", "ERA", "WHIP", "FG%", "FT%", "3P%"];
    if RATE_STATS.contains(&category) {
        return format!("{value:.3}");
    }
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    format!("{value:.1}")
}
