use std::env;
use std::path::PathBuf;

use crate::scope::Scope;
use crate::scoring::{ScoringMode, WinPctBasis};

const DEFAULT_SPORT: &str = "baseball";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PREFETCH_THREADS: usize = 4;
const DEFAULT_DEMO_SEED: u64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `None` runs against the built-in demo league.
    pub api_url: Option<String>,
    pub sport: String,
    pub scoring: ScoringMode,
    pub scope: Scope,
    pub win_pct_basis: WinPctBasis,
    pub http_timeout_secs: u64,
    pub prefetch_threads: usize,
    pub demo_seed: u64,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };

        let sport = non_empty("LEAGUE_SPORT").unwrap_or_else(|| DEFAULT_SPORT.to_string());
        let scoring = non_empty("LEAGUE_SCORING")
            .and_then(|val| val.parse::<ScoringMode>().ok())
            .unwrap_or_else(|| ScoringMode::default_for_sport(&sport));
        let scope = non_empty("LEAGUE_SCOPE")
            .and_then(|val| val.parse::<Scope>().ok())
            .unwrap_or_default();
        let win_pct_basis = non_empty("LEAGUE_WIN_PCT_BASIS")
            .and_then(|val| val.parse::<WinPctBasis>().ok())
            .unwrap_or_default();
        let http_timeout_secs = non_empty("LEAGUE_HTTP_TIMEOUT_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);
        let prefetch_threads = non_empty("LEAGUE_PREFETCH_THREADS")
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(DEFAULT_PREFETCH_THREADS)
            .clamp(1, 16);
        let demo_seed = non_empty("LEAGUE_DEMO_SEED")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_DEMO_SEED);

        Self {
            api_url: non_empty("LEAGUE_API_URL").map(|url| url.trim_end_matches('/').to_string()),
            sport,
            scoring,
            scope,
            win_pct_basis,
            http_timeout_secs,
            prefetch_threads,
            demo_seed,
            log_filter: non_empty("LEAGUE_LOG").unwrap_or_else(|| "info".to_string()),
            log_file: non_empty("LEAGUE_LOG_FILE").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::AppConfig;
    use crate::scope::Scope;
    use crate::scoring::{ScoringMode, WinPctBasis};

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_follow_sport() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.sport, "baseball");
        assert_eq!(cfg.scoring, ScoringMode::Category);
        assert_eq!(cfg.scope, Scope::AllTime);
        assert_eq!(cfg.win_pct_basis, WinPctBasis::AllGames);
        assert!(cfg.api_url.is_none());

        let cfg = config_from(&[("LEAGUE_SPORT", "basketball")]);
        assert_eq!(cfg.scoring, ScoringMode::Matchup);
    }

    #[test]
    fn explicit_values_and_clamps() {
        let cfg = config_from(&[
            ("LEAGUE_API_URL", "https://league.example/ "),
            ("LEAGUE_SCORING", "matchup"),
            ("LEAGUE_SCOPE", "current"),
            ("LEAGUE_WIN_PCT_BASIS", "decided"),
            ("LEAGUE_HTTP_TIMEOUT_SECS", "0"),
            ("LEAGUE_PREFETCH_THREADS", "999"),
        ]);
        assert_eq!(cfg.api_url.as_deref(), Some("https://league.example"));
        assert_eq!(cfg.scoring, ScoringMode::Matchup);
        assert_eq!(cfg.scope, Scope::CurrentOwner);
        assert_eq!(cfg.win_pct_basis, WinPctBasis::Decided);
        assert_eq!(cfg.http_timeout_secs, 1);
        assert_eq!(cfg.prefetch_threads, 16);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let cfg = config_from(&[("LEAGUE_SCOPE", "sometimes"), ("LEAGUE_DEMO_SEED", "x")]);
        assert_eq!(cfg.scope, Scope::AllTime);
        assert_eq!(cfg.demo_seed, 7);
    }
}
