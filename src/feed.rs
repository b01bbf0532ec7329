use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::state::{Delta, ProviderCommand};
use crate::types::{FranchiseDetailResponse, ManagersResponse, PlayoffResponse, RecordsResponse, Season};

/// Where league payloads come from: the remote API or the built-in demo league.
pub trait LeagueSource: Send + Sync {
    fn describe(&self) -> String;
    fn league(&self) -> Result<ManagersResponse>;
    fn records(&self) -> Result<RecordsResponse>;
    fn franchise_detail(&self, franchise_id: &str) -> Result<FranchiseDetailResponse>;
    fn seasons(&self) -> Result<Vec<Season>>;
    fn playoffs(&self, season: i32) -> Result<PlayoffResponse>;
}

impl LeagueSource for ApiClient {
    fn describe(&self) -> String {
        self.url(&format!("/api/{}", self.sport()))
    }

    fn league(&self) -> Result<ManagersResponse> {
        self.managers()
    }

    fn records(&self) -> Result<RecordsResponse> {
        ApiClient::records(self)
    }

    fn franchise_detail(&self, franchise_id: &str) -> Result<FranchiseDetailResponse> {
        ApiClient::franchise_detail(self, franchise_id)
    }

    fn seasons(&self) -> Result<Vec<Season>> {
        ApiClient::seasons(self)
    }

    fn playoffs(&self, season: i32) -> Result<PlayoffResponse> {
        ApiClient::playoffs(self, Some(season))
    }
}

/// Serves provider commands on a background thread until the command channel closes.
pub fn spawn_provider<S>(
    source: Arc<S>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
    prefetch_threads: usize,
) -> thread::JoinHandle<()>
where
    S: LeagueSource + 'static,
{
    thread::spawn(move || {
        info!(source = %source.describe(), "provider started");
        let pool = build_fetch_pool(prefetch_threads);
        while let Ok(cmd) = cmd_rx.recv() {
            handle_command(source.as_ref(), &pool, &tx, cmd);
        }
        debug!("provider command channel closed");
    })
}

pub fn handle_command<S: LeagueSource + ?Sized>(
    source: &S,
    pool: &Option<rayon::ThreadPool>,
    tx: &Sender<Delta>,
    cmd: ProviderCommand,
) {
    match cmd {
        ProviderCommand::FetchLeague => match source.league() {
            Ok(league) => {
                let _ = tx.send(Delta::SetLeague(league));
            }
            Err(err) => {
                warn!(error = %err, "league fetch failed");
                let _ = tx.send(Delta::Log(format!("[WARN] League fetch error: {err:#}")));
            }
        },
        ProviderCommand::FetchRecords => match source.records() {
            Ok(records) => {
                let _ = tx.send(Delta::SetRecords(records));
            }
            Err(err) => {
                warn!(error = %err, "records fetch failed");
                let _ = tx.send(Delta::Log(format!("[WARN] Records fetch error: {err:#}")));
            }
        },
        ProviderCommand::FetchFranchiseDetail { franchise_id } => {
            send_franchise_detail(source, tx, &franchise_id);
        }
        ProviderCommand::PrefetchFranchises { franchise_ids } => {
            let total = franchise_ids.len();
            with_fetch_pool(pool, || {
                franchise_ids
                    .par_iter()
                    .for_each_with(tx.clone(), |tx, id| send_franchise_detail(source, tx, id));
            });
            let _ = tx.send(Delta::Log(format!("[INFO] Prefetched {total} franchises")));
        }
        ProviderCommand::FetchSeasons => match source.seasons() {
            Ok(seasons) => {
                let _ = tx.send(Delta::SetSeasons(seasons));
            }
            Err(err) => {
                warn!(error = %err, "season list fetch failed");
                let _ = tx.send(Delta::Log(format!("[WARN] Season list error: {err:#}")));
            }
        },
        ProviderCommand::FetchPlayoffs { season } => {
            let delta = match source.playoffs(season) {
                Ok(playoffs) => Delta::SetPlayoffs {
                    season,
                    playoffs: Box::new(playoffs),
                },
                Err(err) => {
                    warn!(season, error = %err, "playoffs fetch failed");
                    Delta::PlayoffsFailed {
                        season,
                        error: format!("{err:#}"),
                    }
                }
            };
            let _ = tx.send(delta);
        }
    }
}

fn send_franchise_detail<S: LeagueSource + ?Sized>(source: &S, tx: &Sender<Delta>, franchise_id: &str) {
    let delta = match source.franchise_detail(franchise_id) {
        Ok(detail) => Delta::SetFranchiseDetail {
            franchise_id: franchise_id.to_string(),
            detail: Box::new(detail),
        },
        Err(err) => {
            warn!(franchise_id, error = %err, "franchise detail fetch failed");
            Delta::FranchiseDetailFailed {
                franchise_id: franchise_id.to_string(),
                error: format!("{err:#}"),
            }
        }
    };
    let _ = tx.send(delta);
}

pub fn build_fetch_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.clamp(1, 16))
        .thread_name(|idx| format!("league-fetch-{idx}"))
        .build()
        .ok()
}

fn with_fetch_pool<T>(pool: &Option<rayon::ThreadPool>, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}
