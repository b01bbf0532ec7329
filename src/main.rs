use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex, mpsc};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tracing::info;
use tracing_subscriber::EnvFilter;

use league_ledger::aggregate::{RecordLine, SeasonBoard, trade_legs};
use league_ledger::api::ApiClient;
use league_ledger::classify::{
    RankChange, finish_badge, format_finish_groups, ordinal, rank_change, streak_badge,
};
use league_ledger::config::AppConfig;
use league_ledger::demo::DemoLeague;
use league_ledger::feed::spawn_provider;
use league_ledger::h2h::{Cell, WinRateBucket};
use league_ledger::http_cache::FetchCache;
use league_ledger::records::format_category_value;
use league_ledger::scope::Cutoff;
use league_ledger::scoring::{format_pct, format_record, pick};
use league_ledger::season::{BracketGame, champion};
use league_ledger::state::{
    AppState, Delta, EntityRow, FranchiseView, H2HView, ProviderCommand, Screen, SeasonView,
    apply_delta,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    prefetch_sent: bool,
}

impl App {
    fn new(state: AppState, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
            prefetch_sent: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.set_screen(Screen::Managers),
            KeyCode::Char('2') => self.state.set_screen(Screen::Franchises),
            KeyCode::Char('3') => self.state.set_screen(Screen::HeadToHead),
            KeyCode::Char('4') => self.state.set_screen(Screen::Records),
            KeyCode::Char('5') => {
                if let Some(season) = self.state.open_season_screen() {
                    self.send(ProviderCommand::FetchPlayoffs { season }, "Playoffs");
                }
            }
            KeyCode::Char(']') | KeyCode::Right if self.state.screen == Screen::Season => {
                self.step_season(true)
            }
            KeyCode::Char('[') | KeyCode::Left if self.state.screen == Screen::Season => {
                self.step_season(false)
            }
            KeyCode::Enter => {
                if let Some(franchise_id) = self.state.open_selected_franchise() {
                    self.send(
                        ProviderCommand::FetchFranchiseDetail { franchise_id },
                        "Franchise detail",
                    );
                }
            }
            KeyCode::Char('b') | KeyCode::Esc => self.state.back(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('s') => {
                self.state.toggle_scope();
                let label = self.state.scope.label();
                self.state.push_log(format!("[INFO] Scope: {label}"));
            }
            KeyCode::Char('m') => {
                self.state.toggle_scoring();
                let label = self.state.scoring.label();
                self.state.push_log(format!("[INFO] Scoring: {label}"));
            }
            KeyCode::Char('h') => self.state.toggle_h2h_view(),
            KeyCode::Char('t') => self.state.toggle_team_view(),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn send(&mut self, cmd: ProviderCommand, what: &str) -> bool {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log(format!("[INFO] {what} fetch unavailable"));
            return false;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log(format!("[WARN] {what} request failed"));
            return false;
        }
        true
    }

    fn step_season(&mut self, older: bool) {
        if let Some(season) = self.state.cycle_season(older) {
            self.send(ProviderCommand::FetchPlayoffs { season }, "Playoffs");
        }
    }

    fn refresh(&mut self) {
        let league = self.send(ProviderCommand::FetchLeague, "League");
        let records = self.send(ProviderCommand::FetchRecords, "Records");
        let seasons = self.send(ProviderCommand::FetchSeasons, "Season list");
        if league && records && seasons {
            self.state.push_log("[INFO] Refresh requested");
        }
    }

    /// Once the league is known, every franchise detail is fetched in the
    /// background so the detail screen opens without a wait.
    fn maybe_prefetch(&mut self) {
        if self.prefetch_sent || !self.state.league_loaded {
            return;
        }
        self.prefetch_sent = true;
        let ids: Vec<String> = self
            .state
            .league
            .franchise_stats
            .iter()
            .map(|f| f.id.clone())
            .collect();
        let franchise_ids: Vec<String> = ids
            .into_iter()
            .filter(|id| self.state.request_franchise(id))
            .collect();
        if franchise_ids.is_empty() {
            return;
        }
        self.send(
            ProviderCommand::PrefetchFranchises { franchise_ids },
            "Franchise prefetch",
        );
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env();
    init_tracing(&config)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    match &config.api_url {
        Some(url) => {
            let cache = Arc::new(FetchCache::new());
            let client = ApiClient::new(url, &config.sport, config.http_timeout_secs, cache)?;
            spawn_provider(Arc::new(client), tx, cmd_rx, config.prefetch_threads);
        }
        None => {
            let demo = DemoLeague::generate(config.demo_seed, Utc::now().year() - 1);
            spawn_provider(Arc::new(demo), tx, cmd_rx, config.prefetch_threads);
        }
    }
    info!(sport = %config.sport, demo = config.api_url.is_none(), "dashboard starting");

    let mut state = AppState::from_config(&config);
    if config.api_url.is_none() {
        state.push_log("[INFO] LEAGUE_API_URL not set, showing the demo league");
    }
    let mut app = App::new(state, Some(cmd_tx));
    app.refresh();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

/// Stdout belongs to the terminal UI, so tracing output only goes to a file.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.maybe_prefetch();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let state = &app.state;
    if !state.league_loaded {
        let loading = Paragraph::new("Loading league history...")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(loading, chunks[1]);
    } else {
        match &state.screen {
            Screen::Managers if state.team_view => render_season_boards(frame, chunks[1], state),
            Screen::Managers => render_entity_list(frame, chunks[1], state, &state.manager_rows()),
            Screen::Franchises => {
                render_entity_list(frame, chunks[1], state, &state.franchise_rows())
            }
            Screen::FranchiseDetail { franchise_id } => {
                render_franchise_detail(frame, chunks[1], state, franchise_id)
            }
            Screen::HeadToHead => render_h2h(frame, chunks[1], state),
            Screen::Records => render_records(frame, chunks[1], state),
            Screen::Season => render_season(frame, chunks[1], state),
        }
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(state));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match state.screen {
        Screen::Managers if state.team_view => "SEASONS",
        Screen::Managers => "MANAGERS",
        Screen::Franchises => "FRANCHISES",
        Screen::FranchiseDetail { .. } => "FRANCHISE",
        Screen::HeadToHead => match state.h2h_view {
            H2HView::Managers => "H2H · MANAGERS",
            H2HView::Franchises => "H2H · FRANCHISES",
        },
        Screen::Records => "RECORDS",
        Screen::Season => "SEASON",
    };
    let line1 = format!(
        "  /\\   LEAGUE LEDGER | {} | {screen} | Scope: {} | Mode: {}",
        state.sport.to_uppercase(),
        state.scope.label(),
        state.scoring.label()
    );
    let line2 = " /  \\".to_string();
    let line3 = " \\__/".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Managers => {
            "1-5 Screens | Enter Franchise | j/k Move | s Scope | m Mode | t Seasons | r Refresh | ? Help | q Quit".to_string()
        }
        Screen::Franchises => {
            "1-5 Screens | Enter Open | j/k Move | s Scope | m Mode | r Refresh | ? Help | q Quit".to_string()
        }
        Screen::FranchiseDetail { .. } => {
            "b/Esc Back | j/k Scroll | s Scope | m Mode | ? Help | q Quit".to_string()
        }
        Screen::HeadToHead => {
            "1-5 Screens | h Managers/Franchises | s Scope | ? Help | q Quit".to_string()
        }
        Screen::Records => "1-5 Screens | j/k Move | s Scope | ? Help | q Quit".to_string(),
        Screen::Season => {
            "1-5 Screens | [/] Season | j/k Move | m Mode | ? Help | q Quit".to_string()
        }
    }
}

fn entity_columns() -> [Constraint; 6] {
    [
        Constraint::Min(22),
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(16),
        Constraint::Min(20),
    ]
}

fn render_entity_list(frame: &mut Frame, area: Rect, state: &AppState, rows: &[EntityRow]) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = entity_columns();
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    for (idx, title) in ["Name", "Record", "Win%", "Medals", "Titles", "Top seeds"]
        .iter()
        .enumerate()
    {
        render_cell_text(frame, header_cols[idx], title, bold);
    }

    let list_area = sections[1];
    if rows.is_empty() {
        let empty = Paragraph::new("Nobody matches this scope")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    const ROW_HEIGHT: u16 = 2;
    if list_area.height < ROW_HEIGHT {
        return;
    }
    let visible = (list_area.height / ROW_HEIGHT) as usize;
    let (start, end) = visible_range(state.selected, rows.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + (i as u16) * ROW_HEIGHT,
            width: list_area.width,
            height: ROW_HEIGHT,
        };
        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let row = &rows[idx];
        let name = match row.cutoff {
            Cutoff::From(season) => format!("{} (since {season})", row.name),
            Cutoff::Unbounded => row.name.clone(),
        };
        let medals: String = row.medals.iter().map(|m| m.symbol()).collect();
        let titles = if row.championship_years.is_empty() {
            "-".to_string()
        } else {
            row.championship_years
                .iter()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };

        render_two_line(frame, cols[0], &name, &row.subtitle, row_style);
        render_cell_text(frame, cols[1], &format_record(row.line.record), row_style);
        render_cell_text(frame, cols[2], &format_pct(row.line.win_pct), row_style);
        render_cell_text(frame, cols[3], &medals, row_style);
        render_cell_text(frame, cols[4], &titles, row_style);
        render_cell_text(frame, cols[5], &format_finish_groups(&row.seed_finishes), row_style);
    }
}

fn render_season_boards(frame: &mut Frame, area: Rect, state: &AppState) {
    let boards = state.season_boards();
    if boards.is_empty() {
        let empty = Paragraph::new("No seasons recorded")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }
    let selected = state.selected.min(boards.len() - 1);
    let previous = boards.get(selected + 1);
    let text = season_board_text(&boards[selected], previous, state);
    let title = format!("Season {} ({}/{})", boards[selected].season, selected + 1, boards.len());
    let panel = Paragraph::new(text).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn season_board_text(board: &SeasonBoard, previous: Option<&SeasonBoard>, state: &AppState) -> String {
    let prev_rank: HashMap<&str, u32> = previous
        .map(|b| {
            b.rows
                .iter()
                .enumerate()
                .map(|(pos, row)| (row.guid.as_str(), pos as u32 + 1))
                .collect()
        })
        .unwrap_or_default();

    board
        .rows
        .iter()
        .enumerate()
        .map(|(pos, row)| {
            let rank = pos as u32 + 1;
            let movement = match prev_rank.get(row.guid.as_str()).map(|prev| rank_change(rank, *prev)) {
                Some(RankChange::Up(n)) => format!("▲{n}"),
                Some(RankChange::Down(n)) => format!("▼{n}"),
                Some(RankChange::Same) => "=".to_string(),
                None => "new".to_string(),
            };
            let finish = row
                .record
                .finish
                .filter(|f| *f > 0)
                .map(finish_badge)
                .unwrap_or_else(|| "-".to_string());
            format!(
                "{:>3}. {:<4} {:<20} {:<24} {:>9}  {finish}",
                rank,
                movement,
                row.manager,
                row.record.team_name,
                format_record(pick(&row.record, state.scoring)),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_franchise_detail(frame: &mut Frame, area: Rect, state: &AppState, franchise_id: &str) {
    let Some(view) = state.franchise_view(franchise_id) else {
        let msg = if state.pending_franchises.contains(franchise_id) {
            "Loading franchise..."
        } else {
            "No detail for this franchise"
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let scroll = (state.detail_scroll, 0);
    let left = Paragraph::new(franchise_overview_text(&view, state))
        .block(Block::default().title(view.name.clone()).borders(Borders::ALL))
        .scroll(scroll);
    frame.render_widget(left, columns[0]);

    let right = Paragraph::new(franchise_activity_text(&view))
        .block(Block::default().title("Activity & H2H").borders(Borders::ALL))
        .scroll(scroll);
    frame.render_widget(right, columns[1]);
}

fn franchise_overview_text(view: &FranchiseView, state: &AppState) -> String {
    let mut lines = Vec::new();
    let manager = if view.current_team_name.is_empty() {
        view.current_manager.clone()
    } else {
        format!("{} · {}", view.current_manager, view.current_team_name)
    };
    lines.push(format!("Manager: {manager}"));
    if let Some(season) = view.cutoff.season() {
        lines.push(format!("Scope: seasons since {season}"));
    }
    let totals = &view.summary.totals;
    lines.push(format!(
        "Record: {} ({})  Seasons: {}",
        format_record(view.summary.line.record),
        format_pct(view.summary.line.win_pct),
        totals.seasons_played
    ));
    lines.push(format!(
        "Championships: {}  Best: {}  Worst: {}",
        totals.championships,
        totals.best_finish.map(ordinal).unwrap_or_else(|| "-".to_string()),
        totals.worst_finish.map(ordinal).unwrap_or_else(|| "-".to_string()),
    ));
    let medals: String = view.finishes.medals.iter().map(|m| m.symbol()).collect();
    if !medals.is_empty() {
        lines.push(format!("Medals: {medals}"));
    }
    lines.push(format!(
        "Finishes: {}",
        format_finish_groups(&view.finishes.finish_groups)
    ));
    lines.push(format!(
        "Seeds: {}",
        format_finish_groups(&view.finishes.seed_groups)
    ));

    if let Some(m) = &view.current_matchup {
        let stage = if m.is_playoffs { "playoffs" } else { "week" };
        lines.push(String::new());
        lines.push(format!(
            "Now: {stage} {} vs {} ({}) {}-{}-{}",
            m.week, m.opponent_team_name, m.opponent_manager, m.cats_won, m.cats_lost, m.cats_tied
        ));
    }

    if view.ownership.len() > 1 {
        lines.push(String::new());
        lines.push("Eras:".to_string());
        for era in &view.eras {
            let span = match era.to {
                Some(to) => format!("{}-{to}", era.from),
                None => format!("{}-", era.from),
            };
            let line = RecordLine::of(&era.totals, state.scoring, state.win_pct_basis);
            lines.push(format!(
                "  {:<18} {span:<10} {} ({})  titles {}",
                era.manager,
                format_record(line.record),
                format_pct(line.win_pct),
                era.totals.championships
            ));
        }
    }

    lines.push(String::new());
    lines.push("Seasons:".to_string());
    for sr in view.summary.filtered.iter().rev() {
        let finish = sr
            .finish
            .filter(|f| *f > 0)
            .map(finish_badge)
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "  {} {:<24} {:>9}  {finish}",
            sr.season,
            sr.team_name,
            format_record(pick(sr, state.scoring))
        ));
    }
    lines.join("\n")
}

fn franchise_activity_text(view: &FranchiseView) -> String {
    let activity = &view.activity;
    let mut lines = vec![
        format!(
            "Moves: {} (adds {}, drops {})",
            activity.moves(),
            activity.adds,
            activity.drops
        ),
        format!(
            "Trades: {} ({} players)  Keepers: {}",
            activity.trades, activity.players_traded, activity.keepers
        ),
    ];

    for trade in activity.trade_log.iter().rev().take(5) {
        let when = match trade.week {
            Some(week) => format!("{} wk {week}", trade.season),
            None => trade.season.to_string(),
        };
        for leg in trade_legs(trade) {
            lines.push(format!("  {when}: {} [{}]", leg.direction, leg.players.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push("Head-to-head:".to_string());
    if view.h2h.is_empty() {
        lines.push("  No meetings recorded".to_string());
    }
    for row in &view.h2h {
        let pct = row
            .win_pct
            .map(format_pct)
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "  {:<22} {:>8} {pct:>5}",
            row.name,
            format_record(row.record)
        ));
    }
    lines.join("\n")
}

fn bucket_color(bucket: WinRateBucket) -> Color {
    match bucket {
        WinRateBucket::StrongFavorable => Color::Green,
        WinRateBucket::Favorable => Color::LightGreen,
        WinRateBucket::Neutral => Color::Yellow,
        WinRateBucket::Unfavorable => Color::LightRed,
        WinRateBucket::StrongUnfavorable => Color::Red,
    }
}

fn render_h2h(frame: &mut Frame, area: Rect, state: &AppState) {
    const CELL: usize = 9;
    let matrix = state.h2h_matrix();
    if matrix.is_empty() {
        let empty = Paragraph::new("No head-to-head data")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let label_width = matrix
        .headers
        .iter()
        .map(|h| h.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(20)
        + 1;

    let mut lines: Vec<Line> = Vec::with_capacity(matrix.headers.len() + 1);
    let mut head = vec![Span::raw(" ".repeat(label_width))];
    for h in &matrix.headers {
        head.push(Span::styled(
            format!("{:^CELL$}", truncate(&h.short, CELL - 1)),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::from(head));

    for (row_idx, header) in matrix.headers.iter().enumerate() {
        let row_style = if row_idx == state.selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let mut spans = vec![Span::styled(
            format!("{:<label_width$}", truncate(&header.name, label_width - 1)),
            row_style,
        )];
        for col_idx in 0..matrix.headers.len() {
            let span = match matrix.cell(row_idx, col_idx) {
                Some(Cell::Record { record, bucket, .. }) => Span::styled(
                    format!("{:^CELL$}", format_record(*record)),
                    Style::default().fg(bucket_color(*bucket)),
                ),
                Some(Cell::Diagonal) => Span::styled(
                    format!("{:^CELL$}", "--"),
                    Style::default().fg(Color::DarkGray),
                ),
                Some(Cell::NoData) | None => Span::styled(
                    format!("{:^CELL$}", "·"),
                    Style::default().fg(Color::DarkGray),
                ),
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    let title = "Row vs column (wins-losses-ties)";
    let grid = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(grid, area);
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn render_records(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(records) = state.scoped_records() else {
        let empty = Paragraph::new("Loading records...")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    if records.category_records.is_empty() {
        lines.push(Line::from("No category records in this scope"));
    }
    for (idx, r) in records.category_records.iter().enumerate() {
        let style = if idx == state.selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let arrow = if r.higher_is_better { "▲" } else { "▼" };
        lines.push(Line::styled(
            format!(
                "{:<6}{arrow} {:>8}  {:<18} {} wk {}",
                r.category,
                format_category_value(&r.category, r.value),
                r.manager,
                r.season,
                r.week
            ),
            style,
        ));
    }
    let categories = Paragraph::new(lines)
        .block(Block::default().title("Category records").borders(Borders::ALL));
    frame.render_widget(categories, columns[0]);

    let streak_line = |label: &str, record: &Option<league_ledger::types::StreakRecord>, sign: i32| {
        match record {
            Some(s) => {
                let badge = streak_badge(sign * s.streak as i32).unwrap_or_default();
                format!("{label}: {badge} {}", s.manager)
            }
            None => format!("{label}: -"),
        }
    };
    let matchup_line = |label: &str, record: &Option<league_ledger::types::MatchupRecord>| match record {
        Some(m) => format!(
            "{label}: {} def. {} {} ({} wk {})",
            m.winner, m.loser, m.score, m.season, m.week
        ),
        None => format!("{label}: -"),
    };
    let side = [
        streak_line("Win streak", &records.streaks.longest_win_streak, 1),
        streak_line("Loss streak", &records.streaks.longest_loss_streak, -1),
        streak_line("Unbeaten", &records.streaks.longest_undefeated_streak, 1),
        String::new(),
        matchup_line("Blowout", &records.matchup_records.biggest_blowout),
        matchup_line("Closest", &records.matchup_records.closest_match),
    ]
    .join("\n");
    let panel = Paragraph::new(side)
        .block(Block::default().title("Streaks & matchups").borders(Borders::ALL));
    frame.render_widget(panel, columns[1]);
}

fn render_season(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(view) = state.season_view() else {
        let empty = Paragraph::new("No seasons recorded")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    if view.standings.is_empty() {
        lines.push(Line::from("No teams recorded for this season"));
    }
    for (idx, row) in view.standings.iter().enumerate() {
        let style = if idx == state.selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let seed = row
            .playoff_seed
            .map(|s| format!("#{s}"))
            .unwrap_or_default();
        let finish = row
            .finish
            .filter(|f| *f > 0)
            .map(finish_badge)
            .unwrap_or_else(|| "-".to_string());
        lines.push(Line::styled(
            format!(
                "{:>2}. {:<24} {:<16} {:>9} {seed:>3}  {finish}",
                row.rank,
                truncate(&row.team_name, 24),
                truncate(&row.manager, 16),
                format_record(row.record),
            ),
            style,
        ));
    }
    let status = if view.is_finished { "" } else { " (in progress)" };
    let standings = Paragraph::new(lines).block(
        Block::default()
            .title(format!("{}{status} standings", view.name))
            .borders(Borders::ALL),
    );
    frame.render_widget(standings, columns[0]);

    let bracket = Paragraph::new(bracket_lines(&view, state))
        .block(Block::default().title("Playoff bracket").borders(Borders::ALL));
    frame.render_widget(bracket, columns[1]);
}

fn bracket_lines(view: &SeasonView, state: &AppState) -> Vec<Line<'static>> {
    let Some(rounds) = &view.bracket else {
        let msg = if state.pending_playoffs.contains(&view.season) {
            "Loading bracket..."
        } else {
            "No bracket for this season"
        };
        return vec![Line::styled(msg, Style::default().fg(Color::DarkGray))];
    };
    if rounds.is_empty() {
        return vec![Line::from("No playoffs recorded")];
    }

    let mut lines = Vec::new();
    if let Some(winner) = champion(rounds) {
        lines.push(Line::styled(
            format!("{} {} ({})", finish_badge(1), winner.team_name, winner.manager),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from(""));
    }
    for round in rounds {
        lines.push(Line::styled(
            format!("{} · week {}", round.label, round.week),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        for game in &round.games {
            lines.extend(game_lines(game, false));
        }
        if !round.consolation.is_empty() {
            lines.push(Line::styled("  Consolation", Style::default().fg(Color::DarkGray)));
            for game in &round.consolation {
                lines.extend(game_lines(game, true));
            }
        }
    }
    lines
}

fn game_lines(game: &BracketGame, muted: bool) -> Vec<Line<'static>> {
    [&game.top, &game.bottom]
        .into_iter()
        .map(|side| {
            let seed = side.seed.map(|s| s.to_string()).unwrap_or_default();
            let style = match (muted, side.won) {
                (true, _) => Style::default().fg(Color::DarkGray),
                (false, true) => Style::default().add_modifier(Modifier::BOLD),
                (false, false) => Style::default().fg(Color::Gray),
            };
            Line::styled(
                format!(
                    "  {seed:>2} {:<24} {:>2}",
                    truncate(&side.team_name, 24),
                    side.score
                ),
                style,
            )
        })
        .collect()
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text.to_string()).style(style);
    frame.render_widget(paragraph, text_area);
}

fn render_two_line(frame: &mut Frame, area: Rect, top: &str, bottom: &str, style: Style) {
    let paragraph = Paragraph::new(format!("{top}\n{bottom}")).style(style);
    frame.render_widget(paragraph, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "League Ledger - Help",
        "",
        "Screens:",
        "  1            Managers",
        "  2            Franchises",
        "  3            Head-to-head",
        "  4            Records",
        "  5            Season standings & bracket",
        "  Enter        Open franchise",
        "  b / Esc      Back",
        "",
        "Views:",
        "  s            All-time / current owner",
        "  m            Categories / matchups",
        "  h            H2H managers / franchises",
        "  t            Manager cards / season boards",
        "  [ / ]        Newer / older season",
        "  j/k or ↑/↓   Move/scroll",
        "  r            Refresh",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
