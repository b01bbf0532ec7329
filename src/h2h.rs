use crate::types::{FranchiseStats, FranchiseSummary, H2HMap, H2HRecord, ManagerSummary};

/// Something that can label a head-to-head row/column.
pub trait MatrixEntity {
    fn entity_id(&self) -> &str;
    fn display_name(&self) -> &str;
}

impl MatrixEntity for ManagerSummary {
    fn entity_id(&self) -> &str {
        &self.guid
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl MatrixEntity for FranchiseStats {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl MatrixEntity for FranchiseSummary {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinRateBucket {
    StrongFavorable,
    Favorable,
    Neutral,
    Unfavorable,
    StrongUnfavorable,
}

impl WinRateBucket {
    pub fn from_pct(win_pct: f64) -> Self {
        if win_pct >= 0.70 {
            WinRateBucket::StrongFavorable
        } else if win_pct >= 0.55 {
            WinRateBucket::Favorable
        } else if win_pct >= 0.45 {
            WinRateBucket::Neutral
        } else if win_pct >= 0.30 {
            WinRateBucket::Unfavorable
        } else {
            WinRateBucket::StrongUnfavorable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WinRateBucket::StrongFavorable => "strong-favorable",
            WinRateBucket::Favorable => "favorable",
            WinRateBucket::Neutral => "neutral",
            WinRateBucket::Unfavorable => "unfavorable",
            WinRateBucket::StrongUnfavorable => "strong-unfavorable",
        }
    }
}

/// Share of all meetings won. An empty record reads as an even 0.5 so it is
/// not colored like a loss.
pub fn h2h_win_pct(record: &H2HRecord) -> f64 {
    let total = record.games();
    if total == 0 {
        return 0.5;
    }
    record.wins as f64 / total as f64
}

/// Directional lookup; `B vs A` is never derived from `A vs B`.
pub fn h2h_lookup<'a>(h2h: &'a H2HMap, row: &str, col: &str) -> Option<&'a H2HRecord> {
    h2h.get(row).and_then(|cols| cols.get(col))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Diagonal,
    NoData,
    Record {
        record: H2HRecord,
        win_pct: f64,
        bucket: WinRateBucket,
    },
}

impl Cell {
    fn from_lookup(record: Option<&H2HRecord>) -> Self {
        match record {
            None => Cell::NoData,
            Some(record) => {
                let win_pct = h2h_win_pct(record);
                Cell::Record {
                    record: *record,
                    win_pct,
                    bucket: WinRateBucket::from_pct(win_pct),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixHeader {
    pub id: String,
    pub name: String,
    pub short: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct H2HMatrix {
    pub headers: Vec<MatrixHeader>,
    /// `cells[row][col]`, square over `headers`.
    pub cells: Vec<Vec<Cell>>,
}

impl H2HMatrix {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.id == id)
    }
}

/// Dense matrix over the entities that have at least one recorded meeting.
pub fn build_h2h_matrix<E: MatrixEntity>(entities: &[E], h2h: &H2HMap) -> H2HMatrix {
    let active: Vec<&E> = entities
        .iter()
        .filter(|e| h2h.get(e.entity_id()).is_some_and(|row| !row.is_empty()))
        .collect();

    let headers = active
        .iter()
        .map(|e| MatrixHeader {
            id: e.entity_id().to_string(),
            name: e.display_name().to_string(),
            short: short_name(e.display_name()),
        })
        .collect();

    let cells = active
        .iter()
        .map(|row| {
            active
                .iter()
                .map(|col| {
                    if row.entity_id() == col.entity_id() {
                        Cell::Diagonal
                    } else {
                        Cell::from_lookup(h2h_lookup(h2h, row.entity_id(), col.entity_id()))
                    }
                })
                .collect()
        })
        .collect();

    H2HMatrix { headers, cells }
}

/// First name for multi-word names, the whole name otherwise.
pub fn short_name(name: &str) -> String {
    let mut parts = name.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(first), Some(_)) => first.to_string(),
        _ => name.trim().to_string(),
    }
}
