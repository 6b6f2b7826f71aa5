use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::loader::{
    COL_ATTACK_TYPE, COL_DEFENSE_TYPE, COL_GOALKEEPER_STATUS, COL_PASS_STATUS, COL_PLAYER,
    COL_PLAYERS_ELIMINATED, COL_SHOT_STATUS, COL_TEAM, COL_X_FROM, COL_X_TO, COL_Y_FROM, COL_Y_TO,
    MatchTable,
};
use crate::vocabulary::{Category, ELIMINATION_BUCKET, ELIMINATION_BUCKET_MIN, is_pass_status};

/// Player name used in match files for the goalkeeper role.
pub const GOALKEEPER_MARKER: &str = "gardien";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerScope {
    /// Whole team when `players` is empty.
    Collective { players: Vec<String> },
    Individual {
        player: String,
        include_goalkeeper: bool,
    },
}

impl Default for PlayerScope {
    fn default() -> Self {
        PlayerScope::Collective {
            players: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub team: String,
    pub scope: PlayerScope,
    pub category: Category,
    pub filters: Vec<String>,
}

impl FilterSelection {
    pub fn team(team: impl Into<String>, category: Category) -> Self {
        Self {
            team: team.into(),
            scope: PlayerScope::default(),
            category,
            filters: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
    pub x: f64,
    pub y: f64,
}

/// One logged action, coordinates still normalized to [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub row: usize,
    pub team: String,
    pub player: String,
    pub from: FieldPoint,
    pub to: Option<FieldPoint>,
    pub pass_status: Option<String>,
    pub players_eliminated: Option<u32>,
    pub shot_status: Option<String>,
    pub attack_type: Option<String>,
    pub defense_type: Option<String>,
    pub goalkeeper_status: Option<String>,
}

impl MatchRecord {
    /// Status or type value that labels this record for `category`.
    pub fn outcome(&self, category: Category) -> Option<&str> {
        match category {
            Category::Pass => self.pass_status.as_deref(),
            Category::Shot => self.shot_status.as_deref(),
            Category::Attack => self.attack_type.as_deref(),
            Category::Defense => self.defense_type.as_deref(),
            Category::Goalkeeper => self.goalkeeper_status.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    team: usize,
    player: usize,
    x_from: usize,
    y_from: usize,
    x_to: Option<usize>,
    y_to: Option<usize>,
    outcome: usize,
}

impl Columns {
    fn resolve(table: &MatchTable, category: Category) -> Result<Self> {
        let (x_to, y_to) = if category == Category::Pass {
            (
                Some(table.require_column(COL_X_TO)?),
                Some(table.require_column(COL_Y_TO)?),
            )
        } else {
            (table.column_index(COL_X_TO), table.column_index(COL_Y_TO))
        };
        Ok(Self {
            team: table.require_column(COL_TEAM)?,
            player: table.require_column(COL_PLAYER)?,
            x_from: table.require_column(COL_X_FROM)?,
            y_from: table.require_column(COL_Y_FROM)?,
            x_to,
            y_to,
            outcome: table.require_column(category.outcome_column())?,
        })
    }
}

/// Runs the full pipeline: team, player scope, then category filters.
///
/// An empty filter list means no category restriction. The table is only
/// read; empty results are returned as an empty vec.
pub fn filter_events(table: &MatchTable, selection: &FilterSelection) -> Result<Vec<MatchRecord>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    let cols = Columns::resolve(table, selection.category)?;
    let rows = scoped_rows(table, &cols, selection);
    let rows = category_rows(table, &cols, selection, rows)?;
    build_records(table, &cols, selection.category, &rows)
}

/// Team and player-scope steps only, ignoring `selection.filters`.
pub fn filter_by_scope(
    table: &MatchTable,
    selection: &FilterSelection,
) -> Result<Vec<MatchRecord>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    let cols = Columns::resolve(table, selection.category)?;
    let rows = scoped_rows(table, &cols, selection);
    build_records(table, &cols, selection.category, &rows)
}

fn scoped_rows(table: &MatchTable, cols: &Columns, selection: &FilterSelection) -> Vec<usize> {
    let team_rows = (0..table.len())
        .filter(|&row| {
            table
                .text(row, cols.team)
                .is_some_and(|team| team == selection.team.as_str())
        })
        .collect::<Vec<_>>();

    let player_of = |row: usize| table.text(row, cols.player);

    match &selection.scope {
        PlayerScope::Collective { players } if players.is_empty() => team_rows,
        PlayerScope::Collective { players } => {
            let wanted = players.iter().map(String::as_str).collect::<HashSet<_>>();
            team_rows
                .into_iter()
                .filter(|&row| player_of(row).is_some_and(|p| wanted.contains(&*p)))
                .collect()
        }
        PlayerScope::Individual {
            player,
            include_goalkeeper,
        } => team_rows
            .into_iter()
            .filter(|&row| {
                player_of(row).is_some_and(|p| {
                    p == player.as_str() || (*include_goalkeeper && p == GOALKEEPER_MARKER)
                })
            })
            .collect(),
    }
}

fn category_rows(
    table: &MatchTable,
    cols: &Columns,
    selection: &FilterSelection,
    rows: Vec<usize>,
) -> Result<Vec<usize>> {
    if selection.filters.is_empty() {
        return Ok(rows);
    }

    if selection.category != Category::Pass {
        let wanted = selection
            .filters
            .iter()
            .map(String::as_str)
            .collect::<HashSet<_>>();
        return Ok(rows
            .into_iter()
            .filter(|&row| {
                table
                    .text(row, cols.outcome)
                    .is_some_and(|v| wanted.contains(&*v))
            })
            .collect());
    }

    let (statuses, eliminations): (Vec<&str>, Vec<&str>) = selection
        .filters
        .iter()
        .map(String::as_str)
        .partition(|token| is_pass_status(token));

    let mut rows = rows;
    if !statuses.is_empty() {
        rows.retain(|&row| {
            table
                .text(row, cols.outcome)
                .is_some_and(|v| statuses.contains(&&*v))
        });
    }
    if !eliminations.is_empty() {
        let elim_col = table.require_column(COL_PLAYERS_ELIMINATED)?;
        let mut kept = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(count) = eliminated_count(table, row, elim_col)? else {
                continue;
            };
            if eliminations
                .iter()
                .any(|token| elimination_token_matches(token, count))
            {
                kept.push(row);
            }
        }
        rows = kept;
    }
    Ok(rows)
}

/// "0", "1", "2" match exactly; "+2" matches three or more.
pub fn elimination_token_matches(token: &str, count: u32) -> bool {
    if token == ELIMINATION_BUCKET {
        return count >= ELIMINATION_BUCKET_MIN;
    }
    token.trim().parse::<u32>().is_ok_and(|n| n == count)
}

fn eliminated_count(table: &MatchTable, row: usize, col: usize) -> Result<Option<u32>> {
    let cell = table.cell(row, col);
    if cell.is_empty() {
        return Ok(None);
    }
    match cell.as_f64() {
        Some(n) if n >= 0.0 && n.fract() == 0.0 => Ok(Some(n as u32)),
        _ => Err(AnalysisError::InvalidCell {
            column: COL_PLAYERS_ELIMINATED.to_string(),
            row,
            value: cell.display(),
        }),
    }
}

fn build_records(
    table: &MatchTable,
    cols: &Columns,
    category: Category,
    rows: &[usize],
) -> Result<Vec<MatchRecord>> {
    let optional_text = |row: usize, name: &str| {
        table
            .column_index(name)
            .and_then(|col| table.text(row, col))
            .filter(|v| !v.is_empty())
            .map(|v| v.into_owned())
    };

    let elim_col = table.column_index(COL_PLAYERS_ELIMINATED);

    let mut records = Vec::with_capacity(rows.len());
    for &row in rows {
        let from = FieldPoint {
            x: coordinate(table, row, cols.x_from, COL_X_FROM)?,
            y: coordinate(table, row, cols.y_from, COL_Y_FROM)?,
        };
        let to = destination(table, row, cols)?;
        // Rows logged without a destination cannot be drawn as passes.
        if category == Category::Pass && to.is_none() {
            continue;
        }
        records.push(MatchRecord {
            row,
            team: table.text(row, cols.team).unwrap_or_default().into_owned(),
            player: table.text(row, cols.player).unwrap_or_default().into_owned(),
            from,
            to,
            pass_status: optional_text(row, COL_PASS_STATUS),
            players_eliminated: elim_col
                .and_then(|col| eliminated_count(table, row, col).ok().flatten()),
            shot_status: optional_text(row, COL_SHOT_STATUS),
            attack_type: optional_text(row, COL_ATTACK_TYPE),
            defense_type: optional_text(row, COL_DEFENSE_TYPE),
            goalkeeper_status: optional_text(row, COL_GOALKEEPER_STATUS),
        });
    }
    Ok(records)
}

fn coordinate(table: &MatchTable, row: usize, col: usize, name: &str) -> Result<f64> {
    let cell = table.cell(row, col);
    cell.as_f64().ok_or_else(|| AnalysisError::InvalidCell {
        column: name.to_string(),
        row,
        value: cell.display(),
    })
}

/// Destination pair; both cells empty means the action has no destination.
fn destination(table: &MatchTable, row: usize, cols: &Columns) -> Result<Option<FieldPoint>> {
    let (Some(x_col), Some(y_col)) = (cols.x_to, cols.y_to) else {
        return Ok(None);
    };
    if table.cell(row, x_col).is_empty() && table.cell(row, y_col).is_empty() {
        return Ok(None);
    }
    Ok(Some(FieldPoint {
        x: coordinate(table, row, x_col, COL_X_TO)?,
        y: coordinate(table, row, y_col, COL_Y_TO)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_token_covers_three_and_more() {
        assert!(!elimination_token_matches("+2", 2));
        assert!(elimination_token_matches("+2", 3));
        assert!(elimination_token_matches("+2", 7));
    }

    #[test]
    fn numeric_tokens_match_exactly() {
        assert!(elimination_token_matches("0", 0));
        assert!(elimination_token_matches("2", 2));
        assert!(!elimination_token_matches("2", 3));
        assert!(!elimination_token_matches("deux", 2));
    }
}
