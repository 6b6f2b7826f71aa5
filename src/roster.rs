use std::collections::BTreeSet;

use crate::error::Result;
use crate::loader::{COL_PLAYER, COL_TEAM, MatchTable};

/// Sorted distinct player names logged for `team`.
pub fn team_roster(table: &MatchTable, team: &str) -> Result<Vec<String>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    let team_col = table.require_column(COL_TEAM)?;
    let player_col = table.require_column(COL_PLAYER)?;

    let players = (0..table.len())
        .filter(|&row| table.text(row, team_col).is_some_and(|t| t == team))
        .filter_map(|row| table.text(row, player_col))
        .filter(|player| !player.is_empty())
        .map(|player| player.into_owned())
        .collect::<BTreeSet<_>>();

    Ok(players.into_iter().collect())
}

/// Distinct team names as they appear in the `equipe` column.
pub fn teams_in_table(table: &MatchTable) -> Vec<String> {
    let Some(team_col) = table.column_index(COL_TEAM) else {
        return Vec::new();
    };
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for row in 0..table.len() {
        let Some(team) = table.text(row, team_col) else {
            continue;
        };
        if !team.is_empty() && seen.insert(team.to_string()) {
            out.push(team.into_owned());
        }
    }
    out
}
