use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::loader::{
    COL_PLAYER, COL_PLAYERS_ELIMINATED, COL_TEAM, COL_X_FROM, COL_X_TO, COL_Y_FROM, COL_Y_TO,
};
use crate::pipeline::{FilterSelection, MatchRecord, PlayerScope};
use crate::render::{distance, scale_to_field};
use crate::summary::summarize_by_player;
use crate::vocabulary::Category;

pub struct ExportReport {
    pub events: usize,
    pub players: usize,
}

/// One exported cell; numbers stay numeric in the workbook.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn number_opt(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Blank)
    }
}

/// Writes the filtered events and a per-player breakdown to a workbook.
///
/// Column names match the source files so the export can be reloaded.
pub fn export_events(
    path: &Path,
    records: &[MatchRecord],
    selection: &FilterSelection,
) -> Result<ExportReport> {
    let category = selection.category;
    let mut header = vec![
        Cell::text(COL_TEAM),
        Cell::text(COL_PLAYER),
        Cell::text(COL_X_FROM),
        Cell::text(COL_Y_FROM),
        Cell::text(COL_X_TO),
        Cell::text(COL_Y_TO),
        Cell::text(category.outcome_column()),
    ];
    if category == Category::Pass {
        header.push(Cell::text(COL_PLAYERS_ELIMINATED));
        header.push(Cell::text("distance"));
    }

    let mut event_rows = vec![header];
    event_rows.extend(records.iter().map(|r| event_row(r, category)));

    let mut player_rows = vec![vec![
        Cell::text("Player"),
        Cell::text("Events"),
        Cell::text("Outcomes"),
        Cell::text("Mean Distance"),
    ]];
    let summaries = summarize_by_player(records, category);
    for s in &summaries {
        let outcomes = s
            .outcomes
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join(", ");
        player_rows.push(vec![
            Cell::text(s.player.as_str()),
            Cell::Number(s.events as f64),
            Cell::Text(outcomes),
            Cell::number_opt(s.mean_distance.map(round2)),
        ]);
    }

    let selection_rows = selection_rows(selection);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Events")?;
        write_rows(sheet, &event_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_rows(sheet, &player_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Selection")?;
        write_rows(sheet, &selection_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        events: records.len(),
        players: summaries.len(),
    })
}

fn event_row(record: &MatchRecord, category: Category) -> Vec<Cell> {
    let mut row = vec![
        Cell::text(record.team.as_str()),
        Cell::text(record.player.as_str()),
        Cell::Number(record.from.x),
        Cell::Number(record.from.y),
        Cell::number_opt(record.to.map(|p| p.x)),
        Cell::number_opt(record.to.map(|p| p.y)),
        record
            .outcome(category)
            .map(Cell::text)
            .unwrap_or(Cell::Blank),
    ];
    if category == Category::Pass {
        row.push(Cell::number_opt(record.players_eliminated.map(f64::from)));
        let length = record
            .to
            .map(|to| distance(scale_to_field(record.from), scale_to_field(to)));
        row.push(Cell::number_opt(length.map(round2)));
    }
    row
}

fn selection_rows(selection: &FilterSelection) -> Vec<Vec<Cell>> {
    let (mode, players, goalkeeper) = match &selection.scope {
        PlayerScope::Collective { players } => ("collectif", players.join(", "), ""),
        PlayerScope::Individual {
            player,
            include_goalkeeper,
        } => (
            "individuel",
            player.clone(),
            if *include_goalkeeper { "oui" } else { "non" },
        ),
    };
    vec![
        vec![Cell::text("Team"), Cell::text(selection.team.as_str())],
        vec![Cell::text("Mode"), Cell::text(mode)],
        vec![Cell::text("Players"), Cell::Text(players)],
        vec![Cell::text("Goalkeeper"), Cell::text(goalkeeper)],
        vec![Cell::text("Category"), Cell::text(selection.category.key())],
        vec![Cell::text("Filters"), Cell::Text(selection.filters.join(", "))],
    ]
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match value {
                Cell::Text(text) => worksheet.write_string(r, c, text),
                Cell::Number(n) => worksheet.write_number(r, c, *n),
                Cell::Blank => continue,
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::FieldPoint;

    fn pass(to: Option<FieldPoint>) -> MatchRecord {
        MatchRecord {
            row: 0,
            team: "A".to_string(),
            player: "Lina".to_string(),
            from: FieldPoint { x: 0.0, y: 0.0 },
            to,
            pass_status: Some("succès".to_string()),
            players_eliminated: Some(2),
            shot_status: None,
            attack_type: None,
            defense_type: None,
            goalkeeper_status: None,
        }
    }

    #[test]
    fn pass_rows_keep_numbers_numeric() {
        let row = event_row(&pass(Some(FieldPoint { x: 0.3, y: 0.8 })), Category::Pass);
        assert_eq!(row[2], Cell::Number(0.0));
        assert_eq!(row[4], Cell::Number(0.3));
        assert_eq!(row[6], Cell::text("succès"));
        assert_eq!(row[7], Cell::Number(2.0));
        assert_eq!(row[8], Cell::Number(20.0));
    }

    #[test]
    fn missing_values_are_left_blank() {
        let mut record = pass(None);
        record.players_eliminated = None;
        let row = event_row(&record, Category::Pass);
        assert_eq!(row[4], Cell::Blank);
        assert_eq!(row[7], Cell::Blank);
        assert_eq!(row[8], Cell::Blank);
        assert_eq!(event_row(&record, Category::Shot)[6], Cell::Blank);
    }
}
