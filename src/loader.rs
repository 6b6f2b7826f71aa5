use std::borrow::Cow;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use serde::Serialize;

use crate::error::{AnalysisError, Result};

pub const COL_TEAM: &str = "equipe";
pub const COL_PLAYER: &str = "joueur";
pub const COL_X_FROM: &str = "FieldXfrom";
pub const COL_Y_FROM: &str = "FieldYfrom";
pub const COL_X_TO: &str = "FieldXto";
pub const COL_Y_TO: &str = "FieldYto";
pub const COL_PASS_STATUS: &str = "statut_passe";
pub const COL_PLAYERS_ELIMINATED: &str = "nb_joueurs_elimines";
pub const COL_SHOT_STATUS: &str = "statut_tir";
pub const COL_ATTACK_TYPE: &str = "type_attaque";
pub const COL_DEFENSE_TYPE: &str = "type_defense";
pub const COL_GOALKEEPER_STATUS: &str = "statut_gardien";

/// Every column the pipeline knows how to consume, in export order.
pub const MATCH_COLUMNS: [&str; 12] = [
    COL_TEAM,
    COL_PLAYER,
    COL_X_FROM,
    COL_Y_FROM,
    COL_X_TO,
    COL_Y_TO,
    COL_PASS_STATUS,
    COL_PLAYERS_ELIMINATED,
    COL_SHOT_STATUS,
    COL_ATTACK_TYPE,
    COL_DEFENSE_TYPE,
    COL_GOALKEEPER_STATUS,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(n) => n.is_nan(),
            CellValue::Bool(_) => false,
        }
    }

    /// Cell as the string the analyst sees; integral numbers drop the `.0`.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            CellValue::Number(n) if n.is_nan() => None,
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(Cow::Owned(format!("{}", *n as i64)))
            }
            CellValue::Number(n) => Some(Cow::Owned(n.to_string())),
            CellValue::Bool(b) => Some(Cow::Owned(b.to_string())),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if !n.is_nan() => Some(*n),
            CellValue::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn display(&self) -> String {
        self.as_text().map(|s| s.into_owned()).unwrap_or_default()
    }
}

impl From<&Data> for CellValue {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// One match worksheet, header names kept exactly as written in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchTable {
    pub source: Option<PathBuf>,
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl MatchTable {
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            source: None,
            columns,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| AnalysisError::missing_column(name))
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn text(&self, row: usize, col: usize) -> Option<Cow<'_, str>> {
        self.cell(row, col).as_text()
    }
}

/// Reads a match workbook from disk.
///
/// There is no cache: every call re-opens the file so edits made between two
/// requests are picked up. `sheet` selects a worksheet by name, otherwise the
/// first one is used.
pub fn load_match(path: &Path, sheet: Option<&str>) -> Result<MatchTable> {
    let mut workbook = open_workbook_auto(path).map_err(|source| AnalysisError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let sheet_name = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(AnalysisError::MissingSheet {
                    path: path.to_path_buf(),
                    sheet: name.to_string(),
                });
            }
            name.to_string()
        }
        None => match workbook.sheet_names().first() {
            Some(first) => first.clone(),
            None => {
                return Ok(MatchTable {
                    source: Some(path.to_path_buf()),
                    ..MatchTable::default()
                });
            }
        },
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|source| AnalysisError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows_iter = range.rows();
    let columns = rows_iter
        .next()
        .map(|header| {
            header
                .iter()
                .map(|cell| CellValue::from(cell).display())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let rows = rows_iter
        .map(|row| row.iter().map(CellValue::from).collect::<Vec<_>>())
        .filter(|row: &Vec<CellValue>| row.iter().any(|cell| !cell.is_empty()))
        .collect::<Vec<_>>();

    Ok(MatchTable {
        source: Some(path.to_path_buf()),
        columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(CellValue::Number(2.0).display(), "2");
        assert_eq!(CellValue::Number(0.25).display(), "0.25");
    }

    #[test]
    fn text_coordinates_parse_with_comma_decimal() {
        assert_eq!(CellValue::Text(" 0,5 ".to_string()).as_f64(), Some(0.5));
        assert_eq!(CellValue::Text("n/a".to_string()).as_f64(), None);
    }

    #[test]
    fn out_of_range_cell_is_empty() {
        let table = MatchTable::from_rows(vec!["equipe".to_string()], vec![vec![]]);
        assert!(table.cell(0, 0).is_empty());
        assert!(table.cell(4, 9).is_empty());
    }
}
