use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::loader::MATCH_COLUMNS;
use crate::pipeline::GOALKEEPER_MARKER;
use crate::vocabulary::{CATEGORIES, Category, PASS_STATUSES, filter_values};

const OUTFIELD_NAMES: &[&str] = &[
    "Adam", "Bilal", "Hugo", "Karim", "Lucas", "Mehdi", "Nathan", "Rayan", "Sacha", "Yanis",
];

/// Synthetic match file used to try the dashboard without real data.
pub struct DemoMatch {
    pub home: String,
    pub away: String,
    pub rows: usize,
}

/// Writes a workbook with the full match column schema and random actions.
///
/// Each team gets four outfield players plus the goalkeeper marker.
pub fn write_demo_match<R: Rng>(path: &Path, demo: &DemoMatch, rng: &mut R) -> Result<usize> {
    let mut names = OUTFIELD_NAMES.to_vec();
    names.shuffle(rng);
    let home_players = squad(&names[..4]);
    let away_players = squad(&names[4..8]);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in MATCH_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }

    for idx in 0..demo.rows {
        let row = (idx + 1) as u32;
        let (team, players) = if rng.gen_bool(0.5) {
            (&demo.home, &home_players)
        } else {
            (&demo.away, &away_players)
        };
        let category = pick_category(rng);
        let player = if category == Category::Goalkeeper {
            GOALKEEPER_MARKER.to_string()
        } else {
            players[rng.gen_range(0..players.len())].clone()
        };

        let x_from: f64 = rng.gen_range(0.0..1.0);
        let y_from: f64 = rng.gen_range(0.0..1.0);
        let (x_to, y_to) = if category == Category::Pass {
            (
                (x_from + rng.gen_range(-0.35..0.35)).clamp(0.0, 1.0),
                (y_from + rng.gen_range(-0.35..0.35)).clamp(0.0, 1.0),
            )
        } else {
            (x_from, y_from)
        };

        sheet.write_string(row, 0, team.as_str())?;
        sheet.write_string(row, 1, player.as_str())?;
        sheet.write_number(row, 2, round3(x_from))?;
        sheet.write_number(row, 3, round3(y_from))?;
        sheet.write_number(row, 4, round3(x_to))?;
        sheet.write_number(row, 5, round3(y_to))?;

        match category {
            Category::Pass => {
                let status = PASS_STATUSES[rng.gen_range(0..PASS_STATUSES.len())];
                sheet.write_string(row, 6, status)?;
                sheet.write_number(row, 7, rng.gen_range(0..5) as f64)?;
            }
            other => {
                let col = MATCH_COLUMNS
                    .iter()
                    .position(|c| *c == other.outcome_column())
                    .unwrap_or(MATCH_COLUMNS.len() - 1);
                let values = filter_values(other);
                let value = values[rng.gen_range(0..values.len())];
                sheet.write_string(row, col as u16, value)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(demo.rows)
}

/// `Home_vs_Away.xlsx` style file name for a demo match.
pub fn demo_file_name(home: &str, away: &str) -> String {
    format!("{}_vs_{}.xlsx", home.replace(' ', "_"), away.replace(' ', "_"))
}

fn squad(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn pick_category<R: Rng>(rng: &mut R) -> Category {
    // Passes dominate a real futsal log.
    if rng.gen_bool(0.55) {
        Category::Pass
    } else {
        CATEGORIES[rng.gen_range(1..CATEGORIES.len())]
    }
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
