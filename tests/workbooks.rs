use std::fs;
use std::path::Path;

use rust_xlsxwriter::Workbook;

use futsal_terminal::catalog::{list_matches, match_label, teams_for_match};
use futsal_terminal::demo_match::{DemoMatch, demo_file_name, write_demo_match};
use futsal_terminal::error::AnalysisError;
use futsal_terminal::events_export::export_events;
use futsal_terminal::loader::{CellValue, MATCH_COLUMNS, load_match};
use futsal_terminal::pipeline::{FilterSelection, filter_events};
use futsal_terminal::roster::{team_roster, teams_in_table};
use futsal_terminal::vocabulary::Category;

fn write_match(path: &Path, sheet_name: Option<&str>) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    if let Some(name) = sheet_name {
        sheet.set_name(name).expect("sheet name");
    }
    for (col, name) in MATCH_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).expect("header");
    }
    let rows: [(&str, &str, [f64; 4], &str, Option<f64>, &str); 4] = [
        ("TeamA", "Lina", [0.1, 0.2, 0.4, 0.6], "succès", Some(1.0), ""),
        ("TeamA", "Sami", [0.3, 0.5, 0.5, 0.5], "manquée", Some(3.0), ""),
        ("TeamA", "Lina", [0.9, 0.5, 0.9, 0.5], "", None, "but"),
        ("TeamB", "Omar", [0.7, 0.4, 0.7, 0.4], "", None, "cadré"),
    ];
    for (idx, (team, player, coords, pass, elim, shot)) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, *team).expect("team");
        sheet.write_string(row, 1, *player).expect("player");
        for (offset, value) in coords.iter().enumerate() {
            sheet
                .write_number(row, 2 + offset as u16, *value)
                .expect("coord");
        }
        if !pass.is_empty() {
            sheet.write_string(row, 6, *pass).expect("pass");
        }
        if let Some(n) = elim {
            sheet.write_number(row, 7, *n).expect("elim");
        }
        if !shot.is_empty() {
            sheet.write_string(row, 8, *shot).expect("shot");
        }
    }
    workbook.save(path).expect("save workbook");
}

#[test]
fn catalog_lists_xlsx_files_with_labels_and_teams() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_match(&dir.path().join("TeamA_vs_TeamB.xlsx"), None);
    write_match(&dir.path().join("Alpha_vs_Beta_FC.xlsx"), None);
    fs::write(dir.path().join("notes.txt"), "ignore me").expect("notes");

    let matches = list_matches(dir.path());
    let labels = matches.iter().map(|m| m.label.as_str()).collect::<Vec<_>>();
    assert_eq!(labels, vec!["Alpha vs Beta FC", "TeamA vs TeamB"]);
    assert_eq!(matches[1].teams(), vec!["TeamA".to_string(), "TeamB".to_string()]);
    assert_eq!(matches[0].teams(), vec!["Alpha".to_string(), "Beta FC".to_string()]);
}

#[test]
fn catalog_of_missing_or_empty_directory_is_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert!(list_matches(dir.path()).is_empty());
    assert!(list_matches(&dir.path().join("nope")).is_empty());
}

#[test]
fn labels_and_teams_agree() {
    assert_eq!(match_label("NMF_vs_Paris_ACASA.xlsx"), "NMF vs Paris ACASA");
    assert_eq!(
        teams_for_match("NMF vs Paris ACASA"),
        vec!["NMF".to_string(), "Paris ACASA".to_string()]
    );
}

#[test]
fn loader_keeps_raw_headers_and_cell_types() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("TeamA_vs_TeamB.xlsx");
    write_match(&path, None);

    let table = load_match(&path, None).expect("load");
    assert_eq!(table.columns(), MATCH_COLUMNS.map(String::from).as_slice());
    assert_eq!(table.len(), 4);
    assert_eq!(table.cell(0, 2), &CellValue::Number(0.1));
    assert_eq!(table.text(1, 7).as_deref(), Some("3"));
    assert!(table.cell(2, 6).is_empty());
    assert_eq!(table.source.as_deref(), Some(path.as_path()));
    assert_eq!(teams_in_table(&table), vec!["TeamA".to_string(), "TeamB".to_string()]);
}

#[test]
fn loader_selects_named_sheet_and_reports_missing_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("TeamA_vs_TeamB.xlsx");
    write_match(&path, Some("Match"));

    assert_eq!(load_match(&path, Some("Match")).expect("load").len(), 4);
    let err = load_match(&path, Some("Feuil1")).unwrap_err();
    assert!(matches!(err, AnalysisError::MissingSheet { ref sheet, .. } if sheet == "Feuil1"));
}

#[test]
fn loader_reports_unreadable_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.xlsx");
    fs::write(&path, b"not a workbook").expect("write");
    assert!(matches!(
        load_match(&path, None),
        Err(AnalysisError::Workbook { .. })
    ));
}

#[test]
fn loaded_file_flows_through_pipeline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("TeamA_vs_TeamB.xlsx");
    write_match(&path, None);
    let table = load_match(&path, None).expect("load");

    let sel = FilterSelection {
        filters: vec!["but".to_string()],
        ..FilterSelection::team("TeamA", Category::Shot)
    };
    let records = filter_events(&table, &sel).expect("filter");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].player, "Lina");

    assert_eq!(
        team_roster(&table, "TeamA").expect("roster"),
        vec!["Lina".to_string(), "Sami".to_string()]
    );
}

#[test]
fn export_writes_reloadable_events_sheet() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("TeamA_vs_TeamB.xlsx");
    write_match(&source, None);
    let table = load_match(&source, None).expect("load");
    let sel = FilterSelection {
        filters: vec!["succès".to_string(), "manquée".to_string()],
        ..FilterSelection::team("TeamA", Category::Pass)
    };
    let records = filter_events(&table, &sel).expect("filter");

    let out = dir.path().join("export.xlsx");
    let report = export_events(&out, &records, &sel).expect("export");
    assert_eq!(report.events, 2);
    assert_eq!(report.players, 2);

    let reloaded = load_match(&out, Some("Events")).expect("reload");
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.cell(0, 2), &CellValue::Number(0.1));
    assert_eq!(reloaded.cell(1, 7), &CellValue::Number(3.0));
    let again = filter_events(&reloaded, &sel).expect("filter reloaded");
    assert_eq!(again.len(), 2);
    assert_eq!(again[0].players_eliminated, Some(1));
}

#[test]
fn demo_match_is_a_loadable_catalog_entry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(demo_file_name("Home Side", "Away"));
    let demo = DemoMatch {
        home: "Home Side".to_string(),
        away: "Away".to_string(),
        rows: 40,
    };
    let mut rng = rand::thread_rng();
    assert_eq!(write_demo_match(&path, &demo, &mut rng).expect("demo"), 40);

    let matches = list_matches(dir.path());
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].teams(), vec!["Home Side".to_string(), "Away".to_string()]);

    let table = load_match(&path, None).expect("load");
    assert_eq!(table.len(), 40);
    for team in ["Home Side", "Away"] {
        for category in [Category::Pass, Category::Shot, Category::Goalkeeper] {
            filter_events(&table, &FilterSelection::team(team, category)).expect("filter");
        }
    }
}

#[test]
fn every_load_sees_the_current_file_contents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("TeamA_vs_TeamB.xlsx");
    write_match(&path, None);
    let sel = FilterSelection {
        filters: vec!["but".to_string()],
        ..FilterSelection::team("TeamA", Category::Shot)
    };
    let before = load_match(&path, None).expect("load");
    assert_eq!(filter_events(&before, &sel).expect("filter").len(), 1);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in MATCH_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).expect("header");
    }
    for row in 1..=3u32 {
        sheet.write_string(row, 0, "TeamA").expect("team");
        sheet.write_string(row, 1, "Sami").expect("player");
        for col in 2..6u16 {
            sheet.write_number(row, col, 0.8).expect("coord");
        }
        sheet.write_string(row, 8, "but").expect("shot");
    }
    workbook.save(&path).expect("rewrite");

    let after = load_match(&path, None).expect("reload");
    assert_eq!(after.len(), 3);
    let records = filter_events(&after, &sel).expect("filter");
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.player == "Sami"));
}
