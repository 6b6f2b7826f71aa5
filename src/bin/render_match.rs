use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use futsal_terminal::catalog;
use futsal_terminal::config::AppConfig;
use futsal_terminal::events_export;
use futsal_terminal::loader;
use futsal_terminal::pipeline::{self, FilterSelection, PlayerScope};
use futsal_terminal::render;
use futsal_terminal::summary;
use futsal_terminal::svg_export;
use futsal_terminal::vocabulary::Category;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    let mut config = AppConfig::from_env();
    if let Some(dir) = arg_value(&args, "dir") {
        config.match_dir = PathBuf::from(dir);
    }
    if let Some(sheet) = arg_value(&args, "sheet") {
        config.sheet = Some(sheet);
    }

    let matches = catalog::list_matches(&config.match_dir);
    if matches.is_empty() {
        return Err(anyhow!(
            "no match files in {}",
            config.match_dir.display()
        ));
    }

    let Some(wanted) = arg_value(&args, "match") else {
        println!("Matches in {}:", config.match_dir.display());
        for entry in &matches {
            println!("  {}  [{}]", entry.label, entry.teams().join(" / "));
        }
        println!("Pass --match <file or label> to render one.");
        return Ok(());
    };
    let entry = matches
        .iter()
        .find(|m| {
            m.label == wanted
                || m.file
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy() == wanted)
        })
        .with_context(|| format!("match '{wanted}' not found"))?;

    let team = match arg_value(&args, "team") {
        Some(team) => team,
        None => entry
            .teams()
            .into_iter()
            .next()
            .context("match file name has no team")?,
    };

    let category = match arg_value(&args, "category") {
        Some(key) => {
            Category::from_key(&key).with_context(|| format!("unknown category '{key}'"))?
        }
        None => Category::Pass,
    };

    let scope = match arg_value(&args, "player") {
        Some(player) => PlayerScope::Individual {
            player,
            include_goalkeeper: has_flag(&args, "goalkeeper"),
        },
        None => PlayerScope::Collective {
            players: arg_list(&args, "players"),
        },
    };

    let selection = FilterSelection {
        team,
        scope,
        category,
        filters: arg_list(&args, "filters"),
    };

    let table = loader::load_match(&entry.file, config.sheet.as_deref())
        .with_context(|| format!("loading {}", entry.file.display()))?;
    let records = pipeline::filter_events(&table, &selection)?;
    let figure = render::render_figure(&records, category, &config.field_image);

    println!("{} | {} | {}", entry.label, selection.team, figure.title);
    println!("Events: {}", records.len());
    for s in summary::summarize_by_player(&records, category) {
        let outcomes = s
            .outcomes
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        match s.mean_distance {
            Some(d) => println!("  {:<16} {:>3}  avg {d:.2} m  {outcomes}", s.player, s.events),
            None => println!("  {:<16} {:>3}  {outcomes}", s.player, s.events),
        }
    }

    if let Some(path) = arg_value(&args, "json") {
        std::fs::write(&path, figure.to_json()?)
            .with_context(|| format!("writing {path}"))?;
        println!("Figure JSON: {path}");
    }
    if let Some(path) = arg_value(&args, "svg") {
        svg_export::write_svg(Path::new(&path), &figure, svg_export::DEFAULT_SCALE)?;
        println!("Figure SVG: {path}");
    }
    if let Some(path) = arg_value(&args, "xlsx") {
        let report = events_export::export_events(Path::new(&path), &records, &selection)?;
        println!(
            "Events workbook: {path} ({} events, {} players)",
            report.events, report.players
        );
    }

    Ok(())
}

/// `--name=value` or `--name value`.
fn arg_value(args: &[String], name: &str) -> Option<String> {
    let flag = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

fn arg_list(args: &[String], name: &str) -> Vec<String> {
    arg_value(args, name)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn has_flag(args: &[String], name: &str) -> bool {
    let flag = format!("--{name}");
    args.iter().any(|a| *a == flag)
}
