use std::path::PathBuf;

use anyhow::{Context, Result};

use futsal_terminal::demo_match::{self, DemoMatch};

const DEFAULT_ROWS: usize = 160;

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let dir = arg_value(&args, "dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let home = arg_value(&args, "home").unwrap_or_else(|| "NMF".to_string());
    let away = arg_value(&args, "away").unwrap_or_else(|| "Visiteurs".to_string());
    let rows = match arg_value(&args, "rows") {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("invalid --rows '{raw}'"))?,
        None => DEFAULT_ROWS,
    };

    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(demo_match::demo_file_name(&home, &away));
    let demo = DemoMatch { home, away, rows };

    let mut rng = rand::thread_rng();
    let written = demo_match::write_demo_match(&path, &demo, &mut rng)
        .with_context(|| format!("writing {}", path.display()))?;

    println!("Demo match written");
    println!("File: {}", path.display());
    println!("Rows: {written}");
    Ok(())
}

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
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
