use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

use futsal_terminal::loader::{CellValue, MATCH_COLUMNS, MatchTable};
use futsal_terminal::pipeline::{FilterSelection, PlayerScope, filter_events};
use futsal_terminal::render::render_figure;
use futsal_terminal::summary::summarize_by_player;
use futsal_terminal::vocabulary::{Category, PASS_STATUSES};

const PLAYERS: &[&str] = &["Lina", "Sami", "Omar", "Yanis", "gardien"];

fn synthetic_table(rows: usize) -> MatchTable {
    let mut rng = StdRng::seed_from_u64(7);
    let data = (0..rows)
        .map(|_| {
            let team = if rng.gen_bool(0.5) { "A" } else { "B" };
            let player = PLAYERS[rng.gen_range(0..PLAYERS.len())];
            let mut row = vec![CellValue::Empty; MATCH_COLUMNS.len()];
            row[0] = CellValue::Text(team.to_string());
            row[1] = CellValue::Text(player.to_string());
            for cell in &mut row[2..6] {
                *cell = CellValue::Number(rng.gen_range(0.0..1.0));
            }
            row[6] = CellValue::Text(
                PASS_STATUSES[rng.gen_range(0..PASS_STATUSES.len())].to_string(),
            );
            row[7] = CellValue::Number(rng.gen_range(0..6) as f64);
            row
        })
        .collect();
    MatchTable::from_rows(MATCH_COLUMNS.iter().map(|c| c.to_string()).collect(), data)
}

fn bench_filter_events(c: &mut Criterion) {
    let table = synthetic_table(5_000);
    let selection = FilterSelection {
        team: "A".to_string(),
        scope: PlayerScope::Individual {
            player: "Lina".to_string(),
            include_goalkeeper: true,
        },
        category: Category::Pass,
        filters: vec!["succès".to_string(), "+2".to_string()],
    };

    c.bench_function("filter_events", |b| {
        b.iter(|| {
            let records = filter_events(black_box(&table), black_box(&selection))
                .expect("valid synthetic table");
            black_box(records.len())
        })
    });
}

fn bench_render_figure(c: &mut Criterion) {
    let table = synthetic_table(5_000);
    let selection = FilterSelection::team("A", Category::Pass);
    let records = filter_events(&table, &selection).expect("valid synthetic table");

    c.bench_function("render_figure", |b| {
        b.iter(|| {
            let figure = render_figure(black_box(&records), Category::Pass, "field.jpg");
            black_box(figure.primitives.len())
        })
    });

    c.bench_function("summarize_by_player", |b| {
        b.iter(|| black_box(summarize_by_player(black_box(&records), Category::Pass).len()))
    });
}

criterion_group!(benches, bench_filter_events, bench_render_figure);
criterion_main!(benches);
