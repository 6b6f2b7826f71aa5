use std::collections::BTreeMap;

use serde::Serialize;

use crate::pipeline::MatchRecord;
use crate::render::{FIELD_LENGTH, distance, scale_to_field};
use crate::vocabulary::Category;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub player: String,
    pub events: usize,
    /// Outcome value -> count, `"-"` for rows with no value.
    pub outcomes: BTreeMap<String, usize>,
    /// Mean pass length in field units, passes only.
    pub mean_distance: Option<f64>,
}

#[derive(Default)]
struct Tally {
    events: usize,
    outcomes: BTreeMap<String, usize>,
    total_distance: f64,
    measured_passes: usize,
}

/// Per-player breakdown of the filtered events, busiest player first.
pub fn summarize_by_player(records: &[MatchRecord], category: Category) -> Vec<PlayerSummary> {
    let mut by_player: BTreeMap<&str, Tally> = BTreeMap::new();

    for record in records {
        let tally = by_player.entry(record.player.as_str()).or_default();
        tally.events += 1;
        let outcome = record.outcome(category).unwrap_or("-").to_string();
        *tally.outcomes.entry(outcome).or_insert(0) += 1;
        if category == Category::Pass
            && let Some(to) = record.to
        {
            tally.total_distance += distance(scale_to_field(record.from), scale_to_field(to));
            tally.measured_passes += 1;
        }
    }

    let mut out = by_player
        .into_iter()
        .map(|(player, tally)| PlayerSummary {
            player: player.to_string(),
            events: tally.events,
            mean_distance: (tally.measured_passes > 0)
                .then(|| tally.total_distance / tally.measured_passes as f64),
            outcomes: tally.outcomes,
        })
        .collect::<Vec<_>>();
    out.sort_by(|a, b| b.events.cmp(&a.events).then(a.player.cmp(&b.player)));
    out
}

/// Share of events whose origin lies in each third of the field length.
pub fn thirds_share(records: &[MatchRecord]) -> [f64; 3] {
    if records.is_empty() {
        return [0.0; 3];
    }
    let mut counts = [0usize; 3];
    for record in records {
        let x = scale_to_field(record.from).x.clamp(0.0, FIELD_LENGTH);
        let idx = ((x / FIELD_LENGTH) * 3.0).floor().min(2.0) as usize;
        counts[idx] += 1;
    }
    let total = records.len() as f64;
    counts.map(|c| c as f64 / total)
}
