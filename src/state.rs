use std::collections::VecDeque;
use std::path::Path;

use chrono::Local;

use crate::catalog::{self, MatchEntry};
use crate::config::AppConfig;
use crate::error::Result;
use crate::loader;
use crate::pipeline::{self, FilterSelection, MatchRecord, PlayerScope};
use crate::render::{self, Figure};
use crate::roster;
use crate::summary::{self, PlayerSummary};
use crate::vocabulary::{self, Category};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    Collective,
    Individual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Match,
    Team,
    Mode,
    Players,
    Goalkeeper,
    Category,
    Filters,
}

const FOCUS_ORDER: [Focus; 7] = [
    Focus::Match,
    Focus::Team,
    Focus::Mode,
    Focus::Players,
    Focus::Goalkeeper,
    Focus::Category,
    Focus::Filters,
];

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub matches: Vec<MatchEntry>,
    pub match_selected: usize,
    pub teams: Vec<String>,
    pub team_selected: usize,
    pub mode: AnalysisMode,
    pub roster: Vec<String>,
    pub player_cursor: usize,
    /// Collective subset; empty means the whole team.
    pub picked_players: Vec<String>,
    pub include_goalkeeper: bool,
    pub category: Category,
    pub filter_cursor: usize,
    pub filters: Vec<String>,
    pub focus: Focus,
    pub figure: Figure,
    pub records: Vec<MatchRecord>,
    pub summaries: Vec<PlayerSummary>,
    pub last_error: Option<String>,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            matches: Vec::new(),
            match_selected: 0,
            teams: Vec::new(),
            team_selected: 0,
            mode: AnalysisMode::Collective,
            roster: Vec::new(),
            player_cursor: 0,
            picked_players: Vec::new(),
            include_goalkeeper: false,
            category: Category::Pass,
            filter_cursor: 0,
            filters: Vec::new(),
            focus: Focus::Match,
            figure: Figure::blank(),
            records: Vec::new(),
            summaries: Vec::new(),
            last_error: None,
            help_overlay: false,
            logs: VecDeque::with_capacity(MAX_LOGS),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn selected_match(&self) -> Option<&MatchEntry> {
        self.matches.get(self.match_selected)
    }

    pub fn selected_team(&self) -> Option<&str> {
        self.teams.get(self.team_selected).map(String::as_str)
    }

    pub fn individual_player(&self) -> Option<&str> {
        self.roster.get(self.player_cursor).map(String::as_str)
    }

    pub fn filter_options(&self) -> &'static [&'static str] {
        vocabulary::filter_values(self.category)
    }

    /// Rescans the match directory and resets every downstream selection.
    pub fn refresh_catalog(&mut self) {
        let dir = self.config.match_dir.clone();
        self.matches = catalog::list_matches(&dir);
        self.match_selected = 0;
        if self.matches.is_empty() {
            self.push_log(format!("[WARN] No match files in {}", dir.display()));
        } else {
            self.push_log(format!(
                "[INFO] {} match file(s) in {}",
                self.matches.len(),
                dir.display()
            ));
        }
        self.on_match_changed();
    }

    /// The fully resolved selection, or `None` while something is unchosen.
    pub fn selection(&self) -> Option<FilterSelection> {
        self.selected_match()?;
        let team = self.selected_team()?.to_string();
        let scope = match self.mode {
            AnalysisMode::Collective => PlayerScope::Collective {
                players: self.picked_players.clone(),
            },
            AnalysisMode::Individual => PlayerScope::Individual {
                player: self.individual_player()?.to_string(),
                include_goalkeeper: self.include_goalkeeper,
            },
        };
        Some(FilterSelection {
            team,
            scope,
            category: self.category,
            filters: self.filters.clone(),
        })
    }

    /// Reloads the match file and rebuilds the figure for the current selection.
    pub fn refresh_figure(&mut self) {
        let entry = self.selected_match().cloned();
        let (Some(entry), Some(selection)) = (entry, self.selection()) else {
            self.figure = Figure::blank();
            self.records.clear();
            self.summaries.clear();
            return;
        };

        match self.run_analysis(&entry.file, &selection) {
            Ok(records) => {
                self.figure =
                    render::render_figure(&records, selection.category, &self.config.field_image);
                self.summaries = summary::summarize_by_player(&records, selection.category);
                self.records = records;
                self.last_error = None;
            }
            Err(err) => {
                self.push_log(format!("[WARN] {}: {err}", entry.label));
                self.last_error = Some(err.to_string());
                self.figure = Figure::blank();
                self.records.clear();
                self.summaries.clear();
            }
        }
    }

    fn run_analysis(&self, file: &Path, selection: &FilterSelection) -> Result<Vec<MatchRecord>> {
        let table = loader::load_match(file, self.config.sheet.as_deref())?;
        pipeline::filter_events(&table, selection)
    }

    fn on_match_changed(&mut self) {
        self.teams = self
            .selected_match()
            .map(MatchEntry::teams)
            .unwrap_or_default();
        self.team_selected = 0;
        self.on_team_changed();
    }

    fn on_team_changed(&mut self) {
        self.reset_players();
        self.roster.clear();
        let entry = self.selected_match().cloned();
        let team = self.selected_team().map(str::to_string);
        if let (Some(entry), Some(team)) = (entry, team) {
            match loader::load_match(&entry.file, self.config.sheet.as_deref())
                .and_then(|table| {
                    let roster = roster::team_roster(&table, &team)?;
                    Ok((roster, roster::teams_in_table(&table)))
                }) {
                Ok((players, logged_teams)) => {
                    if !logged_teams.is_empty() && !logged_teams.contains(&team) {
                        self.push_log(format!(
                            "[WARN] No rows for '{team}' in {} (file has: {})",
                            entry.label,
                            logged_teams.join(", ")
                        ));
                    }
                    self.roster = players;
                }
                Err(err) => {
                    self.push_log(format!("[WARN] Roster for {team}: {err}"));
                }
            }
        }
        self.refresh_figure();
    }

    fn reset_players(&mut self) {
        self.player_cursor = 0;
        self.picked_players.clear();
        self.include_goalkeeper = false;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.step_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.step_focus(FOCUS_ORDER.len() - 1);
    }

    fn step_focus(&self, step: usize) -> Focus {
        let mut idx = FOCUS_ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
        loop {
            idx = (idx + step) % FOCUS_ORDER.len();
            let focus = FOCUS_ORDER[idx];
            if focus == Focus::Goalkeeper && self.mode == AnalysisMode::Collective {
                continue;
            }
            return focus;
        }
    }

    pub fn cycle_next(&mut self) {
        self.cycle(true);
    }

    pub fn cycle_prev(&mut self) {
        self.cycle(false);
    }

    fn cycle(&mut self, forward: bool) {
        match self.focus {
            Focus::Match => {
                if let Some(idx) = step_index(self.match_selected, self.matches.len(), forward) {
                    self.match_selected = idx;
                    self.on_match_changed();
                }
            }
            Focus::Team => {
                if let Some(idx) = step_index(self.team_selected, self.teams.len(), forward) {
                    self.team_selected = idx;
                    self.on_team_changed();
                }
            }
            Focus::Mode => self.toggle_mode(),
            Focus::Players => {
                if let Some(idx) = step_index(self.player_cursor, self.roster.len(), forward) {
                    self.player_cursor = idx;
                    if self.mode == AnalysisMode::Individual {
                        self.refresh_figure();
                    }
                }
            }
            Focus::Goalkeeper => self.toggle_goalkeeper(),
            Focus::Category => {
                self.category = if forward {
                    self.category.next()
                } else {
                    self.category.prev()
                };
                self.filters.clear();
                self.filter_cursor = 0;
                self.refresh_figure();
            }
            Focus::Filters => {
                let len = self.filter_options().len();
                if let Some(idx) = step_index(self.filter_cursor, len, forward) {
                    self.filter_cursor = idx;
                }
            }
        }
    }

    /// Space bar: toggles the option under the cursor of multi-selects.
    pub fn toggle_current(&mut self) {
        match self.focus {
            Focus::Players if self.mode == AnalysisMode::Collective => {
                let Some(player) = self.roster.get(self.player_cursor).cloned() else {
                    return;
                };
                toggle_value(&mut self.picked_players, player);
                self.refresh_figure();
            }
            Focus::Goalkeeper => self.toggle_goalkeeper(),
            Focus::Mode => self.toggle_mode(),
            Focus::Filters => {
                let Some(value) = self.filter_options().get(self.filter_cursor) else {
                    return;
                };
                toggle_value(&mut self.filters, value.to_string());
                self.refresh_figure();
            }
            _ => self.cycle_next(),
        }
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AnalysisMode::Collective => AnalysisMode::Individual,
            AnalysisMode::Individual => AnalysisMode::Collective,
        };
        self.reset_players();
        self.filters.clear();
        self.filter_cursor = 0;
        self.refresh_figure();
    }

    fn toggle_goalkeeper(&mut self) {
        if self.mode != AnalysisMode::Individual {
            return;
        }
        self.include_goalkeeper = !self.include_goalkeeper;
        self.refresh_figure();
    }
}

fn step_index(current: usize, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    })
}

fn toggle_value(values: &mut Vec<String>, value: String) {
    if let Some(pos) = values.iter().position(|v| *v == value) {
        values.remove(pos);
    } else {
        values.push(value);
    }
}

pub fn mode_label(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Collective => "Collective",
        AnalysisMode::Individual => "Individual",
    }
}

pub fn focus_label(focus: Focus) -> &'static str {
    match focus {
        Focus::Match => "Match",
        Focus::Team => "Team",
        Focus::Mode => "Mode",
        Focus::Players => "Players",
        Focus::Goalkeeper => "Goalkeeper",
        Focus::Category => "Category",
        Focus::Filters => "Filters",
    }
}
