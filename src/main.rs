use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine, Points, Rectangle};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use futsal_terminal::config::AppConfig;
use futsal_terminal::events_export;
use futsal_terminal::render::{FIELD_LENGTH, FIELD_WIDTH, Figure, PlotColor, PlotPrimitive};
use futsal_terminal::state::{AnalysisMode, AppState, Focus, focus_label, mode_label};
use futsal_terminal::summary;
use futsal_terminal::svg_export;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;
const ARROW_HEAD_LEN: f64 = 1.0;

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            KeyCode::Tab | KeyCode::Char('j') | KeyCode::Down => self.state.focus_next(),
            KeyCode::BackTab | KeyCode::Char('k') | KeyCode::Up => self.state.focus_prev(),
            KeyCode::Right | KeyCode::Char('l') => self.state.cycle_next(),
            KeyCode::Left | KeyCode::Char('h') => self.state.cycle_prev(),
            KeyCode::Char(' ') | KeyCode::Enter => self.state.toggle_current(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.state.refresh_catalog(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export_xlsx(),
            KeyCode::Char('g') | KeyCode::Char('G') => self.export_svg(),
            _ => {}
        }
    }

    fn export_path(&mut self, ext: &str) -> Option<PathBuf> {
        let dir = self.state.config.export_dir.clone();
        if let Err(err) = fs::create_dir_all(&dir) {
            self.state
                .push_log(format!("[WARN] Export dir {}: {err}", dir.display()));
            return None;
        }
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let category = self.state.category.key();
        Some(dir.join(format!("futsal_{category}_{stamp}.{ext}")))
    }

    fn export_xlsx(&mut self) {
        let Some(selection) = self.state.selection() else {
            self.state.push_log("[INFO] Nothing selected to export");
            return;
        };
        let Some(path) = self.export_path("xlsx") else {
            return;
        };
        match events_export::export_events(&path, &self.state.records, &selection) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} event(s), {} player(s) to {}",
                report.events,
                report.players,
                path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }

    fn export_svg(&mut self) {
        if self.state.figure.background.is_none() {
            self.state.push_log("[INFO] Nothing selected to draw");
            return;
        }
        let Some(path) = self.export_path("svg") else {
            return;
        };
        match svg_export::write_svg(&path, &self.state.figure, svg_export::DEFAULT_SCALE) {
            Ok(()) => self
                .state
                .push_log(format!("[INFO] Figure written to {}", path.display())),
            Err(err) => self.state.push_log(format!("[WARN] SVG failed: {err:#}")),
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut app = App::new(AppConfig::from_env());
    app.state.refresh_catalog();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(34),
            Constraint::Min(30),
            Constraint::Length(34),
        ])
        .split(chunks[1]);

    let selection = Paragraph::new(selection_text(&app.state))
        .block(Block::default().title("Selection").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(selection, columns[0]);

    render_pitch(frame, columns[1], &app.state.figure);

    let details = Paragraph::new(details_text(&app.state))
        .block(Block::default().title("Events").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(details, columns[2]);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(
        "Tab/j/k Focus | ←/→ Change | Space Toggle | r Rescan | e Export xlsx | g Export svg | ? Help | q Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let match_label = state
        .selected_match()
        .map(|m| m.label.as_str())
        .unwrap_or("no match");
    let team = state.selected_team().unwrap_or("-");
    format!(
        "FUTSAL TERMINAL | {match_label} | {team} | {} | {}",
        mode_label(state.mode),
        state.category.label()
    )
}

fn selection_text(state: &AppState) -> String {
    let mut lines = Vec::new();
    let marker = |focus: Focus| if state.focus == focus { "> " } else { "  " };

    let match_line = match state.selected_match() {
        Some(m) => format!("{} ({}/{})", m.label, state.match_selected + 1, state.matches.len()),
        None => "none".to_string(),
    };
    lines.push(format!("{}{}: {match_line}", marker(Focus::Match), focus_label(Focus::Match)));
    lines.push(format!(
        "{}{}: {}",
        marker(Focus::Team),
        focus_label(Focus::Team),
        state.selected_team().unwrap_or("none")
    ));
    lines.push(format!(
        "{}{}: {}",
        marker(Focus::Mode),
        focus_label(Focus::Mode),
        mode_label(state.mode)
    ));

    match state.mode {
        AnalysisMode::Collective => {
            let picked = if state.picked_players.is_empty() {
                "whole team".to_string()
            } else {
                state.picked_players.join(", ")
            };
            lines.push(format!(
                "{}{}: {picked}",
                marker(Focus::Players),
                focus_label(Focus::Players)
            ));
            for (idx, player) in state.roster.iter().enumerate() {
                let active = state.focus == Focus::Players && idx == state.player_cursor;
                let cursor = cursor_mark(active);
                let check = if state.picked_players.contains(player) { "[x]" } else { "[ ]" };
                lines.push(format!("   {cursor}{check} {player}"));
            }
        }
        AnalysisMode::Individual => {
            lines.push(format!(
                "{}{}: {}",
                marker(Focus::Players),
                focus_label(Focus::Players),
                state.individual_player().unwrap_or("none")
            ));
            lines.push(format!(
                "{}{}: {}",
                marker(Focus::Goalkeeper),
                focus_label(Focus::Goalkeeper),
                if state.include_goalkeeper { "yes" } else { "no" }
            ));
        }
    }

    lines.push(format!(
        "{}{}: {}",
        marker(Focus::Category),
        focus_label(Focus::Category),
        state.category.label()
    ));
    lines.push(format!(
        "{}{}: {}",
        marker(Focus::Filters),
        focus_label(Focus::Filters),
        if state.filters.is_empty() { "all" } else { "custom" }
    ));
    for (idx, value) in state.filter_options().iter().enumerate() {
        let cursor = cursor_mark(state.focus == Focus::Filters && idx == state.filter_cursor);
        let check = if state.filters.iter().any(|f| f == value) { "[x]" } else { "[ ]" };
        lines.push(format!("   {cursor}{check} {value}"));
    }

    lines.join("\n")
}

fn cursor_mark(active: bool) -> &'static str {
    if active { "›" } else { " " }
}

fn details_text(state: &AppState) -> String {
    if let Some(err) = &state.last_error {
        return format!("Render failed:\n{err}");
    }
    if state.figure.background.is_none() {
        return "Pick a match and team".to_string();
    }

    let mut lines = vec![format!("Events: {}", state.records.len())];
    if !state.records.is_empty() {
        let [own, middle, opp] = summary::thirds_share(&state.records);
        lines.push(format!(
            "Thirds: {:.0}% / {:.0}% / {:.0}%",
            own * 100.0,
            middle * 100.0,
            opp * 100.0
        ));
    }
    lines.push(String::new());
    for s in state.summaries.iter().take(8) {
        let mut line = format!("{} x{}", s.player, s.events);
        if let Some(d) = s.mean_distance {
            line.push_str(&format!(" avg {d:.1} m"));
        }
        lines.push(line);
        for (outcome, count) in s.outcomes.iter().take(3) {
            lines.push(format!("  {outcome}: {count}"));
        }
    }
    if !state.figure.primitives.is_empty() {
        lines.push(String::new());
        lines.push("Latest:".to_string());
        for primitive in state.figure.primitives.iter().rev().take(4) {
            lines.push(primitive.hover_text().replace('\n', " | "));
        }
    }
    lines.join("\n")
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_pitch(frame: &mut Frame, area: Rect, figure: &Figure) {
    let title = if figure.title.is_empty() {
        "Pitch".to_string()
    } else {
        figure.title.clone()
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let [x0, x1] = figure.x_range;
    let [y0, y1] = figure.y_range;
    let target = if figure.lock_aspect {
        fit_aspect(inner, (x1 - x0) / (y1 - y0))
    } else {
        inner
    };

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([x0, x1])
        .y_bounds([y0, y1])
        .paint(|ctx| {
            if figure.background.is_some() {
                draw_field(ctx);
                ctx.layer();
            }
            for primitive in &figure.primitives {
                match primitive {
                    PlotPrimitive::Segment(seg) => {
                        let color = term_color(seg.color);
                        ctx.draw(&CanvasLine {
                            x1: seg.from.x,
                            y1: seg.from.y,
                            x2: seg.to.x,
                            y2: seg.to.y,
                            color,
                        });
                        for (hx, hy) in arrow_head((seg.from.x, seg.from.y), (seg.to.x, seg.to.y)) {
                            ctx.draw(&CanvasLine {
                                x1: seg.to.x,
                                y1: seg.to.y,
                                x2: hx,
                                y2: hy,
                                color,
                            });
                        }
                    }
                    PlotPrimitive::Point(pt) => ctx.draw(&Points {
                        coords: &[(pt.position.x, pt.position.y)],
                        color: term_color(pt.color),
                    }),
                }
            }
        });
    frame.render_widget(canvas, target);
}

fn draw_field(ctx: &mut ratatui::widgets::canvas::Context<'_>) {
    let line = Color::DarkGray;
    ctx.draw(&Rectangle {
        x: 0.0,
        y: 0.0,
        width: FIELD_LENGTH,
        height: FIELD_WIDTH,
        color: line,
    });
    ctx.draw(&CanvasLine {
        x1: FIELD_LENGTH / 2.0,
        y1: 0.0,
        x2: FIELD_LENGTH / 2.0,
        y2: FIELD_WIDTH,
        color: line,
    });
    ctx.draw(&Circle {
        x: FIELD_LENGTH / 2.0,
        y: FIELD_WIDTH / 2.0,
        radius: 3.0,
        color: line,
    });
    // Goal areas are 6 m quarter-circles joined at the posts in futsal.
    for x in [0.0, FIELD_LENGTH] {
        ctx.draw(&Circle {
            x,
            y: FIELD_WIDTH / 2.0,
            radius: 6.0,
            color: line,
        });
    }
}

/// Two short strokes at `to`, 25 degrees either side of the reversed direction.
fn arrow_head(from: (f64, f64), to: (f64, f64)) -> [(f64, f64); 2] {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return [to, to];
    }
    let back = dy.atan2(dx) + std::f64::consts::PI;
    let spread = 25f64.to_radians();
    let head = ARROW_HEAD_LEN.min(len / 2.0);
    [back - spread, back + spread].map(|a| (to.0 + head * a.cos(), to.1 + head * a.sin()))
}

fn fit_aspect(area: Rect, ratio: f64) -> Rect {
    let cell_ratio = ratio * CELL_ASPECT;
    let mut width = area.width;
    let mut height = ((width as f64) / cell_ratio).round() as u16;
    if height > area.height {
        height = area.height;
        width = ((height as f64) * cell_ratio).round() as u16;
    }
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width: width.min(area.width),
        height: height.max(1).min(area.height),
    }
}

fn term_color(color: PlotColor) -> Color {
    match color {
        PlotColor::Blue => Color::Blue,
        PlotColor::Red => Color::Red,
        PlotColor::Orange => Color::Rgb(255, 165, 0),
        PlotColor::Green => Color::Green,
        PlotColor::Purple => Color::Magenta,
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Futsal Terminal - Help",
        "",
        "Selection:",
        "  Tab / j / ↓     Next selector",
        "  S-Tab / k / ↑   Previous selector",
        "  ← / →           Change value / move cursor",
        "  Space / Enter   Toggle player or filter",
        "",
        "Files:",
        "  r               Rescan match directory",
        "  e               Export filtered events (xlsx)",
        "  g               Export figure (svg)",
        "",
        "  ?               Toggle help",
        "  q               Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
