use serde::Serialize;

use crate::pipeline::{FieldPoint, MatchRecord};
use crate::vocabulary::Category;

pub const FIELD_LENGTH: f64 = 40.0;
pub const FIELD_WIDTH: f64 = 20.0;
pub const BACKGROUND_OPACITY: f64 = 0.5;
pub const DEFAULT_FIELD_IMAGE: &str = "Fond terrain NMF/BLEU BLANC OR VERTICAL.jpg";

pub const PASS_LINE_WIDTH: f64 = 2.0;
pub const PASS_MARKER_SIZE: f64 = 6.0;
pub const POINT_MARKER_SIZE: f64 = 10.0;
pub const ARROW_OPACITY: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotColor {
    Blue,
    Red,
    Orange,
    Green,
    Purple,
}

impl PlotColor {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Pass => PlotColor::Blue,
            Category::Shot => PlotColor::Red,
            Category::Attack => PlotColor::Orange,
            Category::Defense => PlotColor::Green,
            Category::Goalkeeper => PlotColor::Purple,
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            PlotColor::Blue => "blue",
            PlotColor::Red => "red",
            PlotColor::Orange => "orange",
            PlotColor::Green => "green",
            PlotColor::Purple => "purple",
        }
    }
}

/// Field picture stretched over the whole plot, anchored at the top-left.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundImage {
    pub source: String,
    pub x: f64,
    pub y: f64,
    pub size_x: f64,
    pub size_y: f64,
    pub opacity: f64,
    pub sizing: &'static str,
    pub layer: &'static str,
}

impl BackgroundImage {
    pub fn field(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            x: 0.0,
            y: FIELD_WIDTH,
            size_x: FIELD_LENGTH,
            size_y: FIELD_WIDTH,
            opacity: BACKGROUND_OPACITY,
            sizing: "stretch",
            layer: "below",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub from: FieldPoint,
    pub to: FieldPoint,
    pub distance: f64,
    pub player: String,
    pub status: String,
    pub color: PlotColor,
}

impl Segment {
    pub fn hover_text(&self) -> String {
        format!(
            "Joueur: {}\nStatut: {}\nDistance: {:.2} m",
            self.player, self.status, self.distance
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub position: FieldPoint,
    pub label: String,
    pub color: PlotColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlotPrimitive {
    Segment(Segment),
    Point(Point),
}

impl PlotPrimitive {
    pub fn hover_text(&self) -> String {
        match self {
            PlotPrimitive::Segment(segment) => segment.hover_text(),
            PlotPrimitive::Point(point) => point.label.clone(),
        }
    }
}

/// Arrow head drawn at `to`, pointing away from `from`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowAnnotation {
    pub from: FieldPoint,
    pub to: FieldPoint,
    pub color: PlotColor,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub category: Option<Category>,
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    /// One x unit is drawn as long as one y unit.
    pub lock_aspect: bool,
    pub background: Option<BackgroundImage>,
    pub primitives: Vec<PlotPrimitive>,
    pub annotations: Vec<ArrowAnnotation>,
}

impl Figure {
    /// Figure shown before a match or team is chosen.
    pub fn blank() -> Self {
        Self {
            title: String::new(),
            category: None,
            x_range: [0.0, FIELD_LENGTH],
            y_range: [0.0, FIELD_WIDTH],
            lock_aspect: false,
            background: None,
            primitives: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.primitives.iter().filter_map(|p| match p {
            PlotPrimitive::Segment(s) => Some(s),
            PlotPrimitive::Point(_) => None,
        })
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.primitives.iter().filter_map(|p| match p {
            PlotPrimitive::Point(pt) => Some(pt),
            PlotPrimitive::Segment(_) => None,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn figure_title(category: Category) -> String {
    format!("Analyse {}", category.label())
}

/// Normalized [0, 1] coordinates to field units.
pub fn scale_to_field(point: FieldPoint) -> FieldPoint {
    FieldPoint {
        x: point.x * FIELD_LENGTH,
        y: point.y * FIELD_WIDTH,
    }
}

pub fn distance(a: FieldPoint, b: FieldPoint) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Builds the field plot for already filtered records.
///
/// Zero records still produce a complete figure holding only the background.
pub fn render_figure(records: &[MatchRecord], category: Category, background: &str) -> Figure {
    let color = PlotColor::for_category(category);
    let mut primitives = Vec::with_capacity(records.len());
    let mut annotations = Vec::new();

    for record in records {
        let from = scale_to_field(record.from);
        match category {
            Category::Pass => {
                let Some(to) = record.to.map(scale_to_field) else {
                    continue;
                };
                primitives.push(PlotPrimitive::Segment(Segment {
                    from,
                    to,
                    distance: distance(from, to),
                    player: record.player.clone(),
                    status: record.pass_status.clone().unwrap_or_default(),
                    color,
                }));
                annotations.push(ArrowAnnotation {
                    from,
                    to,
                    color,
                    opacity: ARROW_OPACITY,
                });
            }
            _ => primitives.push(PlotPrimitive::Point(Point {
                position: from,
                label: format!(
                    "{} - {}",
                    record.player,
                    record.outcome(category).unwrap_or_default()
                ),
                color,
            })),
        }
    }

    Figure {
        title: figure_title(category),
        category: Some(category),
        x_range: [0.0, FIELD_LENGTH],
        y_range: [0.0, FIELD_WIDTH],
        lock_aspect: true,
        background: Some(BackgroundImage::field(background)),
        primitives,
        annotations,
    }
}
