use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::pipeline::FieldPoint;
use crate::render::{Figure, PASS_LINE_WIDTH, PASS_MARKER_SIZE, POINT_MARKER_SIZE, PlotPrimitive};

const MARGIN: f64 = 24.0;
const TITLE_HEIGHT: f64 = 28.0;

/// Pixel size of one field unit when no scale is given.
pub const DEFAULT_SCALE: f64 = 20.0;

/// Draws a figure as a standalone SVG document.
///
/// The y axis is flipped so field origin sits bottom-left like on screen.
pub fn figure_to_svg(figure: &Figure, scale: f64) -> String {
    let [x0, x1] = figure.x_range;
    let [y0, y1] = figure.y_range;
    let plot_w = (x1 - x0) * scale;
    let plot_h = (y1 - y0) * scale;
    let width = plot_w + 2.0 * MARGIN;
    let height = plot_h + 2.0 * MARGIN + TITLE_HEIGHT;

    let to_px = |p: FieldPoint| -> (f64, f64) {
        (
            MARGIN + (p.x - x0) * scale,
            TITLE_HEIGHT + MARGIN + (y1 - p.y) * scale,
        )
    };

    let mut body = String::new();

    if let Some(bg) = &figure.background {
        let (ix, iy) = to_px(FieldPoint { x: bg.x, y: bg.y });
        let _ = writeln!(
            body,
            r#"  <image href="{}" x="{ix:.1}" y="{iy:.1}" width="{:.1}" height="{:.1}" preserveAspectRatio="none" opacity="{}"/>"#,
            escape(&bg.source),
            bg.size_x * scale,
            bg.size_y * scale,
            bg.opacity
        );
    }

    let _ = writeln!(
        body,
        r#"  <rect x="{MARGIN}" y="{:.1}" width="{plot_w:.1}" height="{plot_h:.1}" fill="none" stroke="black" stroke-width="1"/>"#,
        TITLE_HEIGHT + MARGIN
    );

    for primitive in &figure.primitives {
        match primitive {
            PlotPrimitive::Segment(seg) => {
                let (ax, ay) = to_px(seg.from);
                let (bx, by) = to_px(seg.to);
                let color = seg.color.css();
                let _ = writeln!(
                    body,
                    r#"  <g><title>{}</title><line x1="{ax:.1}" y1="{ay:.1}" x2="{bx:.1}" y2="{by:.1}" stroke="{color}" stroke-width="{PASS_LINE_WIDTH}" marker-end="url(#arrow-{color})"/><circle cx="{ax:.1}" cy="{ay:.1}" r="{:.1}" fill="{color}"/></g>"#,
                    escape(&seg.hover_text()),
                    PASS_MARKER_SIZE / 2.0
                );
            }
            PlotPrimitive::Point(pt) => {
                let (cx, cy) = to_px(pt.position);
                let _ = writeln!(
                    body,
                    r#"  <circle cx="{cx:.1}" cy="{cy:.1}" r="{:.1}" fill="{}"><title>{}</title></circle>"#,
                    POINT_MARKER_SIZE / 2.0,
                    pt.color.css(),
                    escape(&pt.label)
                );
            }
        }
    }

    let mut defs = String::new();
    let mut colors = figure
        .annotations
        .iter()
        .map(|a| a.color.css())
        .collect::<Vec<_>>();
    colors.sort_unstable();
    colors.dedup();
    for color in colors {
        let _ = writeln!(
            defs,
            r#"    <marker id="arrow-{color}" viewBox="0 0 10 10" refX="9" refY="5" markerWidth="6" markerHeight="6" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{color}" opacity="0.7"/></marker>"#
        );
    }

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.1} {height:.1}" style="background:white">
  <defs>
{defs}  </defs>
  <text x="{MARGIN}" y="{:.1}" font-family="sans-serif" font-size="16">{}</text>
{body}</svg>
"##,
        TITLE_HEIGHT - 8.0,
        escape(&figure.title)
    )
}

pub fn write_svg(path: &Path, figure: &Figure, scale: f64) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(path, figure_to_svg(figure, scale))
        .with_context(|| format!("failed writing svg to {}", path.display()))
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_figure;
    use crate::vocabulary::Category;

    #[test]
    fn empty_figure_has_background_and_outline() {
        let figure = render_figure(&[], Category::Shot, "field.jpg");
        let svg = figure_to_svg(&figure, DEFAULT_SCALE);
        assert!(svg.contains(r#"href="field.jpg""#));
        assert!(svg.contains("Analyse Tir"));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn escapes_markup_in_labels() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }
}
