// ─────────────────────────────────────────────────────────────────────
// NV Figures — Static Figure Export
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Backend-independent static figures and their PNG/SVG export.

use std::path::Path;

use nvfig_types::config::{FigureStyle, OutputFormat};
use nvfig_types::error::{FigureError, FigureResult};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::ranged1d::Ranged;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use crate::error::DrawResult;
use crate::staging::StagedFile;

/// A figure that can draw itself onto any plotters backend.
pub trait Figure {
    fn style(&self) -> &FigureStyle;

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<()>;
}

/// Write `figure` to `path`; the extension picks PNG or SVG.
///
/// Bitmaps are always painted white. SVG keeps a transparent background
/// when the style asks for one.
pub fn export<F: Figure>(figure: &F, path: impl AsRef<Path>) -> FigureResult<()> {
    let path = path.as_ref();
    let style = figure.style();
    style.validate()?;
    let size = style.pixel_size();
    let staged = StagedFile::new(path)?;

    match OutputFormat::from_path(path)? {
        OutputFormat::Png => {
            let root = BitMapBackend::new(staged.partial_path(), size).into_drawing_area();
            render(figure, &root, true)?;
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(staged.partial_path(), size).into_drawing_area();
            render(figure, &root, !style.transparent)?;
        }
        OutputFormat::Gif => {
            return Err(FigureError::Config(format!(
                "{} is a static figure; write it as .png or .svg",
                path.display()
            )));
        }
    }
    staged.commit()?;
    info!(path = %path.display(), width = size.0, height = size.1, "Figure written");
    Ok(())
}

fn render<F: Figure, DB: DrawingBackend>(
    figure: &F,
    root: &DrawingArea<DB, Shift>,
    paint_background: bool,
) -> DrawResult<()> {
    if paint_background {
        root.fill(&WHITE)?;
    }
    figure.draw(root)?;
    root.present()?;
    Ok(())
}

pub(crate) fn ensure_parent_dir(path: &Path) -> FigureResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Black sans-serif text, sized in points at this style's DPI.
pub(crate) fn font(style: &FigureStyle, points: f64) -> TextStyle<'static> {
    ("sans-serif", style.font_px(points)).into_font().color(&BLACK)
}

/// Bold variant of [`font`].
pub(crate) fn bold(style: &FigureStyle, points: f64) -> TextStyle<'static> {
    ("sans-serif", style.font_px(points), FontStyle::Bold)
        .into_font()
        .color(&BLACK)
}

pub(crate) fn anchored<'a>(text: TextStyle<'a>, h: HPos, v: VPos) -> TextStyle<'a> {
    text.pos(Pos::new(h, v))
}

/// Direction an arrow head points on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Triangle offsets in pixels relative to the arrow tip.
pub fn head_offsets(direction: HeadDirection, size: i32) -> Vec<(i32, i32)> {
    let half = size / 2;
    match direction {
        HeadDirection::Up => vec![(0, 0), (-half, size), (half, size)],
        HeadDirection::Down => vec![(0, 0), (-half, -size), (half, -size)],
        HeadDirection::Left => vec![(0, 0), (size, -half), (size, half)],
        HeadDirection::Right => vec![(0, 0), (-size, -half), (-size, half)],
    }
}

/// Double-headed arrow between two data points, drawn on a 2D chart.
pub(crate) fn double_arrow<DB, X, Y>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<X, Y>>,
    from: (f64, f64),
    to: (f64, f64),
    color: RGBColor,
    width: u32,
    head_px: i32,
) -> DrawResult<()>
where
    DB: DrawingBackend,
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    chart.draw_series(std::iter::once(PathElement::new(
        vec![from, to],
        color.stroke_width(width),
    )))?;
    let vertical = (to.0 - from.0).abs() < (to.1 - from.1).abs();
    let (head_from, head_to) = if vertical {
        if to.1 > from.1 {
            (HeadDirection::Down, HeadDirection::Up)
        } else {
            (HeadDirection::Up, HeadDirection::Down)
        }
    } else if to.0 > from.0 {
        (HeadDirection::Left, HeadDirection::Right)
    } else {
        (HeadDirection::Right, HeadDirection::Left)
    };
    for (tip, dir) in [(from, head_from), (to, head_to)] {
        chart.draw_series(std::iter::once(
            EmptyElement::at(tip) + Polygon::new(head_offsets(dir, head_px), color.filled()),
        ))?;
    }
    Ok(())
}

/// Evenly dashed horizontal line from `x0` to `x1` at `y`.
pub fn dash_segments(x0: f64, x1: f64, y: f64, dashes: usize) -> Vec<[(f64, f64); 2]> {
    let dashes = dashes.max(1);
    let step = (x1 - x0) / (2 * dashes - 1) as f64;
    (0..dashes)
        .map(|k| {
            let a = x0 + 2.0 * k as f64 * step;
            [(a, y), (a + step, y)]
        })
        .collect()
}
