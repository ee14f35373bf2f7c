// ─────────────────────────────────────────────────────────────────────
// NV Figures — Filter Function Heatmap
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Filled-band heatmap of F(q, d) on log-log axes with the traced ridge.

use ndarray::Array2;
use nvfig_physics::kernel::{filter_field, KernelDomain, Ridge};
use nvfig_types::config::{Colormap, FigureStyle};
use nvfig_types::error::{FigureError, FigureResult};
use nvfig_types::state::Mesh2D;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::colormap;
use crate::error::DrawResult;
use crate::figure::{font, Figure};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterFunctionConfig {
    pub output: String,
    pub domain: KernelDomain,
    /// Number of filled bands.
    pub levels: usize,
    /// Iso-lines drawn over the bands.
    #[serde(default = "default_contour_lines")]
    pub contour_lines: usize,
    pub style: FigureStyle,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub colorbar_label: String,
}

fn default_contour_lines() -> usize {
    10
}

/// One rectangle of the band image, in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandCell {
    pub x: (f64, f64),
    pub y: (f64, f64),
    /// Band centre in [0, 1].
    pub band: f64,
}

/// Quantise a field into `levels` equal bands between its finite min and max.
pub fn band_cells(mesh: &Mesh2D, field: &Array2<f64>, levels: usize) -> Vec<BandCell> {
    let (lo, hi) = finite_range(field);
    let span = hi - lo;
    let (ny, nx) = field.dim();
    let mut cells = Vec::with_capacity(nx.saturating_sub(1) * ny.saturating_sub(1));
    for iy in 0..ny.saturating_sub(1) {
        for ix in 0..nx.saturating_sub(1) {
            let mean = 0.25
                * (field[[iy, ix]]
                    + field[[iy, ix + 1]]
                    + field[[iy + 1, ix]]
                    + field[[iy + 1, ix + 1]]);
            if !mean.is_finite() {
                continue;
            }
            let t = if span > 0.0 { (mean - lo) / span } else { 0.5 };
            cells.push(BandCell {
                x: (mesh.x[ix], mesh.x[ix + 1]),
                y: (mesh.y[iy], mesh.y[iy + 1]),
                band: colormap::band(t, levels),
            });
        }
    }
    cells
}

fn finite_range(field: &Array2<f64>) -> (f64, f64) {
    field
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// `n` evenly spaced levels strictly between `lo` and `hi`.
pub fn contour_levels(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    if !(lo.is_finite() && hi.is_finite() && hi > lo) {
        return Vec::new();
    }
    (1..=n)
        .map(|k| lo + (hi - lo) * k as f64 / (n + 1) as f64)
        .collect()
}

/// Marching-squares segments of the iso-line `field == level`.
///
/// Crossings are linearly interpolated along cell edges. Saddle cells are
/// resolved with the cell-mean value. Cells with a non-finite corner are
/// skipped.
pub fn contour_segments(mesh: &Mesh2D, field: &Array2<f64>, level: f64) -> Vec<[(f64, f64); 2]> {
    let (ny, nx) = field.dim();
    let mut segments = Vec::new();
    for iy in 0..ny.saturating_sub(1) {
        for ix in 0..nx.saturating_sub(1) {
            // Counter-clockwise from the lower-left corner.
            let corners = [
                (mesh.x[ix], mesh.y[iy], field[[iy, ix]]),
                (mesh.x[ix + 1], mesh.y[iy], field[[iy, ix + 1]]),
                (mesh.x[ix + 1], mesh.y[iy + 1], field[[iy + 1, ix + 1]]),
                (mesh.x[ix], mesh.y[iy + 1], field[[iy + 1, ix]]),
            ];
            if corners.iter().any(|c| !c.2.is_finite()) {
                continue;
            }
            // Edge k joins corner k and corner k + 1.
            let crossing = |k: usize| {
                let (a, b) = (corners[k], corners[(k + 1) % 4]);
                if (a.2 >= level) == (b.2 >= level) {
                    return None;
                }
                let t = (level - a.2) / (b.2 - a.2);
                Some((a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1)))
            };
            let edges: Vec<(usize, (f64, f64))> =
                (0..4).filter_map(|k| crossing(k).map(|p| (k, p))).collect();
            match edges.as_slice() {
                [(_, p), (_, q)] => segments.push([*p, *q]),
                [e0, e1, e2, e3] => {
                    let mean = corners.iter().map(|c| c.2).sum::<f64>() / 4.0;
                    if (corners[0].2 >= level) == (mean >= level) {
                        segments.push([e0.1, e1.1]);
                        segments.push([e2.1, e3.1]);
                    } else {
                        segments.push([e3.1, e0.1]);
                        segments.push([e1.1, e2.1]);
                    }
                }
                _ => {}
            }
        }
    }
    segments
}

pub struct FilterFunctionFigure {
    config: FilterFunctionConfig,
    cells: Vec<BandCell>,
    contours: Vec<[(f64, f64); 2]>,
    ridge: Ridge,
    slope: f64,
}

impl FilterFunctionFigure {
    pub fn new(config: &FilterFunctionConfig) -> FigureResult<Self> {
        let d = &config.domain;
        if !(d.q.0 > 0.0 && d.q.1 > d.q.0 && d.d.0 > 0.0 && d.d.1 > d.d.0) {
            return Err(FigureError::Config(format!(
                "log axes need 0 < q_min < q_max and 0 < d_min < d_max, got q={:?} d={:?}",
                d.q, d.d
            )));
        }
        if d.nq < 2 || d.nd < 2 || config.levels == 0 {
            return Err(FigureError::Config(
                "filter mesh needs >= 2 points per axis and >= 1 level".to_string(),
            ));
        }
        let mesh = d.mesh();
        let field = filter_field(&mesh);
        let ridge = Ridge::trace_domain(d)?;
        let slope = ridge.log_log_fit()?.slope;
        info!(slope, "Ridge traced");
        let (lo, hi) = finite_range(&field);
        let contours = contour_levels(lo, hi, config.contour_lines)
            .into_iter()
            .flat_map(|level| contour_segments(&mesh, &field, level))
            .collect();
        Ok(FilterFunctionFigure {
            config: config.clone(),
            cells: band_cells(&mesh, &field, config.levels),
            contours,
            ridge,
            slope,
        })
    }

    /// Log-log slope of d against the ridge q.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn ridge(&self) -> &Ridge {
        &self.ridge
    }

    pub fn contours(&self) -> &[[(f64, f64); 2]] {
        &self.contours
    }

    fn draw_colorbar<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> DrawResult<()> {
        let style = &self.config.style;
        let levels = self.config.levels;
        let mut bar = ChartBuilder::on(area)
            .margin_top(style.font_px(40.0) as u32)
            .margin_bottom(style.font_px(40.0) as u32)
            .margin_right(style.font_px(30.0) as u32)
            .build_cartesian_2d(0.0..1.0, 0.0..1.0)?;
        bar.draw_series((0..levels).map(|k| {
            let y0 = k as f64 / levels as f64;
            let y1 = (k + 1) as f64 / levels as f64;
            let color = colormap::sample(Colormap::Plasma, colormap::band(y0, levels));
            Rectangle::new([(0.0, y0), (1.0, y1)], color.filled())
        }))?;
        bar.draw_series(std::iter::once(Rectangle::new(
            [(0.0, 0.0), (1.0, 1.0)],
            BLACK.stroke_width(1),
        )))?;
        area.draw_text(
            &self.config.colorbar_label,
            &font(style, 22.0),
            (0, style.font_px(10.0) as i32),
        )?;
        Ok(())
    }
}

impl Figure for FilterFunctionFigure {
    fn style(&self) -> &FigureStyle {
        &self.config.style
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<()> {
        let style = &self.config.style;
        let d = &self.config.domain;
        let (width, _) = root.dim_in_pixel();
        let (main, side) = root.split_horizontally((width as f64 * 0.84) as i32);

        let mut chart = ChartBuilder::on(&main)
            .caption(&self.config.title, font(style, 24.0))
            .margin(style.font_px(10.0) as u32)
            .x_label_area_size(style.font_px(36.0) as u32)
            .y_label_area_size(style.font_px(36.0) as u32)
            .build_cartesian_2d((d.q.0..d.q.1).log_scale(), (d.d.0..d.d.1).log_scale())?;

        chart.draw_series(self.cells.iter().map(|c| {
            let color = colormap::sample(Colormap::Plasma, c.band);
            Rectangle::new([(c.x.0, c.y.0), (c.x.1, c.y.1)], color.filled())
        }))?;

        let iso = BLACK.mix(0.3).stroke_width(style.line_px(0.5));
        chart.draw_series(
            self.contours
                .iter()
                .map(|seg| PathElement::new(vec![seg[0], seg[1]], iso)),
        )?;

        chart
            .configure_mesh()
            .x_desc(&self.config.x_label)
            .y_desc(&self.config.y_label)
            .axis_desc_style(font(style, 20.0))
            .x_label_formatter(&|_| String::new())
            .y_label_formatter(&|_| String::new())
            .light_line_style(BLACK.mix(0.08))
            .bold_line_style(BLACK.mix(0.3))
            .draw()?;

        let line = RED.stroke_width(style.line_px(2.5));
        chart
            .draw_series(LineSeries::new(self.ridge.points(), line))?
            .label(format!("Maximum (Slope = {:.2})", self.slope))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], line));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(font(style, 14.0))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        self.draw_colorbar(&side)
    }
}
