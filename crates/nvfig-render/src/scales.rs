// ─────────────────────────────────────────────────────────────────────
// NV Figures — Length-Scale Panels
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Stacked log-axis bar panels comparing physical length scales with the
//! range each NV geometry resolves.

use nvfig_physics::length_scales::{
    decade_ticks, major_ticks, measurable, minor_ticks, phenomena, Fill, ScalePanel, Segment,
    AXIS_RANGE,
};
use nvfig_types::config::FigureStyle;
use nvfig_types::error::{FigureError, FigureResult};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::combinators::LogCoord;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use serde::{Deserialize, Serialize};

use crate::error::DrawResult;
use crate::figure::{anchored, bold, font, Figure};

const LIGHT_GRAY: RGBColor = RGBColor(211, 211, 211);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialScalesConfig {
    pub output: String,
    /// Panels from top to bottom.
    pub panels: Vec<ScalePanel>,
    /// Horizontal distance between hatch lines, in pixels.
    pub hatch_spacing_px: f64,
    pub style: FigureStyle,
}

impl SpatialScalesConfig {
    /// Phenomena above, measurable ranges below.
    pub fn standard(output: &str, style: FigureStyle) -> Self {
        SpatialScalesConfig {
            output: output.to_string(),
            panels: vec![phenomena(), measurable()],
            hatch_spacing_px: 24.0,
            style,
        }
    }
}

/// Diagonal hatch lines filling the box `[u0, u1] × [y0, y1]`.
///
/// Lines rise with `slope` (dy/du) and start every `spacing` along u.
/// Each returned segment is clipped to the box.
pub fn hatch_lines(
    u0: f64,
    u1: f64,
    y0: f64,
    y1: f64,
    slope: f64,
    spacing: f64,
) -> Vec<[(f64, f64); 2]> {
    if !(u1 > u0 && y1 > y0 && slope > 0.0 && spacing > 0.0) {
        return Vec::new();
    }
    let rise = (y1 - y0) / slope;
    let mut lines = Vec::new();
    let mut c = u0 - rise + spacing;
    while c < u1 {
        let start_u = c.max(u0);
        let end_u = (c + rise).min(u1);
        if end_u > start_u {
            lines.push([
                (start_u, y0 + slope * (start_u - c)),
                (end_u, y0 + slope * (end_u - c)),
            ]);
        }
        c += spacing;
    }
    lines
}

/// Where a segment's annotation starts: narrow segments keep it closer.
pub fn annotation_x(segment: &Segment) -> f64 {
    if segment.decades() <= 1.0 + 1e-9 {
        segment.start * 1.2
    } else {
        segment.start * 1.5
    }
}

pub struct SpatialScalesFigure {
    config: SpatialScalesConfig,
}

impl SpatialScalesFigure {
    pub fn new(config: &SpatialScalesConfig) -> FigureResult<Self> {
        if config.panels.is_empty() {
            return Err(FigureError::Config("no length-scale panels".to_string()));
        }
        if !(config.hatch_spacing_px.is_finite() && config.hatch_spacing_px > 0.0) {
            return Err(FigureError::Config(format!(
                "hatch spacing must be > 0 px, got {}",
                config.hatch_spacing_px
            )));
        }
        for panel in &config.panels {
            panel.validate()?;
        }
        Ok(SpatialScalesFigure {
            config: config.clone(),
        })
    }

    fn draw_panel<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        panel: &ScalePanel,
    ) -> DrawResult<()> {
        let style = &self.config.style;
        let (x_min, x_max) = AXIS_RANGE;
        let tick_px = style.font_px(25.0) as i32;
        let bottom = if panel.tick_labels {
            tick_px + style.font_px(48.0) as i32
        } else {
            tick_px + style.font_px(8.0) as i32
        };

        let mut chart = ChartBuilder::on(area)
            .caption(&panel.title, bold(style, 36.0))
            .margin_left(style.font_px(30.0) as u32)
            .margin_right(style.font_px(30.0) as u32)
            .margin_bottom(bottom as u32)
            .build_cartesian_2d((x_min..x_max).log_scale(), 0.0..panel.y_max)?;

        let (pw, ph) = chart.plotting_area().dim_in_pixel();
        let decades = (x_max / x_min).log10();
        let px_per_decade = pw as f64 / decades;
        let px_per_y = ph as f64 / panel.y_max;

        let grid = RGBColor(128, 128, 128).mix(0.4).stroke_width(style.line_px(1.5));
        chart.draw_series(
            major_ticks()
                .into_iter()
                .map(|(x, _)| PathElement::new(vec![(x, 0.0), (x, panel.y_max)], grid)),
        )?;

        let hatch_slope = px_per_decade / px_per_y;
        let hatch_spacing = self.config.hatch_spacing_px / px_per_decade;
        let edge = BLACK.stroke_width(style.line_px(2.0));
        for bar in &panel.bars {
            let (y0, y1) = (bar.y - 0.5 * bar.height, bar.y + 0.5 * bar.height);
            for seg in &bar.segments {
                match seg.fill {
                    Fill::Solid => {
                        chart.draw_series(std::iter::once(Rectangle::new(
                            [(seg.start, y0), (seg.end, y1)],
                            LIGHT_GRAY.filled(),
                        )))?;
                    }
                    Fill::Hatched => {
                        let hatch = BLACK.mix(0.5).stroke_width(style.line_px(1.0));
                        let lines = hatch_lines(
                            seg.start.log10(),
                            seg.end.log10(),
                            y0,
                            y1,
                            hatch_slope,
                            hatch_spacing,
                        );
                        chart.draw_series(lines.into_iter().map(|[a, b]| {
                            PathElement::new(
                                vec![(10f64.powf(a.0), a.1), (10f64.powf(b.0), b.1)],
                                hatch,
                            )
                        }))?;
                    }
                }
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(seg.start, y0), (seg.end, y1)],
                    edge,
                )))?;
                if let Some(text) = &seg.annotation {
                    chart.draw_series(std::iter::once(Text::new(
                        text.clone(),
                        (annotation_x(seg), bar.y - 0.005),
                        anchored(font(style, 24.0), HPos::Left, VPos::Center),
                    )))?;
                }
            }
            chart.draw_series(std::iter::once(Text::new(
                bar.label.clone(),
                (x_max / 1.3, bar.y - 0.005),
                anchored(font(style, 28.0), HPos::Right, VPos::Center),
            )))?;
        }

        // Axis line and outward ticks.
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x_min, 0.0), (x_max, 0.0)],
            BLACK.stroke_width(style.line_px(3.0)),
        )))?;
        let thin = BLACK.stroke_width(style.line_px(1.5));
        let thick = BLACK.stroke_width(style.line_px(3.0));
        let ticks = major_ticks()
            .into_iter()
            .map(|(x, _)| (x, tick_px, thick))
            .chain(
                decade_ticks()
                    .into_iter()
                    .map(|x| (x, (0.02 * ph as f64).round() as i32, thin)),
            )
            .chain(
                minor_ticks()
                    .into_iter()
                    .map(|x| (x, (0.035 * ph as f64).round() as i32, thin)),
            );
        chart.draw_series(ticks.map(|(x, len, stroke)| {
            EmptyElement::at((x, 0.0)) + PathElement::new(vec![(0, 0), (0, len)], stroke)
        }))?;

        if panel.tick_labels {
            let label_font = anchored(bold(style, 32.0), HPos::Center, VPos::Top);
            let offset = tick_px + style.font_px(15.0) as i32;
            chart.draw_series(major_ticks().into_iter().map(|(x, label)| {
                EmptyElement::at((x, 0.0)) + Text::new(label, (0, offset), label_font.clone())
            }))?;
        }

        if panel.legend {
            self.draw_legend(&mut chart, panel)?;
        }
        Ok(())
    }

    fn draw_legend<DB: DrawingBackend>(
        &self,
        chart: &mut ChartContext<'_, DB, Cartesian2d<LogCoord<f64>, RangedCoordf64>>,
        panel: &ScalePanel,
    ) -> DrawResult<()> {
        let style = &self.config.style;
        let w = style.font_px(36.0) as i32;
        let h = style.font_px(14.0) as i32;
        let gap = style.font_px(8.0) as i32;
        let text = anchored(font(style, 18.0), HPos::Left, VPos::Center);
        let entries = [
            (Fill::Hatched, "Z Resolved, XY Averaged"),
            (Fill::Solid, "XYZ Resolved"),
        ];
        for (row, (fill, label)) in entries.into_iter().enumerate() {
            let top = gap + row as i32 * (h + gap);
            let anchor = EmptyElement::at((AXIS_RANGE.0, panel.y_max));
            let patch = match fill {
                Fill::Solid => LIGHT_GRAY.filled(),
                Fill::Hatched => WHITE.filled(),
            };
            let corners = [(gap, top), (gap + w, top + h)];
            chart.draw_series(std::iter::once(anchor + Rectangle::new(corners, patch)))?;
            if fill == Fill::Hatched {
                let lines = hatch_lines(0.0, w as f64, 0.0, h as f64, 1.0, h as f64 / 2.0);
                let stroke = BLACK.mix(0.5).stroke_width(1);
                chart.draw_series(lines.into_iter().map(|[a, b]| {
                    // Pixel y grows downwards; flip so the hatch rises left to right.
                    EmptyElement::at((AXIS_RANGE.0, panel.y_max))
                        + PathElement::new(
                            vec![
                                (gap + a.0 as i32, top + h - a.1 as i32),
                                (gap + b.0 as i32, top + h - b.1 as i32),
                            ],
                            stroke,
                        )
                }))?;
            }
            chart.draw_series(std::iter::once(
                EmptyElement::at((AXIS_RANGE.0, panel.y_max))
                    + Rectangle::new(corners, BLACK.stroke_width(1)),
            ))?;
            chart.draw_series(std::iter::once(
                EmptyElement::at((AXIS_RANGE.0, panel.y_max))
                    + Text::new(label, (2 * gap + w, top + h / 2), text.clone()),
            ))?;
        }
        Ok(())
    }
}

impl Figure for SpatialScalesFigure {
    fn style(&self) -> &FigureStyle {
        &self.config.style
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<()> {
        let n = self.config.panels.len();
        let areas = root.split_evenly((n, 1));
        for (area, panel) in areas.iter().zip(&self.config.panels) {
            self.draw_panel(area, panel)?;
        }

        // Divider between consecutive panels.
        let (w, h) = root.dim_in_pixel();
        let stroke = BLACK.stroke_width(self.config.style.line_px(3.0));
        for k in 1..n {
            let y = (h as usize * k / n) as i32;
            let x0 = (0.05 * w as f64) as i32;
            let x1 = (0.95 * w as f64) as i32;
            root.draw(&PathElement::new(vec![(x0, y), (x1, y)], stroke))?;
        }
        Ok(())
    }
}
