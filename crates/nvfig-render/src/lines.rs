// ─────────────────────────────────────────────────────────────────────
// NV Figures — Line Figures
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 2D line figures: averaging time, readout levels, delta function and
//! the T₁ relaxation fit.

use nvfig_math::sweep::linspace;
use nvfig_physics::delta::GaussianDelta;
use nvfig_physics::readout::{AcquisitionPreset, ReadoutLevels};
use nvfig_physics::relaxation::{RelaxationData, RelaxationFit};
use nvfig_types::config::FigureStyle;
use nvfig_types::error::{FigureError, FigureResult};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::DrawResult;
use crate::figure::{anchored, dash_segments, double_arrow, font, Figure};

const TAB_BLUE: RGBColor = RGBColor(31, 119, 180);
const CRIMSON: RGBColor = RGBColor(220, 20, 60);

// ── Total averaging time ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AveragingTimeConfig {
    pub output: String,
    /// Evolution time range in seconds.
    pub evolution_time: (f64, f64),
    pub points: usize,
    pub target_snr: f64,
    pub presets: Vec<AcquisitionPreset>,
    pub style: FigureStyle,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

/// One labelled curve, x in ms and y in minutes.
#[derive(Debug, Clone)]
pub struct LabelledCurve {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

pub struct AveragingTimeFigure {
    config: AveragingTimeConfig,
    curves: Vec<LabelledCurve>,
}

impl AveragingTimeFigure {
    pub fn new(config: &AveragingTimeConfig) -> FigureResult<Self> {
        let (t0, t1) = config.evolution_time;
        if !(t0.is_finite() && t1.is_finite() && t0 >= 0.0 && t1 > t0) || config.points < 2 {
            return Err(FigureError::Config(format!(
                "evolution time needs 0 <= start < end and >= 2 points, got {:?} x {}",
                config.evolution_time, config.points
            )));
        }
        if !(config.target_snr.is_finite() && config.target_snr > 0.0) {
            return Err(FigureError::Config(format!(
                "target SNR must be finite and > 0, got {}",
                config.target_snr
            )));
        }
        if config.presets.is_empty() {
            return Err(FigureError::Config("no acquisition presets".to_string()));
        }
        let times = linspace(t0, t1, config.points);
        let mut curves = Vec::with_capacity(config.presets.len());
        for preset in &config.presets {
            preset.params.validate()?;
            curves.push(LabelledCurve {
                label: preset.label.clone(),
                points: preset.averaging_curve(&times, config.target_snr),
            });
        }
        Ok(AveragingTimeFigure {
            config: config.clone(),
            curves,
        })
    }

    pub fn curves(&self) -> &[LabelledCurve] {
        &self.curves
    }

    /// Largest averaging time over every curve, in minutes.
    pub fn max_minutes(&self) -> f64 {
        self.curves
            .iter()
            .flat_map(|c| c.points.iter().map(|p| p.1))
            .fold(0.0, f64::max)
    }
}

impl Figure for AveragingTimeFigure {
    fn style(&self) -> &FigureStyle {
        &self.config.style
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<()> {
        let style = &self.config.style;
        let x_max = self.config.evolution_time.1 * 1e3;
        let y_max = self.max_minutes() * 1.05;

        let mut chart = ChartBuilder::on(root)
            .caption(&self.config.title, font(style, 16.0))
            .margin(style.font_px(12.0) as u32)
            .x_label_area_size(style.font_px(36.0) as u32)
            .y_label_area_size(style.font_px(48.0) as u32)
            .build_cartesian_2d(self.config.evolution_time.0 * 1e3..x_max, 0.0..y_max)?;

        chart
            .configure_mesh()
            .x_desc(&self.config.x_label)
            .y_desc(&self.config.y_label)
            .axis_desc_style(font(style, 14.0))
            .label_style(font(style, 11.0))
            .light_line_style(TRANSPARENT)
            .bold_line_style(BLACK.mix(0.15))
            .draw()?;

        for (i, curve) in self.curves.iter().enumerate() {
            let line = Palette99::pick(i).stroke_width(style.line_px(1.5));
            chart
                .draw_series(LineSeries::new(curve.points.iter().copied(), line))?
                .label(&curve.label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], line));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(font(style, 11.0))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.3))
            .draw()?;
        Ok(())
    }
}

// ── Readout levels ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadoutLevelsConfig {
    pub output: String,
    pub contrast: f64,
    pub mid: f64,
    /// Horizontal position of the P₁/P₀ arrows in [0, 1].
    pub arrow_x: f64,
    pub y_range: (f64, f64),
    pub style: FigureStyle,
    pub y_label: String,
}

pub struct ReadoutLevelsFigure {
    config: ReadoutLevelsConfig,
    levels: ReadoutLevels,
}

impl ReadoutLevelsFigure {
    pub fn new(config: &ReadoutLevelsConfig) -> FigureResult<Self> {
        let levels = ReadoutLevels::new(config.contrast, config.mid)?;
        let (y0, y1) = config.y_range;
        if !(y0 < levels.dark && y1 > levels.bright) {
            return Err(FigureError::Config(format!(
                "y range {:?} must enclose the levels [{}, {}]",
                config.y_range, levels.dark, levels.bright
            )));
        }
        Ok(ReadoutLevelsFigure {
            config: config.clone(),
            levels,
        })
    }

    pub fn levels(&self) -> &ReadoutLevels {
        &self.levels
    }

    /// `(label, from, to, colour)` for the two population arrows.
    pub fn arrows(&self) -> [(&'static str, (f64, f64), (f64, f64), RGBColor); 2] {
        let x = self.config.arrow_x;
        let l = &self.levels;
        [
            ("P₁", (x, l.bright), (x, l.mid), RED),
            ("P₀", (x, l.mid), (x, l.dark), BLUE),
        ]
    }
}

impl Figure for ReadoutLevelsFigure {
    fn style(&self) -> &FigureStyle {
        &self.config.style
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<()> {
        let style = &self.config.style;
        let (y0, y1) = self.config.y_range;
        let mut chart = ChartBuilder::on(root)
            .margin(style.font_px(6.0) as u32)
            .x_label_area_size(0)
            .y_label_area_size(style.font_px(40.0) as u32)
            .build_cartesian_2d(0.0..1.0, y0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .y_desc(&self.config.y_label)
            .axis_desc_style(font(style, 12.0))
            .label_style(font(style, 10.0))
            .draw()?;

        let l = &self.levels;
        let width = style.line_px(2.0);
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, l.bright), (1.0, l.bright)],
            BLACK.stroke_width(width),
        )))?;
        chart.draw_series(
            dash_segments(0.0, 1.0, l.mid, 12)
                .into_iter()
                .map(|seg| PathElement::new(seg.to_vec(), RGBColor(128, 128, 128).stroke_width(width))),
        )?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, l.dark), (1.0, l.dark)],
            BLACK.stroke_width(width),
        )))?;

        let head = style.font_px(6.0) as i32;
        for (label, from, to, color) in self.arrows() {
            double_arrow(&mut chart, from, to, color, width, head)?;
            let text = anchored(font(style, 14.0).color(&color), HPos::Left, VPos::Center);
            chart.draw_series(std::iter::once(Text::new(
                label,
                (from.0 + 0.02, 0.5 * (from.1 + to.1)),
                text,
            )))?;
        }
        Ok(())
    }
}

// ── Delta function ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaFunctionConfig {
    pub output: String,
    pub delta: GaussianDelta,
    pub x_range: (f64, f64),
    pub points: usize,
    pub y_max: f64,
    pub arrow_label: String,
    pub style: FigureStyle,
    pub x_label: String,
    pub y_label: String,
}

pub struct DeltaFunctionFigure {
    config: DeltaFunctionConfig,
    curve: Vec<(f64, f64)>,
}

impl DeltaFunctionFigure {
    pub fn new(config: &DeltaFunctionConfig) -> FigureResult<Self> {
        let d = &config.delta;
        if !(d.fwhm.is_finite() && d.fwhm > 0.0 && d.center.is_finite()) {
            return Err(FigureError::Config(format!(
                "delta needs a finite centre and FWHM > 0, got {d:?}"
            )));
        }
        let (x0, x1) = config.x_range;
        if !(x1 > x0) || config.points < 2 {
            return Err(FigureError::Config(format!(
                "x range {:?} with {} points is empty",
                config.x_range, config.points
            )));
        }
        let xs = linspace(x0, x1, config.points);
        let ys = d.sample(&xs);
        Ok(DeltaFunctionFigure {
            config: config.clone(),
            curve: xs.into_iter().zip(ys).collect(),
        })
    }

    pub fn curve(&self) -> &[(f64, f64)] {
        &self.curve
    }

    /// Arrow endpoints at half amplitude, slightly inside the crossings.
    pub fn width_arrow(&self) -> ((f64, f64), (f64, f64)) {
        let d = &self.config.delta;
        let half = 0.5 * d.amplitude;
        let reach = d.fwhm / 1.95;
        ((d.center - reach, half), (d.center + reach, half))
    }

    pub fn label_anchor(&self) -> (f64, f64) {
        let d = &self.config.delta;
        (d.center + 1.15 * d.fwhm, 0.5 * d.amplitude - 0.07)
    }
}

impl Figure for DeltaFunctionFigure {
    fn style(&self) -> &FigureStyle {
        &self.config.style
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<()> {
        let style = &self.config.style;
        let (x0, x1) = self.config.x_range;
        let mut chart = ChartBuilder::on(root)
            .margin(style.font_px(12.0) as u32)
            .x_label_area_size(style.font_px(40.0) as u32)
            .y_label_area_size(style.font_px(30.0) as u32)
            .build_cartesian_2d(x0..x1, 0.0..self.config.y_max)?;

        chart
            .configure_mesh()
            .x_desc(&self.config.x_label)
            .y_desc(&self.config.y_label)
            .axis_desc_style(font(style, 16.0))
            .label_style(font(style, 12.0))
            .y_label_formatter(&|_| String::new())
            .light_line_style(TRANSPARENT)
            .bold_line_style(BLACK.mix(0.15))
            .draw()?;

        chart.draw_series(LineSeries::new(
            self.curve.iter().copied(),
            BLUE.stroke_width(style.line_px(2.0)),
        ))?;

        let (from, to) = self.width_arrow();
        double_arrow(
            &mut chart,
            from,
            to,
            BLACK,
            style.line_px(1.5),
            style.font_px(5.0) as i32,
        )?;
        chart.draw_series(std::iter::once(Text::new(
            self.config.arrow_label.clone(),
            self.label_anchor(),
            anchored(font(style, 16.0), HPos::Center, VPos::Center),
        )))?;
        Ok(())
    }
}

// ── T₁ relaxation ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaxationConfig {
    pub output: String,
    /// CSV with columns `time_ms, signal, error`.
    pub data: String,
    #[serde(default)]
    pub show_params: bool,
    pub curve_points: usize,
    pub style: FigureStyle,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

pub struct RelaxationFigure {
    config: RelaxationConfig,
    data: RelaxationData,
    fit: RelaxationFit,
    curve: Vec<(f64, f64)>,
}

impl RelaxationFigure {
    pub fn new(config: &RelaxationConfig) -> FigureResult<Self> {
        let data = RelaxationData::from_csv(&config.data)?;
        Self::from_data(config, data)
    }

    pub fn from_data(config: &RelaxationConfig, data: RelaxationData) -> FigureResult<Self> {
        if config.curve_points < 2 {
            return Err(FigureError::Config(format!(
                "fit curve needs >= 2 points, got {}",
                config.curve_points
            )));
        }
        let fit = data.fit()?;
        info!(
            amplitude = fit.amplitude(),
            tau_us = fit.tau(),
            gamma = fit.gamma(),
            evaluations = fit.fit.evaluations,
            "Stretched exponential fitted"
        );
        let curve = fit.curve(config.curve_points);
        Ok(RelaxationFigure {
            config: config.clone(),
            data,
            fit,
            curve,
        })
    }

    pub fn fit(&self) -> &RelaxationFit {
        &self.fit
    }

    pub fn curve(&self) -> &[(f64, f64)] {
        &self.curve
    }

    /// y range covering the error bars and the fit curve with a small pad.
    pub fn y_range(&self) -> (f64, f64) {
        let lo = self
            .data
            .signal
            .iter()
            .zip(&self.data.error)
            .map(|(s, e)| s - e)
            .chain(self.curve.iter().map(|p| p.1))
            .fold(f64::INFINITY, f64::min);
        let hi = self
            .data
            .signal
            .iter()
            .zip(&self.data.error)
            .map(|(s, e)| s + e)
            .chain(self.curve.iter().map(|p| p.1))
            .fold(f64::NEG_INFINITY, f64::max);
        let pad = 0.05 * (hi - lo).max(f64::EPSILON);
        (lo - pad, hi + pad)
    }
}

impl Figure for RelaxationFigure {
    fn style(&self) -> &FigureStyle {
        &self.config.style
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<()> {
        let style = &self.config.style;
        let (t0, t1) = self.data.time_range();
        let pad = 0.03 * (t1 - t0);
        let (y0, y1) = self.y_range();

        let mut chart = ChartBuilder::on(root)
            .caption(&self.config.title, font(style, 18.0))
            .margin(style.font_px(12.0) as u32)
            .x_label_area_size(style.font_px(36.0) as u32)
            .y_label_area_size(style.font_px(44.0) as u32)
            .build_cartesian_2d(t0 - pad..t1 + pad, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc(&self.config.x_label)
            .y_desc(&self.config.y_label)
            .axis_desc_style(font(style, 14.0))
            .label_style(font(style, 12.0))
            .light_line_style(TRANSPARENT)
            .bold_line_style(BLACK.mix(0.15))
            .draw()?;

        let d = &self.data;
        let bar = RGBColor(128, 128, 128).stroke_width(style.line_px(1.0));
        chart.draw_series(d.time_us.iter().zip(&d.signal).zip(&d.error).map(
            |((&t, &s), &e)| ErrorBar::new_vertical(t, s - e, s, s + e, bar, style.font_px(4.0) as u32),
        ))?;
        let marker = style.font_px(4.0) as i32;
        chart
            .draw_series(
                d.time_us
                    .iter()
                    .zip(&d.signal)
                    .map(|(&t, &s)| Circle::new((t, s), marker, TAB_BLUE.filled())),
            )?
            .label("Data")
            .legend(move |(x, y)| Circle::new((x + 15, y), marker, TAB_BLUE.filled()));

        let legend = self.fit.legend(self.config.show_params);
        let mut lines = legend.lines();
        let fit_line = CRIMSON.stroke_width(style.line_px(2.5));
        chart
            .draw_series(LineSeries::new(self.curve.iter().copied(), fit_line))?
            .label(lines.next().unwrap_or_default())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], fit_line));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(font(style, 12.0))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.3))
            .draw()?;

        // Fitted values sit under the legend box, one per line.
        let step = 0.06 * (y1 - y0);
        let x = t1 - 0.02 * (t1 - t0);
        let text = anchored(font(style, 12.0), HPos::Right, VPos::Top);
        chart.draw_series(lines.enumerate().map(|(i, line)| {
            Text::new(
                line.to_string(),
                (x, y1 - (2.5 + i as f64) * step),
                text.clone(),
            )
        }))?;
        Ok(())
    }
}
