// ─────────────────────────────────────────────────────────────────────
// NV Figures — Length Scales
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Catalogue of condensed-matter length scales against the range
//! resolvable by NV sensing geometries.

use nvfig_types::constants::{MICROMETRE, MILLIMETRE, NANOMETRE};
use nvfig_types::error::{FigureError, FigureResult};
use serde::{Deserialize, Serialize};

/// Log axis shared by both panels, metres.
pub const AXIS_RANGE: (f64, f64) = (NANOMETRE, MILLIMETRE);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    /// XYZ resolved.
    Solid,
    /// Z resolved, XY averaged.
    Hatched,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub fill: Fill,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl Segment {
    pub fn solid(start: f64, end: f64) -> Self {
        Segment {
            start,
            end,
            fill: Fill::Solid,
            annotation: None,
        }
    }

    pub fn hatched(start: f64, end: f64) -> Self {
        Segment {
            fill: Fill::Hatched,
            ..Segment::solid(start, end)
        }
    }

    pub fn annotated(mut self, text: &str) -> Self {
        self.annotation = Some(text.to_string());
        self
    }

    /// Width in decades.
    pub fn decades(&self) -> f64 {
        (self.end / self.start).log10()
    }
}

/// One horizontal bar, possibly split into several segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleBar {
    pub label: String,
    /// Bar centre in panel units.
    pub y: f64,
    pub height: f64,
    pub segments: Vec<Segment>,
}

impl ScaleBar {
    pub fn new(label: &str, y: f64, segments: Vec<Segment>) -> Self {
        ScaleBar {
            label: label.to_string(),
            y,
            height: 0.11,
            segments,
        }
    }

    /// Smallest start and largest end over all segments.
    pub fn span(&self) -> (f64, f64) {
        self.segments
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.start), hi.max(s.end))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalePanel {
    pub title: String,
    /// Top of the panel's y range; bottom is 0.
    pub y_max: f64,
    pub bars: Vec<ScaleBar>,
    /// Label the major ticks below this panel.
    pub tick_labels: bool,
    /// Draw the fill legend in this panel.
    pub legend: bool,
}

impl ScalePanel {
    pub fn validate(&self) -> FigureResult<()> {
        for bar in &self.bars {
            if bar.segments.is_empty() {
                return Err(FigureError::Config(format!(
                    "bar '{}' has no segments",
                    bar.label
                )));
            }
            for seg in &bar.segments {
                if !(seg.start > 0.0 && seg.end > seg.start) {
                    return Err(FigureError::Config(format!(
                        "bar '{}': segment [{}, {}] must satisfy 0 < start < end",
                        bar.label, seg.start, seg.end
                    )));
                }
                if seg.start < AXIS_RANGE.0 || seg.end > AXIS_RANGE.1 {
                    return Err(FigureError::Config(format!(
                        "bar '{}': segment [{:e}, {:e}] outside axis",
                        bar.label, seg.start, seg.end
                    )));
                }
            }
            let top = bar.y + 0.5 * bar.height;
            if bar.y - 0.5 * bar.height < 0.0 || top > self.y_max {
                return Err(FigureError::Config(format!(
                    "bar '{}' does not fit in panel height {}",
                    bar.label, self.y_max
                )));
            }
        }
        Ok(())
    }
}

/// Length scales of the phenomena of interest.
pub fn phenomena() -> ScalePanel {
    ScalePanel {
        title: "Phenomena Length Scales".to_string(),
        y_max: 0.55,
        bars: vec![
            ScaleBar::new(
                "SC Vortices",
                0.48,
                vec![
                    Segment::solid(1.0 * NANOMETRE, 15.0 * NANOMETRE).annotated("ξ_c"),
                    Segment::solid(50.0 * NANOMETRE, 500.0 * NANOMETRE).annotated("λ_L"),
                ],
            ),
            ScaleBar::new(
                "Magnetic Domains",
                0.35,
                vec![Segment::solid(15.0 * NANOMETRE, MILLIMETRE)],
            ),
            ScaleBar::new(
                "e⁻ Transport",
                0.22,
                vec![Segment::solid(80.0 * NANOMETRE, 10.0 * MICROMETRE).annotated("l_mc, l_mr")],
            ),
            ScaleBar::new(
                "AFM/FM Magnons",
                0.09,
                vec![Segment::solid(NANOMETRE, MILLIMETRE)],
            ),
        ],
        tick_labels: false,
        legend: false,
    }
}

/// Length scales resolvable by each NV sensing geometry.
pub fn measurable() -> ScalePanel {
    ScalePanel {
        title: "Measurable Length Scales".to_string(),
        y_max: 0.7,
        bars: vec![
            ScaleBar::new(
                "Single NV",
                0.35,
                vec![Segment::solid(6.0 * NANOMETRE, MILLIMETRE)],
            ),
            ScaleBar::new(
                "δ-Doped Ensemble",
                0.22,
                vec![
                    Segment::hatched(6.0 * NANOMETRE, 500.0 * NANOMETRE),
                    Segment::solid(500.0 * NANOMETRE, MILLIMETRE),
                ],
            ),
            ScaleBar::new(
                "Single NV Scanning Probe",
                0.09,
                vec![Segment::solid(40.0 * NANOMETRE, MILLIMETRE)],
            ),
        ],
        tick_labels: true,
        legend: true,
    }
}

/// Labelled ticks: 1 nm, 1 µm, 1 mm.
pub fn major_ticks() -> Vec<(f64, &'static str)> {
    vec![
        (NANOMETRE, "1 nm"),
        (MICROMETRE, "1 μm"),
        (MILLIMETRE, "1 mm"),
    ]
}

/// Remaining decades between the major ticks.
pub fn decade_ticks() -> Vec<f64> {
    vec![1e-8, 1e-7, 1e-5, 1e-4]
}

/// 2..9 × 10^k for every decade on the axis.
pub fn minor_ticks() -> Vec<f64> {
    (-9..-3)
        .flat_map(|exp| (2..10).map(move |sub| sub as f64 * 10f64.powi(exp)))
        .filter(|&t| t >= AXIS_RANGE.0 && t <= AXIS_RANGE.1)
        .collect()
}
