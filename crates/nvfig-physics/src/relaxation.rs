// ─────────────────────────────────────────────────────────────────────
// NV Figures — Longitudinal Relaxation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! T₁ decay data and its stretched-exponential fit.
//!
//! S(t) = A·exp(−(t/τ)^γ), times in µs.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use nvfig_math::fit::{curve_fit, CurveFit, CurveFitOptions};
use nvfig_math::sweep::linspace;
use nvfig_types::error::{FigureError, FigureResult};
use serde::Deserialize;

const MICROSECONDS_PER_MILLISECOND: f64 = 1000.0;

pub fn stretched_exp(t: f64, amplitude: f64, tau: f64, gamma: f64) -> f64 {
    amplitude * (-(t / tau).powf(gamma)).exp()
}

fn model(t: f64, p: &[f64]) -> f64 {
    stretched_exp(t, p[0], p[1], p[2])
}

/// Measured polarisation with per-point errors.
#[derive(Debug, Clone, Default)]
pub struct RelaxationData {
    pub time_us: Vec<f64>,
    pub signal: Vec<f64>,
    pub error: Vec<f64>,
}

/// One CSV record, read by position so header names may vary.
#[derive(Debug, Deserialize)]
struct Row(f64, f64, f64);

fn data_error(e: csv::Error) -> FigureError {
    match e.position() {
        Some(pos) => FigureError::Data(format!("line {}: {e}", pos.line())),
        None => FigureError::Data(e.to_string()),
    }
}

impl RelaxationData {
    pub fn from_csv(path: impl AsRef<Path>) -> FigureResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::read(file).map_err(|e| match e {
            FigureError::Data(msg) => FigureError::Data(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse `time_ms,signal,error` rows after a single header line.
    pub fn parse_csv(text: &str) -> FigureResult<Self> {
        Self::read(text.as_bytes())
    }

    fn read<R: Read>(source: R) -> FigureResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(source);
        let mut data = RelaxationData::default();
        for row in reader.deserialize::<Row>() {
            let Row(time_ms, signal, error) = row.map_err(data_error)?;
            data.time_us.push(time_ms * MICROSECONDS_PER_MILLISECOND);
            data.signal.push(signal);
            data.error.push(error);
        }
        if data.is_empty() {
            return Err(FigureError::Data("no data rows".to_string()));
        }
        Ok(data)
    }

    pub fn len(&self) -> usize {
        self.time_us.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_us.is_empty()
    }

    pub fn time_range(&self) -> (f64, f64) {
        self.time_us
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
                (lo.min(t), hi.max(t))
            })
    }

    /// A₀ = max signal, τ₀ = half the time span, γ₀ = 1.
    pub fn initial_guess(&self) -> [f64; 3] {
        let a0 = self.signal.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let (t_min, t_max) = self.time_range();
        [a0, (t_max - t_min) / 2.0, 1.0]
    }

    pub fn fit(&self) -> FigureResult<RelaxationFit> {
        let options = CurveFitOptions {
            max_evaluations: 10_000,
            ..CurveFitOptions::default()
        };
        let fit = curve_fit(
            model,
            &self.time_us,
            &self.signal,
            Some(&self.error),
            &self.initial_guess(),
            options,
        )?;
        Ok(RelaxationFit {
            fit,
            range: self.time_range(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RelaxationFit {
    pub fit: CurveFit,
    range: (f64, f64),
}

impl RelaxationFit {
    pub fn amplitude(&self) -> f64 {
        self.fit.params[0]
    }

    pub fn tau(&self) -> f64 {
        self.fit.params[1]
    }

    pub fn gamma(&self) -> f64 {
        self.fit.params[2]
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        model(t, &self.fit.params)
    }

    /// `n` evenly spaced samples across the data range.
    pub fn curve(&self, n: usize) -> Vec<(f64, f64)> {
        linspace(self.range.0, self.range.1, n)
            .into_iter()
            .map(|t| (t, self.evaluate(t)))
            .collect()
    }

    /// Legend entry: the model equation, optionally with fitted values.
    pub fn legend(&self, show_params: bool) -> String {
        let equation = "S(τ) = A·exp(−(τ/T₁)^γ)".to_string();
        if !show_params {
            return equation;
        }
        let e = &self.fit.uncertainties;
        format!(
            "{equation}\nA = {} ± {}\nT₁ = {} ± {} µs\nγ = {} ± {}",
            sig(self.amplitude(), 3),
            sig(e[0], 2),
            sig(self.tau(), 3),
            sig(e[1], 2),
            sig(self.gamma(), 3),
            sig(e[2], 2),
        )
    }
}

/// Format to `digits` significant figures.
fn sig(value: f64, digits: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    format!("{value:.decimals$}")
}
