// ─────────────────────────────────────────────────────────────────────
// NV Figures — Parameter Sweep
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Evenly spaced parameter sweeps.
//!
//! One sweep value drives one animation frame. Values are computed on
//! demand from `(start, end, count)` so a sweep never holds state beyond
//! its definition.

use nvfig_types::config::{SweepConfig, SweepSpacing};
use nvfig_types::error::FigureResult;

/// Ordered, evenly spaced sequence of `count` parameter values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    start: f64,
    end: f64,
    count: usize,
    spacing: SweepSpacing,
}

impl Sweep {
    /// `linspace(start, end, count)`, both ends included.
    pub fn new(start: f64, end: f64, count: usize) -> FigureResult<Self> {
        Self::from_config(&SweepConfig::new(start, end, count))
    }

    /// `start + (i / count)·(end − start)`, end excluded.
    pub fn exclusive(start: f64, end: f64, count: usize) -> FigureResult<Self> {
        let mut config = SweepConfig::new(start, end, count);
        config.spacing = SweepSpacing::Exclusive;
        Self::from_config(&config)
    }

    pub fn from_config(config: &SweepConfig) -> FigureResult<Self> {
        config.validate()?;
        Ok(Sweep {
            start: config.start,
            end: config.end,
            count: config.frame_count,
            spacing: config.spacing,
        })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    /// Always false: a validated sweep has at least one value.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn spacing(&self) -> SweepSpacing {
        self.spacing
    }

    /// All frames identical.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end || self.count == 1
    }

    /// Value of frame `index`. Panics if `index >= len()`.
    pub fn value_at(&self, index: usize) -> f64 {
        assert!(
            index < self.count,
            "sweep index {index} out of range for {} frames",
            self.count
        );
        match self.spacing {
            SweepSpacing::Inclusive => {
                if self.count == 1 {
                    return self.start;
                }
                if index == self.count - 1 {
                    return self.end;
                }
                let step = (self.end - self.start) / (self.count - 1) as f64;
                self.start + index as f64 * step
            }
            SweepSpacing::Exclusive => {
                let frac = index as f64 / self.count as f64;
                self.start + frac * (self.end - self.start)
            }
        }
    }

    /// `(index, value)` pairs in increasing index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.count).map(move |i| (i, self.value_at(i)))
    }

    pub fn values(&self) -> Vec<f64> {
        self.iter().map(|(_, v)| v).collect()
    }
}

/// Evenly spaced samples with both ends included (curves, ridges, tick sets).
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvfig_types::error::FigureError;

    #[test]
    fn test_two_frame_sweep_hits_both_ends() {
        let sweep = Sweep::new(4.0, -4.0, 2).unwrap();
        assert_eq!(sweep.values(), vec![4.0, -4.0]);
    }

    #[test]
    fn test_single_frame_is_start() {
        let sweep = Sweep::new(-0.5, 3.0, 1).unwrap();
        assert_eq!(sweep.values(), vec![-0.5]);
        assert!(sweep.is_degenerate());
    }

    #[test]
    fn test_constant_sweep() {
        let sweep = Sweep::new(1.5, 1.5, 5).unwrap();
        assert!(sweep.values().iter().all(|&v| v == 1.5));
    }

    #[test]
    fn test_linspace_midpoint() {
        let sweep = Sweep::new(-0.5, 3.0, 30).unwrap();
        let values = sweep.values();
        assert_eq!(values.len(), 30);
        assert_eq!(values[0], -0.5);
        assert_eq!(values[29], 3.0);
        let step = 3.5 / 29.0;
        assert!((values[10] - (-0.5 + 10.0 * step)).abs() < 1e-12);
    }

    #[test]
    fn test_exclusive_never_reaches_end() {
        let sweep = Sweep::exclusive(2.0, -0.5, 60).unwrap();
        let values = sweep.values();
        assert_eq!(values[0], 2.0);
        assert!((values[59] - (2.0 - 59.0 / 60.0 * 2.5)).abs() < 1e-12);
        assert!(values[59] > -0.5);
    }

    #[test]
    fn test_invalid_sweeps_rejected() {
        assert!(matches!(
            Sweep::new(0.0, 1.0, 0),
            Err(FigureError::InvalidSweep(_))
        ));
        assert!(matches!(
            Sweep::new(0.0, f64::INFINITY, 3),
            Err(FigureError::InvalidSweep(_))
        ));
    }

    #[test]
    #[should_panic]
    fn test_value_out_of_range_panics() {
        let sweep = Sweep::new(0.0, 1.0, 3).unwrap();
        let _ = sweep.value_at(3);
    }

    #[test]
    fn test_free_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 9.0, 1), vec![2.0]);
        let v = linspace(0.0, 2.0, 5);
        assert_eq!(v, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }
}
