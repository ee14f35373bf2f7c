// ─────────────────────────────────────────────────────────────────────
// NV Figures — Sweep Pipeline
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Parameter sweep → field evaluation → frame sinks.
//!
//! The mesh and axis limits are fixed for the whole sweep; every sink sees
//! the frames in increasing index order, then `finish` exactly once.

use ndarray::Array2;
use nvfig_math::sweep::Sweep;
use nvfig_types::config::{AnimationConfig, SingularityPolicy};
use nvfig_types::error::{FigureError, FigureResult};
use nvfig_types::state::{AxisLimits, Mesh2D};
use tracing::{debug, info, warn};

/// One evaluated sweep step, borrowed by each sink in turn.
#[derive(Debug, Clone, Copy)]
pub struct SweepFrame<'a> {
    pub index: usize,
    pub parameter: f64,
    pub field: &'a Array2<f64>,
    pub mesh: &'a Mesh2D,
    pub limits: &'a AxisLimits,
}

/// Consumer of sweep frames.
pub trait FrameSink {
    fn accept(&mut self, frame: &SweepFrame<'_>) -> FigureResult<()>;

    /// Flush and close the output. Called once after the last frame.
    fn finish(&mut self) -> FigureResult<()> {
        Ok(())
    }
}

/// What a completed sweep produced.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Parameter of every emitted frame, in order.
    pub parameters: Vec<f64>,
    pub emitted: Vec<usize>,
    pub skipped: Vec<usize>,
    /// Limits handed to each emitted frame.
    pub limits: Vec<AxisLimits>,
}

impl SweepReport {
    pub fn frame_count(&self) -> usize {
        self.emitted.len()
    }
}

pub struct SweepPipeline {
    sweep: Sweep,
    mesh: Mesh2D,
    limits: AxisLimits,
    policy: SingularityPolicy,
}

impl SweepPipeline {
    pub fn new(sweep: Sweep, mesh: Mesh2D, limits: AxisLimits, policy: SingularityPolicy) -> Self {
        SweepPipeline {
            sweep,
            mesh,
            limits,
            policy,
        }
    }

    pub fn from_config(config: &AnimationConfig) -> FigureResult<Self> {
        config.validate()?;
        let sweep = Sweep::from_config(&config.sweep)?;
        let mesh = Mesh2D::from_spec(&config.mesh);
        let limits = AxisLimits::for_mesh(&mesh, config.z_limits);
        Ok(Self::new(sweep, mesh, limits, config.singularity))
    }

    pub fn sweep(&self) -> &Sweep {
        &self.sweep
    }

    pub fn mesh(&self) -> &Mesh2D {
        &self.mesh
    }

    pub fn limits(&self) -> &AxisLimits {
        &self.limits
    }

    /// Evaluate every sweep value and hand the frames to `sinks`.
    ///
    /// On error no sink is finished, so staged outputs are discarded. A
    /// sweep whose frames were all skipped is an error too.
    pub fn run<F>(&self, evaluate: F, sinks: &mut [&mut dyn FrameSink]) -> FigureResult<SweepReport>
    where
        F: Fn(&Mesh2D, f64) -> Array2<f64>,
    {
        info!(
            frames = self.sweep.len(),
            start = self.sweep.start(),
            end = self.sweep.end(),
            policy = ?self.policy,
            "Starting sweep"
        );

        let mut report = SweepReport::default();
        for (index, parameter) in self.sweep.iter() {
            let raw = evaluate(&self.mesh, parameter);
            if raw.dim() != (self.mesh.ny, self.mesh.nx) {
                return Err(FigureError::Data(format!(
                    "field shape {:?} does not match mesh [{}, {}]",
                    raw.dim(),
                    self.mesh.ny,
                    self.mesh.nx
                )));
            }

            let Some(field) = self.apply_policy(index, parameter, raw)? else {
                report.skipped.push(index);
                continue;
            };

            let frame = SweepFrame {
                index,
                parameter,
                field: &field,
                mesh: &self.mesh,
                limits: &self.limits,
            };
            for sink in sinks.iter_mut() {
                sink.accept(&frame)?;
            }
            debug!(index, parameter, "Frame emitted");

            report.parameters.push(parameter);
            report.emitted.push(index);
            report.limits.push(self.limits);
        }

        if report.emitted.is_empty() {
            return Err(FigureError::InvalidSweep(format!(
                "all {} frames were skipped for non-finite samples",
                report.skipped.len()
            )));
        }
        for sink in sinks.iter_mut() {
            sink.finish()?;
        }

        info!(
            emitted = report.emitted.len(),
            skipped = report.skipped.len(),
            "Sweep complete"
        );
        Ok(report)
    }

    /// `Ok(None)` drops the frame.
    fn apply_policy(
        &self,
        index: usize,
        parameter: f64,
        field: Array2<f64>,
    ) -> FigureResult<Option<Array2<f64>>> {
        let non_finite = field.iter().filter(|v| !v.is_finite()).count();
        match self.policy {
            SingularityPolicy::Propagate => Ok(Some(field)),
            SingularityPolicy::SkipFrame if non_finite > 0 => {
                warn!(index, parameter, non_finite, "Skipping frame with non-finite samples");
                Ok(None)
            }
            SingularityPolicy::SkipFrame => Ok(Some(field)),
            SingularityPolicy::Abort if non_finite > 0 => {
                Err(FigureError::NonFinite { frame: index, parameter })
            }
            SingularityPolicy::Abort => Ok(Some(field)),
            SingularityPolicy::ClampToLimits => {
                let (lo, hi) = self.limits.z;
                Ok(Some(field.mapv(|v| if v.is_nan() { v } else { v.clamp(lo, hi) })))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvfig_types::config::SweepConfig;

    #[derive(Default)]
    struct Recorder {
        parameters: Vec<f64>,
        indices: Vec<usize>,
        limits: Vec<AxisLimits>,
        fields: Vec<Array2<f64>>,
        finished: usize,
    }

    impl FrameSink for Recorder {
        fn accept(&mut self, frame: &SweepFrame<'_>) -> FigureResult<()> {
            self.parameters.push(frame.parameter);
            self.indices.push(frame.index);
            self.limits.push(*frame.limits);
            self.fields.push(frame.field.clone());
            Ok(())
        }

        fn finish(&mut self) -> FigureResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    fn pipeline(start: f64, end: f64, n: usize, policy: SingularityPolicy) -> SweepPipeline {
        let mesh = Mesh2D::new(8, 6, -3.0, 3.0, 0.0, 3.0);
        let limits = AxisLimits::for_mesh(&mesh, (-3.0, 4.0));
        let sweep = Sweep::from_config(&SweepConfig::new(start, end, n)).unwrap();
        SweepPipeline::new(sweep, mesh, limits, policy)
    }

    fn quadratic(mesh: &Mesh2D, p: f64) -> Array2<f64> {
        mesh.radius_squared().mapv(|r| p * r)
    }

    #[test]
    fn test_frames_in_order_with_fixed_limits() {
        let p = pipeline(-0.5, 3.0, 30, SingularityPolicy::Propagate);
        let mut rec = Recorder::default();
        let report = p.run(quadratic, &mut [&mut rec]).unwrap();
        assert_eq!(report.frame_count(), 30);
        assert_eq!(rec.indices, (0..30).collect::<Vec<_>>());
        assert_eq!(rec.limits[0], rec.limits[29]);
        assert_eq!(report.limits[0], report.limits[29]);
        assert_eq!(rec.parameters[29], 3.0);
        assert_eq!(rec.finished, 1);
    }

    #[test]
    fn test_two_frame_sweep_hits_both_ends() {
        let p = pipeline(4.0, -4.0, 2, SingularityPolicy::Propagate);
        let mut rec = Recorder::default();
        p.run(quadratic, &mut [&mut rec]).unwrap();
        assert_eq!(rec.parameters, vec![4.0, -4.0]);
    }

    #[test]
    fn test_single_frame_at_start() {
        let p = pipeline(1.25, 9.0, 1, SingularityPolicy::Propagate);
        let mut rec = Recorder::default();
        p.run(quadratic, &mut [&mut rec]).unwrap();
        assert_eq!(rec.parameters, vec![1.25]);
    }

    #[test]
    fn test_constant_sweep_identical_frames() {
        let p = pipeline(0.7, 0.7, 4, SingularityPolicy::Propagate);
        let mut rec = Recorder::default();
        p.run(quadratic, &mut [&mut rec]).unwrap();
        assert!(rec.fields.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_repeat_runs_bit_identical() {
        let p = pipeline(-0.5, 3.0, 7, SingularityPolicy::Propagate);
        let mut a = Recorder::default();
        let mut b = Recorder::default();
        p.run(quadratic, &mut [&mut a]).unwrap();
        p.run(quadratic, &mut [&mut b]).unwrap();
        for (fa, fb) in a.fields.iter().zip(&b.fields) {
            assert!(fa.iter().zip(fb).all(|(x, y)| x.to_bits() == y.to_bits()));
        }
    }

    fn singular(mesh: &Mesh2D, p: f64) -> Array2<f64> {
        mesh.radius_squared().mapv(|r| if p > 0.5 { 1.0 / (r - r) } else { r })
    }

    #[test]
    fn test_skip_frame_policy() {
        let p = pipeline(0.0, 1.0, 3, SingularityPolicy::SkipFrame);
        let mut rec = Recorder::default();
        let report = p.run(singular, &mut [&mut rec]).unwrap();
        assert_eq!(report.skipped, vec![2]);
        assert_eq!(report.emitted, vec![0, 1]);
        assert_eq!(rec.indices, vec![0, 1]);
    }

    #[test]
    fn test_abort_policy() {
        let p = pipeline(0.0, 1.0, 3, SingularityPolicy::Abort);
        let mut rec = Recorder::default();
        let err = p.run(singular, &mut [&mut rec]).unwrap_err();
        assert!(matches!(err, FigureError::NonFinite { frame: 2, .. }));
        assert_eq!(rec.finished, 0);
    }

    #[test]
    fn test_clamp_policy_keeps_nan() {
        let p = pipeline(0.0, 0.0, 1, SingularityPolicy::ClampToLimits);
        let mut rec = Recorder::default();
        let field = |mesh: &Mesh2D, _p: f64| {
            let mut f = Array2::from_elem((mesh.ny, mesh.nx), 100.0);
            f[[0, 0]] = f64::NAN;
            f[[0, 1]] = f64::NEG_INFINITY;
            f
        };
        p.run(field, &mut [&mut rec]).unwrap();
        let f = &rec.fields[0];
        assert!(f[[0, 0]].is_nan());
        assert_eq!(f[[0, 1]], -3.0);
        assert_eq!(f[[1, 1]], 4.0);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let p = pipeline(0.0, 1.0, 2, SingularityPolicy::Propagate);
        let mut rec = Recorder::default();
        let bad = |_: &Mesh2D, _: f64| Array2::<f64>::zeros((2, 2));
        assert!(matches!(
            p.run(bad, &mut [&mut rec]),
            Err(FigureError::Data(_))
        ));
    }

    #[test]
    fn test_multiple_sinks_see_same_frames() {
        let p = pipeline(0.0, 2.0, 5, SingularityPolicy::Propagate);
        let mut a = Recorder::default();
        let mut b = Recorder::default();
        p.run(quadratic, &mut [&mut a, &mut b]).unwrap();
        assert_eq!(a.parameters, b.parameters);
        assert_eq!(b.finished, 1);
    }

    #[test]
    fn test_all_frames_skipped_is_error() {
        let p = pipeline(1.0, 2.0, 4, SingularityPolicy::SkipFrame);
        let mut rec = Recorder::default();
        let err = p.run(singular, &mut [&mut rec]).unwrap_err();
        assert!(matches!(err, FigureError::InvalidSweep(_)));
        assert!(rec.indices.is_empty());
        assert_eq!(rec.finished, 0);
    }
}
