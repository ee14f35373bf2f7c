// ─────────────────────────────────────────────────────────────────────
// NV Figures — Sombrero Animations
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use nvfig_physics::sombrero::SombreroPotential;
use nvfig_render::animation::{FrameSink, SweepPipeline};
use nvfig_render::archive::FieldArchive;
use nvfig_render::surface::SurfaceGifSink;
use nvfig_types::config::{
    AnimationConfig, AxisLabels, FigureStyle, MeshSpec, SingularityPolicy, SweepConfig,
    SweepSpacing, ViewAngle,
};
use nvfig_types::error::FigureResult;
use nvfig_types::state::Mesh2D;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::FigureProgram;

/// A sombrero potential swept through its quadratic coefficient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SombreroAnimation {
    pub potential: SombreroPotential,
    pub animation: AnimationConfig,
}

impl FigureProgram for SombreroAnimation {
    fn output_mut(&mut self) -> &mut String {
        &mut self.animation.output
    }

    fn render(&self) -> FigureResult<()> {
        let pipeline = SweepPipeline::from_config(&self.animation)?;
        let mut gif = SurfaceGifSink::create(&self.animation)?;
        let mut archive = self.animation.archive.as_ref().map(FieldArchive::new);

        let potential = self.potential;
        let evaluate = move |mesh: &Mesh2D, p: f64| potential.field(mesh, p);
        // The archive finishes first so the GIF is the last file committed.
        let report = match archive.as_mut() {
            Some(archive) => {
                pipeline.run(evaluate, &mut [archive as &mut dyn FrameSink, &mut gif])?
            }
            None => pipeline.run(evaluate, &mut [&mut gif as &mut dyn FrameSink])?,
        };
        info!(
            output = %self.animation.output,
            frames = report.frame_count(),
            skipped = report.skipped.len(),
            "Animation finished"
        );
        Ok(())
    }
}

/// μ from 2 down towards −0.5: the central hump sinks into a ring valley.
pub fn sombrero_symmetry_breaking() -> SombreroAnimation {
    SombreroAnimation {
        potential: SombreroPotential::hump_to_valley(),
        animation: AnimationConfig {
            output: "sombrero_symmetry_breaking.gif".to_string(),
            archive: None,
            mesh: MeshSpec::square(-3.0, 3.0, 100),
            sweep: SweepConfig {
                spacing: SweepSpacing::Exclusive,
                ..SweepConfig::new(2.0, -0.5, 60)
            },
            z_limits: (-5.0, 20.0),
            view: ViewAngle {
                elevation_deg: 25.0,
                azimuth_deg: 45.0,
            },
            fps: 30,
            style: FigureStyle::new(8.0, 6.0, 100.0),
            surface_alpha: 0.9,
            singularity: SingularityPolicy::Propagate,
            labels: AxisLabels::new("X", "Y", "V(x,y)"),
            title: "Sombrero Potential (μ={value})".to_string(),
        },
    }
}

/// μ² from −0.5 to 3 on the half plane y ≥ 0, with the soft height cutoff.
pub fn sombrero_potential() -> SombreroAnimation {
    SombreroAnimation {
        potential: SombreroPotential::symmetry_breaking(),
        animation: AnimationConfig {
            output: "sombrero_potential.gif".to_string(),
            archive: None,
            mesh: MeshSpec {
                x: (-3.0, 3.0),
                y: (0.0, 3.0),
                nx: 100,
                ny: 100,
            },
            sweep: SweepConfig::new(-0.5, 3.0, 30),
            z_limits: (-3.0, 4.0),
            view: ViewAngle {
                elevation_deg: 20.0,
                azimuth_deg: -90.0,
            },
            fps: 10,
            style: FigureStyle::new(10.0, 8.0, 100.0),
            surface_alpha: 0.8,
            // Cutoff samples are NaN on purpose; they must stay blank.
            singularity: SingularityPolicy::Propagate,
            labels: AxisLabels::new("φ₁", "φ₂", "V(φ)"),
            title: "Sombrero Potential: μ² = {value}".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvfig_math::sweep::Sweep;

    #[test]
    fn test_defaults_validate() {
        sombrero_symmetry_breaking().animation.validate().unwrap();
        sombrero_potential().animation.validate().unwrap();
    }

    #[test]
    fn test_hump_sweep_never_reaches_end() {
        let sweep = Sweep::from_config(&sombrero_symmetry_breaking().animation.sweep).unwrap();
        assert_eq!(sweep.len(), 60);
        assert_eq!(sweep.value_at(0), 2.0);
        assert!((sweep.value_at(59) - (2.0 - 59.0 / 60.0 * 2.5)).abs() < 1e-12);
    }

    #[test]
    fn test_caption_formats_parameter() {
        let a = sombrero_potential().animation;
        assert_eq!(a.caption(1.0 / 3.0), "Sombrero Potential: μ² = 0.33");
        assert_eq!(a.frame_delay_ms(), 100);
    }

    fn tiny(mut program: SombreroAnimation, dir: &std::path::Path) -> SombreroAnimation {
        program.animation.output = dir.join("tiny.gif").display().to_string();
        program.animation.archive = Some(dir.join("tiny.npz").display().to_string());
        program.animation.mesh = MeshSpec::square(-3.0, 3.0, 6);
        program.animation.style = FigureStyle::new(1.0, 1.0, 40.0);
        program.animation.labels = AxisLabels::new("", "", "");
        program.animation.title = String::new();
        program
    }

    #[test]
    fn test_small_animation_renders() {
        let dir = std::env::temp_dir().join("nvfig_cli_anim");
        let mut program = tiny(sombrero_symmetry_breaking(), &dir);
        program.animation.sweep = SweepConfig::new(2.0, -0.5, 2);
        program.render().unwrap();
        assert!(dir.join("tiny.gif").metadata().unwrap().len() > 0);
        assert!(dir.join("tiny.npz").metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_failed_animation_writes_nothing() {
        let dir = std::env::temp_dir().join("nvfig_cli_anim_abort");
        let _ = std::fs::remove_dir_all(&dir);
        let mut program = tiny(sombrero_potential(), &dir);
        // The soft cutoff hides samples, so aborting on them fails the run.
        program.animation.singularity = SingularityPolicy::Abort;
        assert!(program.render().is_err());
        assert!(!dir.join("tiny.gif").exists());
        assert!(!dir.join("tiny.npz").exists());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }
}
