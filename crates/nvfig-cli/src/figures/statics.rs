// ─────────────────────────────────────────────────────────────────────
// NV Figures — Static Figure Programs
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use nvfig_physics::delta::GaussianDelta;
use nvfig_physics::ellipsoid::AccessibleField;
use nvfig_physics::kernel::KernelDomain;
use nvfig_physics::readout::AcquisitionPreset;
use nvfig_render::figure::export;
use nvfig_render::heatmap::{FilterFunctionConfig, FilterFunctionFigure};
use nvfig_render::lines::{
    AveragingTimeConfig, AveragingTimeFigure, DeltaFunctionConfig, DeltaFunctionFigure,
    ReadoutLevelsConfig, ReadoutLevelsFigure, RelaxationConfig, RelaxationFigure,
};
use nvfig_render::scales::{SpatialScalesConfig, SpatialScalesFigure};
use nvfig_render::surface::{AccessibleFieldConfig, AccessibleFieldFigure};
use nvfig_types::config::{AxisLabels, Colormap, FigureStyle, ViewAngle};
use nvfig_types::constants::MAGIC_ANGLE_DEG;
use nvfig_types::error::FigureResult;

use crate::FigureProgram;

/// Implements [`FigureProgram`] for a config whose figure is built by `$figure::new`.
macro_rules! static_program {
    ($config:ty => $figure:ty) => {
        impl FigureProgram for $config {
            fn output_mut(&mut self) -> &mut String {
                &mut self.output
            }

            fn render(&self) -> FigureResult<()> {
                export(&<$figure>::new(self)?, &self.output)
            }
        }
    };
}

static_program!(FilterFunctionConfig => FilterFunctionFigure);
static_program!(AveragingTimeConfig => AveragingTimeFigure);
static_program!(ReadoutLevelsConfig => ReadoutLevelsFigure);
static_program!(DeltaFunctionConfig => DeltaFunctionFigure);
static_program!(RelaxationConfig => RelaxationFigure);
static_program!(AccessibleFieldConfig => AccessibleFieldFigure);
static_program!(SpatialScalesConfig => SpatialScalesFigure);

pub fn filter_function() -> FilterFunctionConfig {
    FilterFunctionConfig {
        output: "img/filter_function.png".to_string(),
        domain: KernelDomain::default(),
        levels: 30,
        contour_lines: 10,
        style: FigureStyle::new(10.0, 7.0, 100.0)
            .with_colormap(Colormap::Plasma)
            .transparent(),
        title: "Momentum Filter Function".to_string(),
        x_label: "Momentum Coordinate: q".to_string(),
        y_label: "Qubit Distance: d".to_string(),
        colorbar_label: "F(q,d)".to_string(),
    }
}

pub fn total_averaging_time() -> AveragingTimeConfig {
    AveragingTimeConfig {
        output: "total_averaging_time.png".to_string(),
        evolution_time: (0.0, 0.1),
        points: 100,
        target_snr: 5.0,
        presets: AcquisitionPreset::standard_set(),
        style: FigureStyle::new(10.0, 6.0, 600.0).transparent(),
        title: "Total Averaging Time to Achieve σ = 5".to_string(),
        x_label: "Evolution Time (ms)".to_string(),
        y_label: "Total Averaging Time (min)".to_string(),
    }
}

pub fn readout_levels() -> ReadoutLevelsConfig {
    ReadoutLevelsConfig {
        output: "levels_and_P0_P1.png".to_string(),
        contrast: 0.3,
        mid: 0.93,
        arrow_x: 0.5,
        y_range: (-0.05, 1.05),
        style: FigureStyle::new(2.0, 10.0, 300.0).transparent(),
        y_label: "Normalized PL Signal".to_string(),
    }
}

pub fn delta_function() -> DeltaFunctionConfig {
    DeltaFunctionConfig {
        output: "delta_function.png".to_string(),
        delta: GaussianDelta::new(1.0, 0.10, 1.0),
        x_range: (0.0, 2.0),
        points: 1000,
        y_max: 1.1,
        arrow_label: "1/T₂*".to_string(),
        style: FigureStyle::new(9.0, 7.0, 300.0).transparent(),
        x_label: "ω/ω₀".to_string(),
        y_label: "Temporal-Frequency Filter Function".to_string(),
    }
}

pub fn t1_decay() -> RelaxationConfig {
    RelaxationConfig {
        output: "img/T1_decay_80K_2L.png".to_string(),
        data: "img/T1_T=80K_2L.csv".to_string(),
        show_params: false,
        curve_points: 200,
        style: FigureStyle::new(10.0, 7.0, 300.0).transparent(),
        title: "Longitudinal Decay (T₁)".to_string(),
        x_label: "τ (µs)".to_string(),
        y_label: "Polarization".to_string(),
    }
}

pub fn accessible_field() -> AccessibleFieldConfig {
    AccessibleFieldConfig {
        output: "accessible_field.png".to_string(),
        field: AccessibleField::default(),
        nu: 100,
        nv: 100,
        view: ViewAngle {
            elevation_deg: 30.0,
            azimuth_deg: -60.0,
        },
        alpha: 0.7,
        style: FigureStyle::new(10.0, 8.0, 100.0),
        labels: AxisLabels::new(
            "Bx Magnetic Field (T)",
            "By Magnetic Field (T)",
            "Bz Magnetic Field Radius (T)",
        ),
        title: "Accessible Magnetic Field LTSPM3".to_string(),
        show_rings: false,
        ring_angle_deg: MAGIC_ANGLE_DEG,
        ring_scale: 1.01,
    }
}

pub fn spatial_scales() -> SpatialScalesConfig {
    SpatialScalesConfig::standard(
        "img/spatial_scales.png",
        FigureStyle::new(12.0, 10.0, 300.0).transparent(),
    )
}
