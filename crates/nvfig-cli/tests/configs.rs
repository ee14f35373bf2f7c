// ─────────────────────────────────────────────────────────────────────
// NV Figures — Shipped Configuration Tests
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Every document under `configs/` loads into its figure configuration
//! and matches the built-in defaults where it should.

use std::path::PathBuf;

use nvfig_cli::figures::{self, SombreroAnimation};
use nvfig_render::heatmap::{FilterFunctionConfig, FilterFunctionFigure};
use nvfig_render::lines::{
    AveragingTimeConfig, AveragingTimeFigure, DeltaFunctionConfig, DeltaFunctionFigure,
    ReadoutLevelsConfig, ReadoutLevelsFigure, RelaxationConfig,
};
use nvfig_render::scales::{SpatialScalesConfig, SpatialScalesFigure};
use nvfig_render::surface::{AccessibleFieldConfig, AccessibleFieldFigure};
use nvfig_types::config::{load_json, SweepSpacing};

fn config(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../configs")
        .join(name)
}

#[test]
fn animations_load_and_validate() {
    let hump: SombreroAnimation = load_json(config("sombrero_symmetry_breaking.json")).unwrap();
    hump.animation.validate().unwrap();
    assert_eq!(hump.animation.sweep.spacing, SweepSpacing::Exclusive);
    assert!(hump.potential.cutoff.is_none());

    let broken: SombreroAnimation = load_json(config("sombrero_potential.json")).unwrap();
    broken.animation.validate().unwrap();
    assert_eq!(broken.animation.sweep.frame_count, 30);
    assert!(broken.animation.archive.is_some());
    let defaults = figures::sombrero_potential();
    assert_eq!(broken.potential.lambda, defaults.potential.lambda);
    assert_eq!(broken.potential.convention, defaults.potential.convention);
}

#[test]
fn static_figures_load_and_build() {
    let c: FilterFunctionConfig = load_json(config("filter_function.json")).unwrap();
    FilterFunctionFigure::new(&c).unwrap();

    let c: AveragingTimeConfig = load_json(config("total_averaging_time.json")).unwrap();
    assert_eq!(c.presets.len(), 3);
    AveragingTimeFigure::new(&c).unwrap();

    let c: ReadoutLevelsConfig = load_json(config("readout_levels.json")).unwrap();
    ReadoutLevelsFigure::new(&c).unwrap();

    let c: DeltaFunctionConfig = load_json(config("delta_function.json")).unwrap();
    assert_eq!(c.delta.amplitude, 1.0);
    DeltaFunctionFigure::new(&c).unwrap();

    let c: AccessibleFieldConfig = load_json(config("accessible_field.json")).unwrap();
    assert!(c.show_rings);
    AccessibleFieldFigure::new(&c).unwrap();

    let c: SpatialScalesConfig = load_json(config("spatial_scales.json")).unwrap();
    SpatialScalesFigure::new(&c).unwrap();
}

#[test]
fn t1_config_loads() {
    let c: RelaxationConfig = load_json(config("t1_decay.json")).unwrap();
    assert!(c.show_params);
    assert_eq!(c.data, figures::t1_decay().data);
}

#[test]
fn spatial_scales_file_matches_catalogue() {
    let file: SpatialScalesConfig = load_json(config("spatial_scales.json")).unwrap();
    let builtin = figures::spatial_scales();
    for (a, b) in file.panels.iter().zip(&builtin.panels) {
        assert_eq!(a.title, b.title);
        assert_eq!(a.bars.len(), b.bars.len());
        for (x, y) in a.bars.iter().zip(&b.bars) {
            assert_eq!(x.label, y.label);
            let (fx, bx) = (x.span(), y.span());
            assert!((fx.0 / bx.0 - 1.0).abs() < 1e-12);
            assert!((fx.1 / bx.1 - 1.0).abs() < 1e-12);
        }
    }
}
