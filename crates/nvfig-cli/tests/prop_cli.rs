// ─────────────────────────────────────────────────────────────────────
// NV Figures — Property-Based Tests (proptest) for nvfig-cli
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for nvfig-cli using proptest.
//!
//! Covers: flag parsing, `--output` overrides, `--config` documents
//! replacing the defaults.

use std::path::PathBuf;

use clap::Parser;
use nvfig_cli::{figures, resolve, FigureArgs};
use nvfig_types::config::to_json;
use proptest::prelude::*;

fn output_path() -> impl Strategy<Value = String> {
    (
        "[a-z][a-z0-9_]{0,10}",
        "[a-z][a-z0-9_]{0,10}",
        prop_oneof![Just("png"), Just("svg")],
    )
        .prop_map(|(dir, stem, ext)| format!("{dir}/{stem}.{ext}"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// `-o` reaches the parsed flags unchanged, long or short.
    #[test]
    fn output_flag_parses(path in output_path(), short in any::<bool>()) {
        let flag = if short { "-o" } else { "--output" };
        let args = FigureArgs::parse_from(["figure", flag, path.as_str()]);
        prop_assert_eq!(args.output, Some(PathBuf::from(&path)));
        prop_assert!(args.config.is_none());
        prop_assert!(!args.print_config);
    }

    /// `--output` replaces only the output of every static program.
    #[test]
    fn output_override_replaces_only_output(path in output_path()) {
        let args = FigureArgs {
            output: Some(PathBuf::from(&path)),
            ..FigureArgs::default()
        };

        let delta = resolve(&args, figures::delta_function()).unwrap();
        prop_assert_eq!(&delta.output, &path);
        prop_assert_eq!(delta.delta.fwhm, figures::delta_function().delta.fwhm);

        let readout = resolve(&args, figures::readout_levels()).unwrap();
        prop_assert_eq!(&readout.output, &path);
        prop_assert_eq!(readout.mid, figures::readout_levels().mid);

        let scales = resolve(&args, figures::spatial_scales()).unwrap();
        prop_assert_eq!(&scales.output, &path);

        let anim = resolve(&args, figures::sombrero_potential()).unwrap();
        prop_assert_eq!(&anim.animation.output, &path);
        prop_assert_eq!(anim.animation.sweep.frame_count, 30);
    }

    /// A `--config` document wins over the defaults, and `--output` wins
    /// over the document.
    #[test]
    fn config_document_then_output_override(
        contrast in 0.05f64..0.5,
        mid in 0.9f64..0.99,
        path in output_path(),
        override_output in any::<bool>(),
    ) {
        let dir = std::env::temp_dir().join("nvfig_prop_cli");
        std::fs::create_dir_all(&dir).unwrap();
        let doc = dir.join(format!("readout_{}.json", contrast.to_bits()));
        let mut custom = figures::readout_levels();
        custom.contrast = contrast;
        custom.mid = mid;
        std::fs::write(&doc, to_json(&custom).unwrap()).unwrap();

        let args = FigureArgs {
            config: Some(doc.clone()),
            output: override_output.then(|| PathBuf::from(&path)),
            ..FigureArgs::default()
        };
        let program = resolve(&args, figures::readout_levels()).unwrap();
        prop_assert_eq!(program.contrast, contrast);
        prop_assert_eq!(program.mid, mid);
        let expected = if override_output { path } else { custom.output };
        prop_assert_eq!(program.output, expected);
        let _ = std::fs::remove_file(doc);
    }
}
