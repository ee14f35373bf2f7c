// ─────────────────────────────────────────────────────────────────────
// NV Figures — Symmetry-Breaking Animation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Animated half-plane sombrero V = −μ²r² + ½r⁴ with a soft height cutoff.

use std::process;

use clap::Parser;
use tracing::error;

use nvfig_cli::{execute, figures, FigureArgs};

fn main() {
    nvfig_cli::init_logging();

    let args = FigureArgs::parse();
    if let Err(e) = execute(&args, figures::sombrero_potential()) {
        error!("sombrero_potential failed: {e}");
        process::exit(1);
    }
}
