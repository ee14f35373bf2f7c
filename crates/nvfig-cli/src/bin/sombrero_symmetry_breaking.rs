// ─────────────────────────────────────────────────────────────────────
// NV Figures — Hump-to-Valley Animation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Animated sombrero potential V = μr² + r⁴ as μ drops from 2 towards −0.5.

use std::process;

use clap::Parser;
use tracing::error;

use nvfig_cli::{execute, figures, FigureArgs};

fn main() {
    nvfig_cli::init_logging();

    let args = FigureArgs::parse();
    if let Err(e) = execute(&args, figures::sombrero_symmetry_breaking()) {
        error!("sombrero_symmetry_breaking failed: {e}");
        process::exit(1);
    }
}
