// ─────────────────────────────────────────────────────────────────────
// NV Figures — Delta Function
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Gaussian approximation of the temporal-frequency filter with its FWHM arrow.

use std::process;

use clap::Parser;
use tracing::error;

use nvfig_cli::{execute, figures, FigureArgs};

fn main() {
    nvfig_cli::init_logging();

    let args = FigureArgs::parse();
    if let Err(e) = execute(&args, figures::delta_function()) {
        error!("delta_function failed: {e}");
        process::exit(1);
    }
}
