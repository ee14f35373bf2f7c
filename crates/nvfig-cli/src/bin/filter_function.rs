// ─────────────────────────────────────────────────────────────────────
// NV Figures — Filter Function
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Momentum filter F(q, d) = q³e^{−2qd} on log-log axes with its traced ridge.

use std::process;

use clap::Parser;
use tracing::error;

use nvfig_cli::{execute, figures, FigureArgs};

fn main() {
    nvfig_cli::init_logging();

    let args = FigureArgs::parse();
    if let Err(e) = execute(&args, figures::filter_function()) {
        error!("filter_function failed: {e}");
        process::exit(1);
    }
}
