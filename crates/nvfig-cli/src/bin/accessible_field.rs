// ─────────────────────────────────────────────────────────────────────
// NV Figures — Accessible Field
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Ellipsoid of vector magnetic field reachable by the magnet system.

use std::process;

use clap::Parser;
use tracing::error;

use nvfig_cli::{execute, figures, FigureArgs};

fn main() {
    nvfig_cli::init_logging();

    let args = FigureArgs::parse();
    if let Err(e) = execute(&args, figures::accessible_field()) {
        error!("accessible_field failed: {e}");
        process::exit(1);
    }
}
