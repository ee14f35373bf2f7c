// ─────────────────────────────────────────────────────────────────────
// NV Figures — Double Playback
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Re-time an animated GIF, by default to twice its speed.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin double_playback -- --input clip.gif --speed 2
//! ```

use std::process;

use clap::Parser;
use tracing::{error, info};

use nvfig_cli::figures::{run_playback, PlaybackArgs};

fn main() {
    nvfig_cli::init_logging();

    let args = PlaybackArgs::parse();
    match run_playback(&args) {
        Ok(report) => info!(
            "{} frames: {} ms -> {} ms",
            report.frames, report.duration_before_ms, report.duration_after_ms
        ),
        Err(e) => {
            error!("double_playback failed: {e}");
            process::exit(1);
        }
    }
}
