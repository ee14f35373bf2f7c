// ─────────────────────────────────────────────────────────────────────
// NV Figures — Playback Program
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::path::PathBuf;

use clap::Parser;
use nvfig_render::playback::{default_output, retime_gif, RetimeReport};
use nvfig_types::error::FigureResult;

/// Speed up an animated GIF by dividing every frame delay
#[derive(Parser, Debug)]
#[command(name = "double_playback")]
pub struct PlaybackArgs {
    /// GIF to re-time
    #[arg(short, long, default_value = "Supplemental_Video_2.gif")]
    pub input: PathBuf,

    /// Output GIF (default: `<input>x<speed>.gif`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Playback speed factor
    #[arg(short, long, default_value_t = 2.0)]
    pub speed: f64,
}

pub fn run_playback(args: &PlaybackArgs) -> FigureResult<RetimeReport> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input, args.speed));
    retime_gif(&args.input, &output, args.speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = PlaybackArgs::parse_from(["double_playback"]);
        assert_eq!(args.input, PathBuf::from("Supplemental_Video_2.gif"));
        assert_eq!(args.speed, 2.0);
        assert_eq!(
            default_output(&args.input, args.speed),
            PathBuf::from("Supplemental_Video_2x2.gif")
        );
    }

    #[test]
    fn test_missing_input_fails() {
        let args = PlaybackArgs::parse_from(["double_playback", "-i", "no/such.gif", "-s", "3"]);
        assert!(run_playback(&args).is_err());
    }
}
