// ─────────────────────────────────────────────────────────────────────
// NV Figures — GIF Playback Speed
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Re-time an existing animated GIF by dividing every frame delay.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder, Delay, Frame};
use nvfig_types::error::{FigureError, FigureResult};
use tracing::info;

use crate::error::{DrawResult, RenderError};
use crate::staging::StagedFile;

/// Delay assumed for frames that carry none.
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

/// New delay for a frame: ⌊delay / speed⌋, never below 1 ms.
pub fn retimed_delay_ms(delay_ms: u32, speed: f64) -> u32 {
    let base = if delay_ms == 0 {
        DEFAULT_FRAME_DELAY_MS
    } else {
        delay_ms
    };
    ((base as f64 / speed).floor() as u32).max(1)
}

/// `clip.gif` at speed 2 → `clipx2.gif` next to the input.
pub fn default_output(input: &Path, speed: f64) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "animation".to_string());
    let factor = if speed.fract() == 0.0 {
        format!("{}", speed as u64)
    } else {
        format!("{speed}")
    };
    input.with_file_name(format!("{stem}x{factor}.gif"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetimeReport {
    pub frames: usize,
    pub duration_before_ms: u64,
    pub duration_after_ms: u64,
}

/// Read `input`, divide every frame delay by `speed` and write an
/// infinitely looping GIF to `output`.
pub fn retime_gif(input: &Path, output: &Path, speed: f64) -> FigureResult<RetimeReport> {
    if !(speed.is_finite() && speed > 0.0) {
        return Err(FigureError::Config(format!(
            "speed must be finite and > 0, got {speed}"
        )));
    }
    let reader = BufReader::new(File::open(input)?);
    let frames = decode(reader)?;
    if frames.is_empty() {
        return Err(FigureError::Data(format!("{} has no frames", input.display())));
    }

    let mut report = RetimeReport {
        frames: frames.len(),
        duration_before_ms: 0,
        duration_after_ms: 0,
    };
    let retimed: Vec<Frame> = frames
        .into_iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let before = if denom == 0 { 0 } else { numer / denom };
            let after = retimed_delay_ms(before, speed);
            report.duration_before_ms += u64::from(if before == 0 {
                DEFAULT_FRAME_DELAY_MS
            } else {
                before
            });
            report.duration_after_ms += u64::from(after);
            let (left, top) = (frame.left(), frame.top());
            Frame::from_parts(
                frame.into_buffer(),
                left,
                top,
                Delay::from_numer_denom_ms(after, 1),
            )
        })
        .collect();

    let staged = StagedFile::new(output)?;
    encode(File::create(staged.partial_path())?, retimed)?;
    staged.commit()?;
    info!(
        input = %input.display(),
        output = %output.display(),
        frames = report.frames,
        speed,
        "GIF re-timed"
    );
    Ok(report)
}

fn decode(reader: BufReader<File>) -> DrawResult<Vec<Frame>> {
    let decoder = GifDecoder::new(reader)?;
    Ok(decoder.into_frames().collect_frames()?)
}

fn encode(file: File, frames: Vec<Frame>) -> DrawResult<()> {
    let mut encoder = GifEncoder::new(file);
    encoder.set_repeat(Repeat::Infinite)?;
    encoder
        .encode_frames(frames)
        .map_err(|e| RenderError(format!("GIF encode: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_retimed_delay_rules() {
        assert_eq!(retimed_delay_ms(100, 2.0), 50);
        assert_eq!(retimed_delay_ms(0, 2.0), 50);
        assert_eq!(retimed_delay_ms(35, 2.0), 17);
        assert_eq!(retimed_delay_ms(1, 2.0), 1);
        assert_eq!(retimed_delay_ms(30, 0.5), 60);
    }

    #[test]
    fn test_default_output_name() {
        let p = default_output(Path::new("img/Supplemental_Video_2.gif"), 2.0);
        assert_eq!(p, PathBuf::from("img/Supplemental_Video_2x2.gif"));
        let p = default_output(Path::new("a.gif"), 1.5);
        assert_eq!(p, PathBuf::from("ax1.5.gif"));
    }

    #[test]
    fn test_retime_gif_halves_delays() {
        let dir = std::env::temp_dir().join("nvfig_playback_test");
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("clip.gif");
        let output = dir.join("clipx2.gif");

        let frames: Vec<Frame> = [100u32, 0, 40]
            .iter()
            .enumerate()
            .map(|(i, &ms)| {
                let shade = 60 * i as u8;
                let img = RgbaImage::from_pixel(4, 4, Rgba([shade, 0, 255 - shade, 255]));
                Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(ms, 1))
            })
            .collect();
        encode(File::create(&input).unwrap(), frames).unwrap();

        let report = retime_gif(&input, &output, 2.0).unwrap();
        assert_eq!(report.frames, 3);
        assert_eq!(report.duration_before_ms, 240);
        assert_eq!(report.duration_after_ms, 120);

        let out = decode(BufReader::new(File::open(&output).unwrap())).unwrap();
        let delays: Vec<u32> = out
            .iter()
            .map(|f| {
                let (n, d) = f.delay().numer_denom_ms();
                n / d
            })
            .collect();
        assert_eq!(delays, vec![50, 50, 20]);
    }

    #[test]
    fn test_invalid_speed_rejected() {
        let p = Path::new("missing.gif");
        assert!(matches!(
            retime_gif(p, p, 0.0),
            Err(FigureError::Config(_))
        ));
        assert!(matches!(retime_gif(p, p, 2.0), Err(FigureError::Io(_))));
    }
}
