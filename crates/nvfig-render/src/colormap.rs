// ─────────────────────────────────────────────────────────────────────
// NV Figures — Colormaps
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Perceptual colormaps as piecewise-linear anchor tables.

use nvfig_types::config::Colormap;
use plotters::style::RGBColor;

type Anchor = (u8, u8, u8);

const VIRIDIS: [Anchor; 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

const PLASMA: [Anchor; 9] = [
    (13, 8, 135),
    (75, 3, 161),
    (125, 3, 168),
    (168, 34, 150),
    (203, 70, 121),
    (229, 107, 93),
    (248, 148, 65),
    (253, 195, 40),
    (240, 249, 33),
];

const GREYS: [Anchor; 2] = [(255, 255, 255), (0, 0, 0)];

fn anchors(map: Colormap) -> &'static [Anchor] {
    match map {
        Colormap::Viridis => &VIRIDIS,
        Colormap::Plasma => &PLASMA,
        Colormap::Greys => &GREYS,
    }
}

/// Colour at `t` ∈ [0, 1]; out-of-range and NaN inputs are clamped.
pub fn sample(map: Colormap, t: f64) -> RGBColor {
    let table = anchors(map);
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let pos = t * (table.len() - 1) as f64;
    let i = (pos.floor() as usize).min(table.len() - 2);
    let f = pos - i as f64;
    let lerp = |a: u8, b: u8| (a as f64 + f * (b as f64 - a as f64)).round() as u8;
    let (a, b) = (table[i], table[i + 1]);
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Snap `t` to the centre of one of `levels` equal bands.
pub fn band(t: f64, levels: usize) -> f64 {
    let levels = levels.max(1) as f64;
    let k = (t.clamp(0.0, 1.0) * levels).floor().min(levels - 1.0);
    (k + 0.5) / levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_match_tables() {
        assert_eq!(sample(Colormap::Viridis, 0.0), RGBColor(68, 1, 84));
        assert_eq!(sample(Colormap::Viridis, 1.0), RGBColor(253, 231, 37));
        assert_eq!(sample(Colormap::Plasma, 1.0), RGBColor(240, 249, 33));
        assert_eq!(sample(Colormap::Greys, 0.0), RGBColor(255, 255, 255));
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(sample(Colormap::Plasma, -3.0), sample(Colormap::Plasma, 0.0));
        assert_eq!(sample(Colormap::Plasma, 7.0), sample(Colormap::Plasma, 1.0));
        assert_eq!(sample(Colormap::Greys, f64::NAN), RGBColor(255, 255, 255));
    }

    #[test]
    fn test_greys_midpoint() {
        assert_eq!(sample(Colormap::Greys, 0.5), RGBColor(128, 128, 128));
    }

    #[test]
    fn test_band_centres() {
        assert!((band(0.0, 30) - 1.0 / 60.0).abs() < 1e-12);
        assert!((band(1.0, 30) - 59.0 / 60.0).abs() < 1e-12);
        assert_eq!(band(0.49, 2), 0.25);
        assert_eq!(band(0.51, 2), 0.75);
    }
}
