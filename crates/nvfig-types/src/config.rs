// ─────────────────────────────────────────────────────────────────────
// NV Figures — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::POINTS_PER_INCH;
use crate::error::{FigureError, FigureResult};

/// Colormaps recognised by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    Viridis,
    Plasma,
    Greys,
}

/// Output encoding, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Svg,
    Gif,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> FigureResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            "gif" => Ok(OutputFormat::Gif),
            other => Err(FigureError::Config(format!(
                "Unsupported output extension '{other}' for {}",
                path.display()
            ))),
        }
    }
}

/// Figure geometry and cosmetics shared by every renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureStyle {
    /// Figure width [in].
    pub width_in: f64,
    /// Figure height [in].
    pub height_in: f64,
    pub dpi: f64,
    #[serde(default = "default_colormap")]
    pub colormap: Colormap,
    /// Leave the background unpainted. Only vector output keeps an alpha
    /// channel; bitmap output is painted white regardless.
    #[serde(default)]
    pub transparent: bool,
}

fn default_colormap() -> Colormap {
    Colormap::Viridis
}

impl FigureStyle {
    pub fn new(width_in: f64, height_in: f64, dpi: f64) -> Self {
        FigureStyle {
            width_in,
            height_in,
            dpi,
            colormap: default_colormap(),
            transparent: false,
        }
    }

    pub fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.colormap = colormap;
        self
    }

    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }

    /// Canvas size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round().max(1.0) as u32,
            (self.height_in * self.dpi).round().max(1.0) as u32,
        )
    }

    /// Convert a font size in points to pixels at this DPI.
    pub fn font_px(&self, points: f64) -> f64 {
        points * self.dpi / POINTS_PER_INCH
    }

    /// Convert a line width in points to whole pixels (at least 1).
    pub fn line_px(&self, points: f64) -> u32 {
        (points * self.dpi / POINTS_PER_INCH).round().max(1.0) as u32
    }

    pub fn validate(&self) -> FigureResult<()> {
        for (name, v) in [
            ("width_in", self.width_in),
            ("height_in", self.height_in),
            ("dpi", self.dpi),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(FigureError::Config(format!(
                    "Figure {name} must be finite and > 0, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Axis bounds and resolution of an evaluation mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshSpec {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub nx: usize,
    pub ny: usize,
}

impl MeshSpec {
    pub fn square(min: f64, max: f64, n: usize) -> Self {
        MeshSpec {
            x: (min, max),
            y: (min, max),
            nx: n,
            ny: n,
        }
    }

    pub fn validate(&self) -> FigureResult<()> {
        if self.nx == 0 || self.ny == 0 {
            return Err(FigureError::Config(format!(
                "Mesh resolution must be >= 1, got {}x{}",
                self.nx, self.ny
            )));
        }
        let bounds = [self.x.0, self.x.1, self.y.0, self.y.1];
        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(FigureError::Config("Mesh bounds must be finite".to_string()));
        }
        Ok(())
    }
}

/// How sweep values are spaced between `start` and `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepSpacing {
    /// `linspace(start, end, n)`: both ends sampled.
    #[default]
    Inclusive,
    /// `start + (i / n)·(end − start)`: `end` itself is never reached.
    Exclusive,
}

/// An ordered parameter sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub start: f64,
    pub end: f64,
    pub frame_count: usize,
    #[serde(default)]
    pub spacing: SweepSpacing,
}

impl SweepConfig {
    pub fn new(start: f64, end: f64, frame_count: usize) -> Self {
        SweepConfig {
            start,
            end,
            frame_count,
            spacing: SweepSpacing::Inclusive,
        }
    }

    pub fn validate(&self) -> FigureResult<()> {
        if self.frame_count == 0 {
            return Err(FigureError::InvalidSweep(
                "frame_count must be >= 1".to_string(),
            ));
        }
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(FigureError::InvalidSweep(format!(
                "start/end must be finite, got {} -> {}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Camera orientation for 3D frames, in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewAngle {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}

/// What the sweep pipeline does with NaN/±Inf field samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingularityPolicy {
    /// Keep the samples; renderers leave those cells blank.
    #[default]
    Propagate,
    /// Drop the whole frame from the output sequence.
    SkipFrame,
    /// Clamp infinite and out-of-range samples into the z-limits. NaN stays NaN.
    ClampToLimits,
    /// Stop the sweep with `FigureError::NonFinite`.
    Abort,
}

/// Everything the sweep animation needs besides the field formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub output: String,
    /// Optional `.npz` archive of the sweep values and every evaluated frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    pub mesh: MeshSpec,
    pub sweep: SweepConfig,
    pub z_limits: (f64, f64),
    pub view: ViewAngle,
    pub fps: u32,
    pub style: FigureStyle,
    #[serde(default = "default_surface_alpha")]
    pub surface_alpha: f64,
    #[serde(default)]
    pub singularity: SingularityPolicy,
    pub labels: AxisLabels,
    /// Frame caption; `{value}` is replaced by the current sweep value.
    pub title: String,
}

fn default_surface_alpha() -> f64 {
    0.9
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
    pub z: String,
}

impl AxisLabels {
    pub fn new(x: &str, y: &str, z: &str) -> Self {
        AxisLabels {
            x: x.to_string(),
            y: y.to_string(),
            z: z.to_string(),
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> FigureResult<()> {
        self.mesh.validate()?;
        self.sweep.validate()?;
        self.style.validate()?;
        if self.fps == 0 {
            return Err(FigureError::Config("fps must be >= 1".to_string()));
        }
        let (z0, z1) = self.z_limits;
        if !(z0.is_finite() && z1.is_finite() && z0 < z1) {
            return Err(FigureError::Config(format!(
                "z_limits must be finite and increasing, got ({z0}, {z1})"
            )));
        }
        if !(0.0..=1.0).contains(&self.surface_alpha) {
            return Err(FigureError::Config(format!(
                "surface_alpha must lie in [0, 1], got {}",
                self.surface_alpha
            )));
        }
        Ok(())
    }

    /// Delay between frames [ms].
    pub fn frame_delay_ms(&self) -> u32 {
        (1000 / self.fps.max(1)).max(1)
    }

    pub fn caption(&self, value: f64) -> String {
        self.title.replace("{value}", &format!("{value:.2}"))
    }
}

/// Load any configuration document from a JSON file.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> FigureResult<T> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let config: T = serde_json::from_str(&contents)?;
    Ok(config)
}

/// Pretty-print any configuration document as JSON.
pub fn to_json<T: Serialize>(config: &T) -> FigureResult<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_animation() -> AnimationConfig {
        AnimationConfig {
            output: "sweep.gif".to_string(),
            archive: None,
            mesh: MeshSpec::square(-3.0, 3.0, 20),
            sweep: SweepConfig::new(2.0, -0.5, 10),
            z_limits: (-5.0, 20.0),
            view: ViewAngle {
                elevation_deg: 25.0,
                azimuth_deg: 45.0,
            },
            fps: 30,
            style: FigureStyle::new(8.0, 6.0, 100.0),
            surface_alpha: 0.9,
            singularity: SingularityPolicy::Propagate,
            labels: AxisLabels::new("X", "Y", "V(x,y)"),
            title: "Sombrero Potential (μ={value})".to_string(),
        }
    }

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(
            OutputFormat::from_path(Path::new("a/b/plot.PNG")).unwrap(),
            OutputFormat::Png
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("plot.svg")).unwrap(),
            OutputFormat::Svg
        );
        assert!(OutputFormat::from_path(Path::new("plot.jpg")).is_err());
        assert!(OutputFormat::from_path(Path::new("plot")).is_err());
    }

    #[test]
    fn test_pixel_size_and_fonts() {
        let style = FigureStyle::new(8.0, 6.0, 100.0);
        assert_eq!(style.pixel_size(), (800, 600));
        assert!((style.font_px(72.0) - 100.0).abs() < 1e-12);
        assert_eq!(style.line_px(0.1), 1);
    }

    #[test]
    fn test_sweep_validation() {
        assert!(SweepConfig::new(0.0, 1.0, 0).validate().is_err());
        assert!(SweepConfig::new(f64::NAN, 1.0, 3).validate().is_err());
        assert!(SweepConfig::new(1.0, 1.0, 1).validate().is_ok());
    }

    #[test]
    fn test_animation_validation() {
        let mut cfg = sample_animation();
        assert!(cfg.validate().is_ok());
        cfg.z_limits = (4.0, -3.0);
        assert!(cfg.validate().is_err());
        let mut cfg = sample_animation();
        cfg.fps = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_caption_and_delay() {
        let cfg = sample_animation();
        assert_eq!(cfg.caption(1.234), "Sombrero Potential (μ=1.23)");
        assert_eq!(cfg.frame_delay_ms(), 33);
    }

    #[test]
    fn test_roundtrip_serialization() {
        let cfg = sample_animation();
        let json = to_json(&cfg).unwrap();
        let cfg2: AnimationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg2.sweep.frame_count, 10);
        assert_eq!(cfg2.sweep.spacing, SweepSpacing::Inclusive);
        assert_eq!(cfg2.singularity, SingularityPolicy::Propagate);
        assert_eq!(cfg2.style.colormap, Colormap::Viridis);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let json = r#"{"start": 4.0, "end": -4.0, "frame_count": 2}"#;
        let sweep: SweepConfig = serde_json::from_str(json).unwrap();
        assert_eq!(sweep.spacing, SweepSpacing::Inclusive);
        let json = r#"{"width_in": 9.0, "height_in": 7.0, "dpi": 300.0}"#;
        let style: FigureStyle = serde_json::from_str(json).unwrap();
        assert!(!style.transparent);
        assert_eq!(style.colormap, Colormap::Viridis);
    }

    #[test]
    fn test_load_json_missing_file() {
        let result: FigureResult<SweepConfig> = load_json("/nonexistent/nvfig/sweep.json");
        assert!(matches!(result, Err(FigureError::Io(_))));
    }
}
