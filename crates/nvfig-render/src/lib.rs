//! Rendering layer for NV Figures.
//!
//! - [`animation`]: sweep pipeline and the `FrameSink` seam
//! - [`surface`], [`archive`]: GIF surface frames and npz field archives
//! - [`figure`]: static figure trait and PNG/SVG export
//! - [`heatmap`], [`lines`], [`scales`]: the static figures
//! - [`playback`]: GIF re-timing
//! - [`staging`]: outputs renamed into place only on success

pub mod animation;
pub mod archive;
pub mod colormap;
pub mod error;
pub mod figure;
pub mod heatmap;
pub mod lines;
pub mod playback;
pub mod scales;
pub mod staging;
pub mod surface;
