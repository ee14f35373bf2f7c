// ─────────────────────────────────────────────────────────────────────
// NV Figures — Render Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Backend failures (plotters, image, npz) collapsed into one type and
//! surfaced to callers as `FigureError::Render`.

use nvfig_types::error::FigureError;
use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct RenderError(pub String);

pub type DrawResult<T> = Result<T, RenderError>;

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RenderError(e.to_string())
    }
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        RenderError(format!("image: {e}"))
    }
}

impl From<ndarray_npy::WriteNpzError> for RenderError {
    fn from(e: ndarray_npy::WriteNpzError) -> Self {
        RenderError(format!("npz: {e}"))
    }
}

impl From<RenderError> for FigureError {
    fn from(e: RenderError) -> Self {
        FigureError::Render(e.0)
    }
}
