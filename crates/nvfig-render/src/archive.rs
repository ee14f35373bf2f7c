// ─────────────────────────────────────────────────────────────────────
// NV Figures — Field Archive
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `.npz` archive of a sweep: the parameter values, the mesh axes and
//! every emitted field stacked as `[frame, y, x]`. Nothing is written
//! until `finish`.

use std::fs::File;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2, Array3};
use ndarray_npy::NpzWriter;
use nvfig_types::error::{FigureError, FigureResult};
use tracing::info;

use crate::animation::{FrameSink, SweepFrame};
use crate::error::{DrawResult, RenderError};
use crate::staging::StagedFile;

pub struct FieldArchive {
    path: PathBuf,
    parameters: Vec<f64>,
    axes: Option<(Array1<f64>, Array1<f64>)>,
    frames: Vec<Array2<f64>>,
}

impl FieldArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FieldArchive {
            path: path.into(),
            parameters: Vec::new(),
            axes: None,
            frames: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn stacked(&self) -> Array3<f64> {
        let (ny, nx) = self.frames.first().map(|f| f.dim()).unwrap_or((0, 0));
        Array3::from_shape_fn((self.frames.len(), ny, nx), |(k, i, j)| self.frames[k][[i, j]])
    }

    fn write(&self, path: &Path) -> DrawResult<()> {
        let file = File::create(path)
            .map_err(|e| RenderError(format!("cannot create {}: {e}", path.display())))?;
        let mut npz = NpzWriter::new(file);
        let (x, y) = self
            .axes
            .clone()
            .unwrap_or_else(|| (Array1::zeros(0), Array1::zeros(0)));
        npz.add_array("parameters", &Array1::from(self.parameters.clone()))?;
        npz.add_array("x", &x)?;
        npz.add_array("y", &y)?;
        npz.add_array("frames", &self.stacked())?;
        npz.finish()?;
        Ok(())
    }
}

impl FrameSink for FieldArchive {
    fn accept(&mut self, frame: &SweepFrame<'_>) -> FigureResult<()> {
        if self.axes.is_none() {
            self.axes = Some((frame.mesh.x.clone(), frame.mesh.y.clone()));
        }
        self.parameters.push(frame.parameter);
        self.frames.push(frame.field.clone());
        Ok(())
    }

    fn finish(&mut self) -> FigureResult<()> {
        if self.frames.is_empty() {
            return Err(FigureError::Data(format!(
                "no frames to archive in {}",
                self.path.display()
            )));
        }
        let staged = StagedFile::new(&self.path)?;
        self.write(staged.partial_path())?;
        staged.commit()?;
        info!(path = %self.path.display(), frames = self.frames.len(), "Field archive written");
        Ok(())
    }
}
