// ─────────────────────────────────────────────────────────────────────
// NV Figures — Staged Output Files
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Output files are written under a hidden sibling name and renamed onto
//! the target only on `commit`. Dropping an uncommitted file removes the
//! partial output, so a failed run leaves nothing at the target path.

use std::fs;
use std::path::{Path, PathBuf};

use nvfig_types::error::{FigureError, FigureResult};
use tracing::debug;

use crate::figure::ensure_parent_dir;

const PARTIAL_PREFIX: &str = ".partial-";

#[derive(Debug)]
pub struct StagedFile {
    target: PathBuf,
    partial: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Stage `target`; the parent directory is created if needed.
    ///
    /// The partial name keeps the target's extension, so backends that
    /// pick an encoder from the extension behave the same.
    pub fn new(target: impl Into<PathBuf>) -> FigureResult<Self> {
        let target = target.into();
        let name = target
            .file_name()
            .ok_or_else(|| {
                FigureError::Config(format!("{} has no file name", target.display()))
            })?
            .to_string_lossy()
            .into_owned();
        ensure_parent_dir(&target)?;
        let partial = target.with_file_name(format!("{PARTIAL_PREFIX}{name}"));
        Ok(StagedFile {
            target,
            partial,
            committed: false,
        })
    }

    /// Where backends should write.
    pub fn partial_path(&self) -> &Path {
        &self.partial
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Move the finished file onto the target.
    pub fn commit(mut self) -> FigureResult<PathBuf> {
        fs::rename(&self.partial, &self.target)?;
        self.committed = true;
        Ok(self.target.clone())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed && self.partial.exists() {
            debug!(path = %self.partial.display(), "Removing partial output");
            let _ = fs::remove_file(&self.partial);
        }
    }
}
