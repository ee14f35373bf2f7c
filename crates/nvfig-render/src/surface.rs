// ─────────────────────────────────────────────────────────────────────
// NV Figures — 3D Surfaces
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Shaded 3D surfaces: animated sweep frames and the accessible-field
//! ellipsoid.
//!
//! Data coordinates are (x, y, z) with z vertical. Plotters' 3D charts
//! treat their second axis as vertical, so points are handed over as
//! (x, z, y).

use std::cmp::Reverse;

use ndarray::Array2;
use nvfig_physics::ellipsoid::{AccessibleField, LatitudeRing};
use nvfig_types::config::{AnimationConfig, AxisLabels, Colormap, FigureStyle, ViewAngle};
use nvfig_types::error::{FigureError, FigureResult};
use nvfig_types::state::{AxisLimits, Mesh2D};
use plotters::coord::ranged3d::Cartesian3d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::animation::{FrameSink, SweepFrame};
use crate::colormap;
use crate::error::{DrawResult, RenderError};
use crate::figure::{font, Figure};
use crate::staging::StagedFile;

type Point3 = (f64, f64, f64);

/// One quadrilateral patch of a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceCell {
    pub corners: [Point3; 4],
    /// Mean height, used for colouring.
    pub level: f64,
}

impl SurfaceCell {
    fn centroid(&self) -> Point3 {
        let mut c = (0.0, 0.0, 0.0);
        for p in &self.corners {
            c.0 += 0.25 * p.0;
            c.1 += 0.25 * p.1;
            c.2 += 0.25 * p.2;
        }
        c
    }
}

/// Cells of a height field over a mesh.
///
/// A cell is dropped if any corner is non-finite or lies outside the
/// z-limits, so the fixed axes are never overdrawn.
pub fn mesh_cells(mesh: &Mesh2D, field: &Array2<f64>, limits: &AxisLimits) -> Vec<SurfaceCell> {
    let (ny, nx) = field.dim();
    let mut cells = Vec::with_capacity(nx.saturating_sub(1) * ny.saturating_sub(1));
    for iy in 0..ny.saturating_sub(1) {
        for ix in 0..nx.saturating_sub(1) {
            let idx = [(iy, ix), (iy, ix + 1), (iy + 1, ix + 1), (iy + 1, ix)];
            let z: Vec<f64> = idx.iter().map(|&(r, c)| field[[r, c]]).collect();
            if z.iter().any(|v| !v.is_finite() || !limits.contains_z(*v)) {
                continue;
            }
            let corner = |k: usize| {
                let (r, c) = idx[k];
                (mesh.x[c], mesh.y[r], z[k])
            };
            cells.push(SurfaceCell {
                corners: [corner(0), corner(1), corner(2), corner(3)],
                level: z.iter().sum::<f64>() / 4.0,
            });
        }
    }
    cells
}

/// Cells of a parametric surface given as three coordinate grids.
pub fn parametric_cells(x: &Array2<f64>, y: &Array2<f64>, z: &Array2<f64>) -> Vec<SurfaceCell> {
    let (nu, nv) = x.dim();
    let mut cells = Vec::new();
    for i in 0..nu.saturating_sub(1) {
        for j in 0..nv.saturating_sub(1) {
            let idx = [(i, j), (i, j + 1), (i + 1, j + 1), (i + 1, j)];
            let p = |k: usize| {
                let rc = idx[k];
                (x[rc], y[rc], z[rc])
            };
            let corners = [p(0), p(1), p(2), p(3)];
            let level = corners.iter().map(|c| c.2).sum::<f64>() / 4.0;
            cells.push(SurfaceCell { corners, level });
        }
    }
    cells
}

/// 3D chart over (x, z, y) in data terms.
pub type SurfaceChart<'a, DB> =
    ChartContext<'a, DB, Cartesian3d<RangedCoordf64, RangedCoordf64, RangedCoordf64>>;

/// Chart spanning `limits`, seen from `view`. An empty caption adds no title.
pub fn surface_chart<'a, DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    limits: &AxisLimits,
    view: &ViewAngle,
    style: &FigureStyle,
    caption: &str,
) -> DrawResult<SurfaceChart<'a, DB>> {
    let mut builder = ChartBuilder::on(area);
    builder.margin(style.font_px(8.0) as u32);
    if !caption.is_empty() {
        builder.caption(caption, font(style, 14.0));
    }
    let mut chart = builder.build_cartesian_3d(
        limits.x.0..limits.x.1,
        limits.z.0..limits.z.1,
        limits.y.0..limits.y.1,
    )?;
    let view = *view;
    chart.with_projection(|mut pb| {
        pb.pitch = view.elevation_deg.to_radians();
        pb.yaw = view.azimuth_deg.to_radians();
        pb.scale = 0.8;
        pb.into_matrix()
    });
    Ok(chart)
}

/// Distance of a cell's centroid from the screen in `chart`'s projection.
/// Larger is farther.
pub fn cell_depth<DB: DrawingBackend>(chart: &SurfaceChart<'_, DB>, cell: &SurfaceCell) -> i32 {
    let (x, y, z) = cell.centroid();
    chart.as_coord_spec().projected_depth(&x, &z, &y)
}

/// Sort cells back to front for painter's-algorithm drawing.
///
/// Plotters fills polygons in submission order, so the farthest cell
/// must come first.
pub fn paint_order<DB: DrawingBackend>(cells: &mut [SurfaceCell], chart: &SurfaceChart<'_, DB>) {
    cells.sort_by_cached_key(|c| Reverse(cell_depth(chart, c)));
}

/// Everything needed to draw one shaded 3D surface.
#[derive(Debug, Clone)]
pub struct SurfacePlot {
    pub cells: Vec<SurfaceCell>,
    pub limits: AxisLimits,
    pub view: ViewAngle,
    pub colormap: Colormap,
    pub alpha: f64,
    pub labels: AxisLabels,
    pub caption: String,
    /// Red polylines drawn on top of the surface.
    pub overlays: Vec<Vec<Point3>>,
}

impl SurfacePlot {
    /// Blank axis labels also drop the axes and their tick text.
    fn has_axes(&self) -> bool {
        let l = &self.labels;
        !(l.x.is_empty() && l.y.is_empty() && l.z.is_empty())
    }

    pub fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        style: &FigureStyle,
    ) -> DrawResult<()> {
        let lim = &self.limits;
        let mut chart = surface_chart(area, lim, &self.view, style, &self.caption)?;

        if self.has_axes() {
            chart
                .configure_axes()
                .label_style(font(style, 9.0))
                .light_grid_style(BLACK.mix(0.1))
                .max_light_lines(3)
                .draw()?;
        }

        let mut cells = self.cells.clone();
        paint_order(&mut cells, &chart);
        chart.draw_series(cells.iter().map(|cell| {
            let color = colormap::sample(self.colormap, lim.z_fraction(cell.level));
            Polygon::new(
                cell.corners.iter().map(|&(x, y, z)| (x, z, y)).collect::<Vec<_>>(),
                color.mix(self.alpha).filled(),
            )
        }))?;

        for line in &self.overlays {
            chart.draw_series(LineSeries::new(
                line.iter().map(|&(x, y, z)| (x, z, y)),
                RED.stroke_width(style.line_px(3.0)),
            ))?;
        }

        if self.has_axes() {
            let label = font(style, 12.0);
            let x_mid = 0.5 * (lim.x.0 + lim.x.1);
            let y_mid = 0.5 * (lim.y.0 + lim.y.1);
            chart.draw_series([
                Text::new(self.labels.x.clone(), (x_mid, lim.z.0, lim.y.1), label.clone()),
                Text::new(self.labels.y.clone(), (lim.x.1, lim.z.0, y_mid), label.clone()),
                Text::new(self.labels.z.clone(), (lim.x.0, lim.z.1, lim.y.1), label),
            ])?;
        }
        Ok(())
    }
}

/// Renders every sweep frame as a surface into an animated GIF.
///
/// Frames go to a staged file that only replaces `output` in `finish`.
pub struct SurfaceGifSink {
    root: Option<DrawingArea<BitMapBackend<'static>, Shift>>,
    staged: Option<StagedFile>,
    config: AnimationConfig,
    frames: usize,
}

impl SurfaceGifSink {
    pub fn create(config: &AnimationConfig) -> FigureResult<Self> {
        config.validate()?;
        let staged = StagedFile::new(&config.output)?;
        let size = config.style.pixel_size();
        let backend = BitMapBackend::gif(staged.partial_path(), size, config.frame_delay_ms())
            .map_err(|e| {
                RenderError(format!("cannot open {}: {e}", staged.partial_path().display()))
            })?;
        info!(
            path = %staged.target().display(),
            width = size.0,
            height = size.1,
            delay_ms = config.frame_delay_ms(),
            "GIF sink opened"
        );
        Ok(SurfaceGifSink {
            root: Some(backend.into_drawing_area()),
            staged: Some(staged),
            config: config.clone(),
            frames: 0,
        })
    }

    pub fn frames_written(&self) -> usize {
        self.frames
    }

    fn plot(&self, frame: &SweepFrame<'_>) -> SurfacePlot {
        SurfacePlot {
            cells: mesh_cells(frame.mesh, frame.field, frame.limits),
            limits: *frame.limits,
            view: self.config.view,
            colormap: self.config.style.colormap,
            alpha: self.config.surface_alpha,
            labels: self.config.labels.clone(),
            caption: self.config.caption(frame.parameter),
            overlays: Vec::new(),
        }
    }

    fn render(&self, frame: &SweepFrame<'_>) -> DrawResult<()> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| RenderError("GIF sink already finished".to_string()))?;
        root.fill(&WHITE)?;
        self.plot(frame).draw(root, &self.config.style)?;
        root.present()?;
        Ok(())
    }
}

impl FrameSink for SurfaceGifSink {
    fn accept(&mut self, frame: &SweepFrame<'_>) -> FigureResult<()> {
        self.render(frame)?;
        self.frames += 1;
        debug!(index = frame.index, "GIF frame rendered");
        Ok(())
    }

    fn finish(&mut self) -> FigureResult<()> {
        // Dropping the backend closes the GIF stream.
        if self.root.take().is_none() {
            return Err(FigureError::Render("GIF sink finished twice".to_string()));
        }
        if self.frames == 0 {
            return Err(FigureError::Render("GIF sink received no frames".to_string()));
        }
        let staged = self
            .staged
            .take()
            .ok_or_else(|| FigureError::Render("GIF sink has no staged output".to_string()))?;
        let path = staged.commit()?;
        info!(path = %path.display(), frames = self.frames, "GIF written");
        Ok(())
    }
}

/// Options of the accessible-field figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessibleFieldConfig {
    pub output: String,
    pub field: AccessibleField,
    pub nu: usize,
    pub nv: usize,
    pub view: ViewAngle,
    pub alpha: f64,
    pub style: FigureStyle,
    pub labels: AxisLabels,
    pub title: String,
    /// Draw rings at ±`ring_angle_deg` from the vertical.
    #[serde(default)]
    pub show_rings: bool,
    pub ring_angle_deg: f64,
    pub ring_scale: f64,
}

pub struct AccessibleFieldFigure {
    style: FigureStyle,
    plot: SurfacePlot,
}

impl AccessibleFieldFigure {
    pub fn new(config: &AccessibleFieldConfig) -> FigureResult<Self> {
        if config.nu < 2 || config.nv < 2 {
            return Err(FigureError::Config(format!(
                "ellipsoid needs at least 2x2 samples, got {}x{}",
                config.nu, config.nv
            )));
        }
        let surface = config.field.surface(config.nu, config.nv);
        let limits = AccessibleField::equal_axis_limits(&surface);
        let mut overlays = Vec::new();
        if config.show_rings {
            let ring: LatitudeRing = config.field.ring(config.ring_angle_deg, config.ring_scale, 200);
            overlays.push(ring.mirrored());
            overlays.push(ring.points);
        }
        Ok(AccessibleFieldFigure {
            style: config.style.clone(),
            plot: SurfacePlot {
                cells: parametric_cells(&surface.x, &surface.y, &surface.z),
                limits,
                view: config.view,
                colormap: config.style.colormap,
                alpha: config.alpha,
                labels: config.labels.clone(),
                caption: config.title.clone(),
                overlays,
            },
        })
    }

    pub fn plot(&self) -> &SurfacePlot {
        &self.plot
    }
}

impl Figure for AccessibleFieldFigure {
    fn style(&self) -> &FigureStyle {
        &self.style
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult<()> {
        self.plot.draw(root, &self.style)
    }
}
