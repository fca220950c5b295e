// src/rendering/export.rs

use super::{charts, painter, scene};
use crate::error::{DashboardError, Result};
use crate::state::AppState;
use gtk4::cairo;
use plotters::prelude::IntoDrawingArea;
use plotters_cairo::CairoBackend;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
  Png,
  Pdf,
  Svg,
}

impl ImageFormat {
  pub fn from_path(path: &Path) -> Option<Self> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
      "png" => Some(ImageFormat::Png),
      "pdf" => Some(ImageFormat::Pdf),
      "svg" => Some(ImageFormat::Svg),
      _ => None,
    }
  }
}

/// Which panel of the dashboard to write out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Figure {
  Structure,
  Distribution,
  Colorbar,
}

fn render_err(e: impl std::fmt::Display) -> DashboardError {
  DashboardError::Render(e.to_string())
}

fn paint(cr: &cairo::Context, state: &AppState, figure: Figure, w: f64, h: f64) -> Result<()> {
  match figure {
    Figure::Structure => {
      painter::draw_background(cr, &state.config.style).map_err(render_err)?;
      let scene = scene::calculate_scene(&state.session.model, &state.view, w, h);
      painter::draw_structure(cr, &scene, &state.session.model, &state.styles, &state.config.style)
        .map_err(render_err)
    }
    Figure::Distribution | Figure::Colorbar => {
      let backend = CairoBackend::new(cr, (w as u32, h as u32)).map_err(render_err)?;
      let root = backend.into_drawing_area();
      let drawn = match figure {
        Figure::Colorbar => charts::draw_colorbar(&root, &state.colorbar),
        _ => charts::draw_plot(&root, &state.figure),
      };
      drawn.map_err(render_err)?;
      root.present().map_err(render_err)
    }
  }
}

/// Writes one panel to `path`; the format follows the file extension.
pub fn export_figure(state: &AppState, figure: Figure, path: &Path, width: u32, height: u32) -> Result<()> {
  let format = ImageFormat::from_path(path).ok_or_else(|| {
    DashboardError::Render(format!("unsupported image type: {}", path.display()))
  })?;
  let (w, h) = (width as f64, height as f64);

  match format {
    ImageFormat::Pdf => {
      let surface = cairo::PdfSurface::new(w, h, path).map_err(render_err)?;
      let cr = cairo::Context::new(&surface).map_err(render_err)?;
      paint(&cr, state, figure, w, h)?;
      surface.finish();
    }
    ImageFormat::Svg => {
      let surface = cairo::SvgSurface::new(w, h, Some(path)).map_err(render_err)?;
      let cr = cairo::Context::new(&surface).map_err(render_err)?;
      paint(&cr, state, figure, w, h)?;
      surface.finish();
    }
    ImageFormat::Png => {
      let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width as i32, height as i32)
        .map_err(render_err)?;
      {
        let cr = cairo::Context::new(&surface).map_err(render_err)?;
        paint(&cr, state, figure, w, h)?;
      }
      let mut file = std::fs::File::create(path)?;
      surface.write_to_png(&mut file).map_err(render_err)?;
    }
  }

  log::info!("{:?} exported to {}", figure, path.display());
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn format_from_extension() {
    assert_eq!(ImageFormat::from_path(Path::new("a.PNG")), Some(ImageFormat::Png));
    assert_eq!(ImageFormat::from_path(Path::new("plot.pdf")), Some(ImageFormat::Pdf));
    assert_eq!(ImageFormat::from_path(Path::new("plot.svg")), Some(ImageFormat::Svg));
    assert_eq!(ImageFormat::from_path(Path::new("plot.jpg")), None);
    assert_eq!(ImageFormat::from_path(Path::new("plot")), None);
  }
}
