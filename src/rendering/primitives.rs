// src/rendering/primitives.rs

use gtk4::cairo::{self, LinearGradient, RadialGradient};
use std::f64::consts::PI;

/// Shaded disc standing in for a sphere.
pub fn draw_atom_cap(
  cr: &cairo::Context,
  x: f64,
  y: f64,
  radius: f64,
  color: (f64, f64, f64),
) -> Result<(), cairo::Error> {
  let (r, g, b) = color;

  // Highlight offset to the top-left, shadow at the rim
  let gradient = RadialGradient::new(
    x - radius * 0.3,
    y - radius * 0.3,
    radius * 0.1,
    x,
    y,
    radius,
  );
  gradient.add_color_stop_rgb(0.0, 1.0, 1.0, 1.0);
  gradient.add_color_stop_rgb(0.2, (r + 0.2).min(1.0), (g + 0.2).min(1.0), (b + 0.2).min(1.0));
  gradient.add_color_stop_rgb(1.0, r * 0.6, g * 0.6, b * 0.6);

  cr.set_source(&gradient)?;
  cr.arc(x, y, radius, 0.0, 2.0 * PI);
  cr.fill()?;
  Ok(())
}

/// Flat-projected cylinder between two screen points, shaded across its width.
pub fn draw_stick(
  cr: &cairo::Context,
  p1: [f64; 2],
  p2: [f64; 2],
  radius: f64,
  color: (f64, f64, f64),
) -> Result<(), cairo::Error> {
  let dx = p2[0] - p1[0];
  let dy = p2[1] - p1[1];
  let len = (dx * dx + dy * dy).sqrt();
  if len < 0.01 {
    return Ok(());
  }
  let nx = -dy / len * radius;
  let ny = dx / len * radius;

  let (r, g, b) = color;
  let gradient = LinearGradient::new(p1[0] + nx, p1[1] + ny, p1[0] - nx, p1[1] - ny);
  gradient.add_color_stop_rgb(0.0, r * 0.45, g * 0.45, b * 0.45);
  gradient.add_color_stop_rgb(0.35, r, g, b);
  gradient.add_color_stop_rgb(0.5, (r + 0.25).min(1.0), (g + 0.25).min(1.0), (b + 0.25).min(1.0));
  gradient.add_color_stop_rgb(0.65, r, g, b);
  gradient.add_color_stop_rgb(1.0, r * 0.45, g * 0.45, b * 0.45);

  cr.set_source(&gradient)?;
  cr.move_to(p1[0] + nx, p1[1] + ny);
  cr.line_to(p2[0] + nx, p2[1] + ny);
  cr.line_to(p2[0] - nx, p2[1] - ny);
  cr.line_to(p1[0] - nx, p1[1] - ny);
  cr.close_path();
  cr.fill()?;
  Ok(())
}

pub fn draw_label(cr: &cairo::Context, x: f64, y: f64, text: &str, size: f64) -> Result<(), cairo::Error> {
  cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
  cr.set_font_size(size);
  // Light halo, dark text
  cr.move_to(x, y);
  cr.text_path(text);
  cr.set_source_rgba(1.0, 1.0, 1.0, 0.8);
  cr.set_line_width(2.5);
  cr.stroke_preserve()?;
  cr.set_source_rgb(0.1, 0.1, 0.1);
  cr.fill()?;
  Ok(())
}
