// src/rendering/scene.rs

use crate::model::MolecularModel;
use crate::state::ViewState;
use crate::utils::geometry::rotate_xy;

/// An atom projected to the drawing area.
pub struct RenderAtom {
  pub screen_pos: [f64; 3], // x, y, z (depth)
  pub serial: usize,
  pub label: String,
}

pub struct Scene {
  /// Indexed by atom serial, not depth-sorted.
  pub atoms: Vec<RenderAtom>,
  /// Pixels per Angstrom.
  pub scale: f64,
}

impl Scene {
  /// Front-most atom within `radius` pixels of the pointer.
  pub fn pick(&self, x: f64, y: f64, radius: f64) -> Option<usize> {
    self
      .atoms
      .iter()
      .filter(|a| {
        let dx = a.screen_pos[0] - x;
        let dy = a.screen_pos[1] - y;
        dx * dx + dy * dy <= radius * radius
      })
      .max_by(|a, b| {
        a.screen_pos[2]
          .partial_cmp(&b.screen_pos[2])
          .unwrap_or(std::cmp::Ordering::Equal)
      })
      .map(|a| a.serial)
  }
}

pub fn calculate_scene(model: &MolecularModel, view: &ViewState, win_w: f64, win_h: f64) -> Scene {
  if model.atoms.is_empty() {
    return Scene {
      atoms: Vec::new(),
      scale: 1.0,
    };
  }

  // 1. Rotate about the centroid (degrees -> radians)
  let center = model.centroid();
  let (rx, ry) = (view.rot_x.to_radians(), view.rot_y.to_radians());

  let mut min_x = f64::MAX;
  let mut max_x = f64::MIN;
  let mut min_y = f64::MAX;
  let mut max_y = f64::MIN;

  let mut atoms: Vec<RenderAtom> = model
    .atoms
    .iter()
    .map(|a| {
      let local = [
        a.position[0] - center[0],
        a.position[1] - center[1],
        a.position[2] - center[2],
      ];
      let r = rotate_xy(local, rx, ry);
      min_x = min_x.min(r[0]);
      max_x = max_x.max(r[0]);
      min_y = min_y.min(r[1]);
      max_y = max_y.max(r[1]);
      RenderAtom {
        screen_pos: r,
        serial: a.serial,
        label: a.name.clone(),
      }
    })
    .collect();

  // 2. Fit to the window
  let model_w = (max_x - min_x).max(1.0);
  let model_h = (max_y - min_y).max(1.0);
  let margin = 0.8;
  let scale = ((win_w * margin) / model_w).min((win_h * margin) / model_h) * view.zoom;

  let box_cx = (min_x + max_x) / 2.0;
  let box_cy = (min_y + max_y) / 2.0;

  // 3. World -> pixel; screen y grows downwards
  for atom in &mut atoms {
    atom.screen_pos[0] = (atom.screen_pos[0] - box_cx) * scale + win_w / 2.0;
    atom.screen_pos[1] = win_h / 2.0 - (atom.screen_pos[1] - box_cy) * scale;
  }

  Scene { atoms, scale }
}
