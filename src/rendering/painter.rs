// src/rendering/painter.rs

use super::primitives::{draw_atom_cap, draw_label, draw_stick};
use super::scene::Scene;
use crate::analysis::Rgb;
use crate::config::RenderStyle;
use crate::dashboard::styling::{StyleMap, DEFAULT_NAN_COLOR};
use crate::model::MolecularModel;
use crate::utils::geometry::midpoint;
use gtk4::cairo;
use std::cmp::Ordering;

const LABEL_FONT_SIZE: f64 = 11.0;

// ============================================================================
// HELPERS
// ============================================================================

fn atom_color(styles: &StyleMap, serial: usize) -> (f64, f64, f64) {
    styles
        .get(&serial)
        .and_then(|s| Rgb::from_hex(&s.color))
        .or_else(|| Rgb::from_hex(DEFAULT_NAN_COLOR))
        .unwrap_or(Rgb::BLACK)
        .to_f64()
}

enum Primitive {
    /// Half of a bond, colored like the atom it starts from.
    HalfBond {
        from: [f64; 3],
        to: [f64; 3],
        serial: usize,
    },
    Cap {
        serial: usize,
    },
}

// ============================================================================
// STICK MODEL
// ============================================================================

pub fn draw_background(cr: &cairo::Context, style: &RenderStyle) -> Result<(), cairo::Error> {
    let (r, g, b) = style.background_color;
    cr.set_source_rgb(r, g, b);
    cr.paint()
}

/// Draws bonds as two half-sticks and atoms as caps, back to front.
pub fn draw_structure(
    cr: &cairo::Context,
    scene: &Scene,
    model: &MolecularModel,
    styles: &StyleMap,
    style: &RenderStyle,
) -> Result<(), cairo::Error> {
    if scene.atoms.is_empty() {
        return Ok(());
    }

    // 1. Collect primitives with their depth
    let mut items: Vec<(f64, Primitive)> = Vec::with_capacity(model.bonds.len() * 2 + scene.atoms.len());
    for bond in &model.bonds {
        let (Some(a), Some(b)) = (scene.atoms.get(bond.atom1), scene.atoms.get(bond.atom2)) else {
            continue;
        };
        let mid = midpoint(a.screen_pos, b.screen_pos);
        for (start, serial) in [(a.screen_pos, a.serial), (b.screen_pos, b.serial)] {
            items.push((
                (start[2] + mid[2]) / 2.0,
                Primitive::HalfBond { from: start, to: mid, serial },
            ));
        }
    }
    for atom in &scene.atoms {
        items.push((atom.screen_pos[2], Primitive::Cap { serial: atom.serial }));
    }

    // 2. Painter's algorithm
    items.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let stick_px = (style.bond_radius * scene.scale).max(1.0);
    let cap_px = (style.atom_radius * scene.scale).max(stick_px);

    for (_, item) in &items {
        match item {
            Primitive::HalfBond { from, to, serial } => {
                draw_stick(
                    cr,
                    [from[0], from[1]],
                    [to[0], to[1]],
                    stick_px,
                    atom_color(styles, *serial),
                )?;
            }
            Primitive::Cap { serial } => {
                let p = scene.atoms[*serial].screen_pos;
                draw_atom_cap(cr, p[0], p[1], cap_px, atom_color(styles, *serial))?;
            }
        }
    }

    // 3. Labels on top
    if style.show_labels {
        for atom in &scene.atoms {
            let p = atom.screen_pos;
            draw_label(cr, p[0] + cap_px, p[1] - cap_px, &atom.label, LABEL_FONT_SIZE)?;
        }
    }
    Ok(())
}

pub fn draw_placeholder(cr: &cairo::Context, w: f64, h: f64, text: &str) -> Result<(), cairo::Error> {
    cr.set_source_rgb(0.5, 0.5, 0.5);
    cr.select_font_face("Sans", cairo::FontSlant::Italic, cairo::FontWeight::Normal);
    cr.set_font_size(14.0);
    let extents = cr.text_extents(text)?;
    cr.move_to((w - extents.width()) / 2.0, h / 2.0);
    cr.show_text(text)?;
    Ok(())
}
