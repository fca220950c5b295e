// src/ui/interactions.rs

use super::Dashboard;
use crate::model::{AtomRecord, Column};
use crate::rendering::scene;
use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{EventControllerScroll, EventControllerScrollFlags, GestureClick, GestureDrag};
use std::cell::Cell;
use std::rc::Rc;

/// Degrees of rotation per dragged pixel.
const DRAG_SENSITIVITY: f64 = 0.5;
const ZOOM_RANGE: (f64, f64) = (0.1, 10.0);
/// How far from an atom center a click still selects it, in pixels.
const PICK_RADIUS: f64 = 15.0;

/// Console text printed when an atom is clicked.
pub fn atom_report(record: &AtomRecord) -> String {
  let mut out = format!("Atom {} ({})", record.atom_idx, record.species);
  for column in Column::scalar_columns() {
    if let Some(v) = record.scalar(column) {
      if !v.is_nan() {
        out.push_str(&format!("\n  {:<20} {:.4}", column.name(), v));
      }
    }
  }
  out
}

pub fn setup(dashboard: &Rc<Dashboard>) {
  let viewer = &dashboard.viewer;

  // 1. DRAG (ROTATE)
  let drag = GestureDrag::new();
  let start = Rc::new(Cell::new((0.0, 0.0)));

  let weak = Rc::downgrade(dashboard);
  let s = start.clone();
  drag.connect_drag_begin(move |_, _, _| {
    let Some(db) = weak.upgrade() else { return };
    let view = db.state.borrow().view;
    s.set((view.rot_x, view.rot_y));
  });

  let weak = Rc::downgrade(dashboard);
  drag.connect_drag_update(move |_, dx, dy| {
    let Some(db) = weak.upgrade() else { return };
    let (rot_x, rot_y) = start.get();
    {
      let mut st = db.state.borrow_mut();
      st.view.rot_x = rot_x + dy * DRAG_SENSITIVITY;
      st.view.rot_y = rot_y + dx * DRAG_SENSITIVITY;
    }
    db.viewer.queue_draw();
  });
  viewer.add_controller(drag);

  // 2. SCROLL (ZOOM)
  let scroll = EventControllerScroll::new(EventControllerScrollFlags::VERTICAL);
  let weak = Rc::downgrade(dashboard);
  scroll.connect_scroll(move |_, _, dy| {
    let Some(db) = weak.upgrade() else {
      return glib::Propagation::Proceed;
    };
    {
      let mut st = db.state.borrow_mut();
      let factor = if dy > 0.0 { 0.9 } else { 1.1 };
      st.view.zoom = (st.view.zoom * factor).clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
    }
    db.viewer.queue_draw();
    glib::Propagation::Stop
  });
  viewer.add_controller(scroll);

  // 3. CLICK (INSPECT)
  let click = GestureClick::new();
  let weak = Rc::downgrade(dashboard);
  click.connect_released(move |gesture, n_press, x, y| {
    if n_press != 1 {
      return;
    }
    let Some(db) = weak.upgrade() else { return };
    let widget = gesture.widget();
    let (w, h) = (widget.width() as f64, widget.height() as f64);

    let st = db.state.borrow();
    let scene = scene::calculate_scene(&st.session.model, &st.view, w, h);
    let Some(serial) = scene.pick(x, y, PICK_RADIUS) else {
      return;
    };
    match st.session.records.as_ref().and_then(|r| r.rows().get(serial)) {
      Some(record) => log::info!("{}", atom_report(record)),
      None => log::debug!("Picked atom {} has no record", serial),
    }
  });
  viewer.add_controller(click);
}
