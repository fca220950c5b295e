// src/ui/mod.rs

pub mod controls;
pub mod docs;
pub mod interactions;
pub mod table_panel;

use crate::dashboard::plots::STATS_HEADER;
use crate::dashboard::upload::{IngestEvent, IngestOutcome};
use crate::model::Column;
use crate::physics::CurvatureAnalyzer;
use crate::rendering::{charts, painter, scene};
use crate::state::AppState;
use controls::ControlWidgets;
use gtk4::prelude::*;
use gtk4::{Align, DrawingArea, Grid, Label};
use plotters::prelude::IntoDrawingArea;
use plotters_cairo::CairoBackend;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use table_panel::TablePanel;

/// Widgets of the dashboard plus the shared session state.
///
/// Signal handlers hold a `Weak<Dashboard>` and go through [`Dashboard::refresh`]
/// or one of the narrower redraws after mutating the state.
pub struct Dashboard {
  pub state: Rc<RefCell<AppState>>,
  pub viewer: DrawingArea,
  pub colorbar: DrawingArea,
  pub plot: DrawingArea,
  pub stats: Grid,
  pub table: TablePanel,
  pub controls: ControlWidgets,
  /// Set while widgets are filled from the state, so their signals are ignored.
  updating: Cell<bool>,
  me: Weak<Dashboard>,
}

impl Dashboard {
  pub fn new(state: Rc<RefCell<AppState>>) -> Rc<Self> {
    let viewer = DrawingArea::new();
    viewer.set_hexpand(true);
    viewer.set_vexpand(true);
    viewer.set_size_request(420, 360);

    let colorbar = DrawingArea::new();
    colorbar.set_hexpand(true);
    colorbar.set_content_height(80);

    let plot = DrawingArea::new();
    plot.set_hexpand(true);
    plot.set_vexpand(true);
    plot.set_size_request(420, 320);

    let stats = Grid::builder().column_spacing(12).row_spacing(4).build();

    let (controls, table) = {
      let st = state.borrow();
      (ControlWidgets::new(&st), TablePanel::new(&Column::ALL))
    };

    let dashboard = Rc::new_cyclic(|me| Self {
      state,
      viewer,
      colorbar,
      plot,
      stats,
      table,
      controls,
      updating: Cell::new(false),
      me: me.clone(),
    });

    dashboard.install_draw_funcs();
    controls::connect(&dashboard);
    table_panel::connect(&dashboard);
    interactions::setup(&dashboard);
    dashboard
  }

  pub fn is_updating(&self) -> bool {
    self.updating.get()
  }

  /// Runs `f` with widget signals muted.
  pub fn quietly(&self, f: impl FnOnce()) {
    let was = self.updating.replace(true);
    f();
    self.updating.set(was);
  }

  fn install_draw_funcs(&self) {
    let s = self.state.clone();
    self.viewer.set_draw_func(move |_, cr, w, h| {
      let st = s.borrow();
      let (w, h) = (w as f64, h as f64);
      if let Err(e) = painter::draw_background(cr, &st.config.style) {
        log::error!("Viewer background failed: {}", e);
        return;
      }
      let result = if st.session.model.atoms.is_empty() {
        painter::draw_placeholder(cr, w, h, "No structure loaded")
      } else {
        let scene = scene::calculate_scene(&st.session.model, &st.view, w, h);
        painter::draw_structure(cr, &scene, &st.session.model, &st.styles, &st.config.style)
      };
      if let Err(e) = result {
        log::error!("Structure drawing failed: {}", e);
      }
    });

    let s = self.state.clone();
    self.colorbar.set_draw_func(move |_, cr, w, h| {
      let st = s.borrow();
      let drawn = CairoBackend::new(cr, (w as u32, h as u32))
        .map_err(|e| e.to_string())
        .and_then(|backend| {
          let root = backend.into_drawing_area();
          charts::draw_colorbar(&root, &st.colorbar).map_err(|e| e.to_string())?;
          root.present().map_err(|e| e.to_string())
        });
      if let Err(e) = drawn {
        log::error!("Colorbar drawing failed: {}", e);
      }
    });

    let s = self.state.clone();
    self.plot.set_draw_func(move |_, cr, w, h| {
      let st = s.borrow();
      let drawn = CairoBackend::new(cr, (w as u32, h as u32))
        .map_err(|e| e.to_string())
        .and_then(|backend| {
          let root = backend.into_drawing_area();
          charts::draw_plot(&root, &st.figure).map_err(|e| e.to_string())?;
          root.present().map_err(|e| e.to_string())
        });
      if let Err(e) = drawn {
        log::error!("Plot drawing failed: {}", e);
      }
    });
  }

  /// Runs one ingestion cycle with the configured bond criteria.
  pub fn ingest(&self, event: IngestEvent) {
    let outcome = {
      let mut st = self.state.borrow_mut();
      let analyzer = CurvatureAnalyzer::new(st.config.bond_criteria());
      st.ingest(event, &analyzer);
      st.options.outcome.clone()
    };
    match outcome {
      IngestOutcome::Kept(reason) if !reason.is_empty() => {
        log::warn!("Update rejected, keeping the current data: {}", reason)
      }
      IngestOutcome::FellBack(reason) => {
        log::warn!("Update rejected, showing the default structure: {}", reason)
      }
      _ => {}
    }
    self.refresh();
  }

  /// Pushes the whole state back into the widgets.
  pub fn refresh(&self) {
    self.quietly(|| {
      let st = self.state.borrow();
      self.controls.sync(&st);
      self.table.sync_checks(&st.session.table_selection);
    });
    self.refresh_table();
    self.redraw_structure();
    self.redraw_plot();
  }

  pub fn refresh_table(&self) {
    let cells = self.table.rebuild(&self.state.borrow().table);
    table_panel::connect_cells(&self.me, cells);
  }

  /// Viewer and colorbar.
  pub fn redraw_structure(&self) {
    self.viewer.queue_draw();
    self.colorbar.queue_draw();
  }

  /// Distribution plot and its statistics table.
  pub fn redraw_plot(&self) {
    self.plot.queue_draw();
    self.fill_stats();
  }

  fn fill_stats(&self) {
    while let Some(child) = self.stats.first_child() {
      self.stats.remove(&child);
    }
    let st = self.state.borrow();
    if st.stats.is_empty() {
      return;
    }
    for (col, title) in STATS_HEADER.iter().enumerate() {
      let label = Label::new(None);
      label.set_markup(&format!("<b>{}</b>", title));
      label.set_halign(Align::End);
      self.stats.attach(&label, col as i32, 0, 1, 1);
    }
    for (row, stats_row) in st.stats.rows.iter().enumerate() {
      for (col, text) in stats_row.cells().iter().enumerate() {
        let label = Label::new(Some(text.as_str()));
        label.set_halign(Align::End);
        label.set_selectable(true);
        self.stats.attach(&label, col as i32, row as i32 + 1, 1, 1);
      }
    }
  }
}
