// src/ui/controls.rs

use super::Dashboard;
use crate::analysis::Colormap;
use crate::dashboard::plots::PlotMode;
use crate::model::Column;
use crate::state::AppState;
use gtk4::prelude::*;
use gtk4::{
  Align, Box as GtkBox, DropDown, Entry, Frame, Grid, Label, Orientation, PositionType, Scale,
  StringList,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

const NO_DATA: &str = "(none)";

/// Text of a min/max entry; blank or unparsable means "use the data".
pub fn parse_bound(text: &str) -> Option<f64> {
  let text = text.trim();
  if text.is_empty() {
    return None;
  }
  text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn bound_text(value: Option<f64>) -> String {
  value.map(|v| v.to_string()).unwrap_or_default()
}

fn labelled(grid: &Grid, row: i32, text: &str, widget: &impl IsA<gtk4::Widget>) {
  let label = Label::builder().label(text).halign(Align::Start).build();
  grid.attach(&label, 0, row, 1, 1);
  grid.attach(widget, 1, row, 1, 1);
}

fn string_model(items: &[&str]) -> StringList {
  StringList::new(items)
}

pub struct ControlWidgets {
  /// Data selection and color mapping, shown next to the viewer.
  pub color_box: Frame,
  /// Plot mode and bin count, shown next to the distribution plot.
  pub plot_box: Frame,

  pub data: DropDown,
  data_options: RefCell<Vec<Column>>,
  pub colormap: DropDown,
  colormaps: Vec<String>,
  pub cm_min: Entry,
  pub cm_max: Entry,
  pub nan_color: Entry,
  pub plot_mode: DropDown,
  plot_options: RefCell<Vec<PlotMode>>,
  pub bins: Scale,
}

impl ControlWidgets {
  pub fn new(state: &AppState) -> Self {
    // --- Color mapping ---
    let color_grid = Grid::builder()
      .column_spacing(10)
      .row_spacing(6)
      .margin_top(8)
      .margin_bottom(8)
      .margin_start(8)
      .margin_end(8)
      .build();

    let data = DropDown::from_strings(&[NO_DATA]);
    data.set_hexpand(true);
    labelled(&color_grid, 0, "Data:", &data);

    let colormaps = Colormap::names();
    let refs: Vec<&str> = colormaps.iter().map(String::as_str).collect();
    let colormap = DropDown::from_strings(&refs);
    labelled(&color_grid, 1, "Colormap:", &colormap);

    let bounds = GtkBox::new(Orientation::Horizontal, 6);
    let cm_min = Entry::builder().placeholder_text("min").width_chars(8).build();
    let cm_max = Entry::builder().placeholder_text("max").width_chars(8).build();
    bounds.append(&cm_min);
    bounds.append(&cm_max);
    labelled(&color_grid, 2, "Range:", &bounds);

    let nan_color = Entry::builder().placeholder_text("#000000").width_chars(8).build();
    labelled(&color_grid, 3, "NaN color:", &nan_color);

    let color_box = Frame::new(Some("Color mapping"));
    color_box.set_child(Some(&color_grid));

    // --- Plot ---
    let plot_grid = Grid::builder()
      .column_spacing(10)
      .row_spacing(6)
      .margin_top(8)
      .margin_bottom(8)
      .margin_start(8)
      .margin_end(8)
      .build();

    let plot_mode = DropDown::from_strings(&[PlotMode::Histogram.name()]);
    plot_mode.set_hexpand(true);
    labelled(&plot_grid, 0, "Plot:", &plot_mode);

    let (lo, hi) = state.config.bins_range;
    let bins = Scale::with_range(Orientation::Horizontal, lo as f64, hi as f64, 1.0);
    bins.set_digits(0);
    bins.set_draw_value(true);
    bins.set_value_pos(PositionType::Right);
    bins.set_hexpand(true);
    labelled(&plot_grid, 1, "Bins:", &bins);

    let plot_box = Frame::new(Some("Distribution"));
    plot_box.set_child(Some(&plot_grid));

    Self {
      color_box,
      plot_box,
      data,
      data_options: RefCell::new(Vec::new()),
      colormap,
      colormaps,
      cm_min,
      cm_max,
      nan_color,
      plot_mode,
      plot_options: RefCell::new(Vec::new()),
      bins,
    }
  }

  fn data_at(&self, position: u32) -> Option<Column> {
    let position = position as usize;
    if position == 0 {
      return None;
    }
    self.data_options.borrow().get(position - 1).copied()
  }

  fn plot_mode_at(&self, position: u32) -> PlotMode {
    self
      .plot_options
      .borrow()
      .get(position as usize)
      .copied()
      .unwrap_or(PlotMode::Histogram)
  }

  /// Fills every control from the state. Callers mute signals around this.
  pub fn sync(&self, state: &AppState) {
    let controls = &state.controls;

    // 1. Option lists returned by the last ingestion
    if *self.data_options.borrow() != state.options.data_options {
      let mut names = vec![NO_DATA];
      names.extend(state.options.data_options.iter().map(|c| c.name()));
      self.data.set_model(Some(&string_model(&names)));
      *self.data_options.borrow_mut() = state.options.data_options.clone();
    }
    if *self.plot_options.borrow() != state.options.plot_options {
      let names: Vec<&str> = state.options.plot_options.iter().map(|m| m.name()).collect();
      self.plot_mode.set_model(Some(&string_model(&names)));
      *self.plot_options.borrow_mut() = state.options.plot_options.clone();
    }

    // 2. Selections
    let data_pos = controls
      .selected_data
      .and_then(|c| self.data_options.borrow().iter().position(|o| *o == c))
      .map(|p| p + 1)
      .unwrap_or(0);
    self.data.set_selected(data_pos as u32);

    if let Some(p) = self.colormaps.iter().position(|n| *n == controls.colormap) {
      self.colormap.set_selected(p as u32);
    }
    if let Some(p) = self.plot_options.borrow().iter().position(|m| *m == controls.plot_mode) {
      self.plot_mode.set_selected(p as u32);
    }

    // 3. Free-text fields, left alone while they already agree
    if parse_bound(&self.cm_min.text()) != controls.cm_min {
      self.cm_min.set_text(&bound_text(controls.cm_min));
    }
    if parse_bound(&self.cm_max.text()) != controls.cm_max {
      self.cm_max.set_text(&bound_text(controls.cm_max));
    }
    let nan_text = controls.nan_color.clone().unwrap_or_default();
    if self.nan_color.text() != nan_text {
      self.nan_color.set_text(&nan_text);
    }

    self.bins.set_value(controls.nbins as f64);
  }
}

fn live(weak: &Weak<Dashboard>) -> Option<Rc<Dashboard>> {
  weak.upgrade().filter(|db| !db.is_updating())
}

/// Color controls only touch the structure view and the colorbar.
fn restyle(db: &Dashboard, update: impl FnOnce(&mut AppState)) {
  {
    let mut st = db.state.borrow_mut();
    update(&mut st);
    st.refresh_styles();
  }
  db.redraw_structure();
}

fn replot(db: &Dashboard, update: impl FnOnce(&mut AppState)) {
  {
    let mut st = db.state.borrow_mut();
    update(&mut st);
    st.refresh_plot();
  }
  db.redraw_plot();
}

pub fn connect(dashboard: &Rc<Dashboard>) {
  let c = &dashboard.controls;

  // 1. Data column drives both the colors and the plot
  let weak = Rc::downgrade(dashboard);
  c.data.connect_selected_notify(move |d| {
    let Some(db) = live(&weak) else { return };
    let column = db.controls.data_at(d.selected());
    {
      let mut st = db.state.borrow_mut();
      st.controls.selected_data = column;
      st.refresh_styles();
      st.refresh_plot();
    }
    db.redraw_structure();
    db.redraw_plot();
  });

  // 2. Colormap
  let weak = Rc::downgrade(dashboard);
  c.colormap.connect_selected_notify(move |d| {
    let Some(db) = live(&weak) else { return };
    let Some(name) = db.controls.colormaps.get(d.selected() as usize).cloned() else {
      return;
    };
    restyle(&db, |st| st.controls.colormap = name);
  });

  // 3. Range and NaN color
  let weak = Rc::downgrade(dashboard);
  c.cm_min.connect_changed(move |e| {
    let Some(db) = live(&weak) else { return };
    let value = parse_bound(&e.text());
    restyle(&db, |st| st.controls.cm_min = value);
  });

  let weak = Rc::downgrade(dashboard);
  c.cm_max.connect_changed(move |e| {
    let Some(db) = live(&weak) else { return };
    let value = parse_bound(&e.text());
    restyle(&db, |st| st.controls.cm_max = value);
  });

  let weak = Rc::downgrade(dashboard);
  c.nan_color.connect_changed(move |e| {
    let Some(db) = live(&weak) else { return };
    let text = e.text().trim().to_string();
    restyle(&db, |st| {
      st.controls.nan_color = if text.is_empty() { None } else { Some(text) }
    });
  });

  // 4. Plot mode and bins
  let weak = Rc::downgrade(dashboard);
  c.plot_mode.connect_selected_notify(move |d| {
    let Some(db) = live(&weak) else { return };
    let mode = db.controls.plot_mode_at(d.selected());
    replot(&db, |st| st.controls.plot_mode = mode);
  });

  let weak = Rc::downgrade(dashboard);
  c.bins.connect_value_changed(move |sc| {
    let Some(db) = live(&weak) else { return };
    let nbins = sc.value().round().max(1.0) as usize;
    if db.state.borrow().controls.nbins == nbins {
      return;
    }
    replot(&db, |st| st.controls.nbins = nbins);
  });
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bounds_parse_leniently() {
    assert_eq!(parse_bound(""), None);
    assert_eq!(parse_bound("   "), None);
    assert_eq!(parse_bound(" 1.5 "), Some(1.5));
    assert_eq!(parse_bound("-2"), Some(-2.0));
    assert_eq!(parse_bound("abc"), None);
    assert_eq!(parse_bound("inf"), None);
    assert_eq!(bound_text(None), "");
    assert_eq!(bound_text(Some(0.25)), "0.25");
  }
}
