// src/ui/table_panel.rs

use super::Dashboard;
use crate::dashboard::table::TableView;
use crate::dashboard::upload::IngestEvent;
use crate::model::Column;
use gtk4::prelude::*;
use gtk4::{
  glib, Align, Box as GtkBox, CheckButton, Entry, EventControllerFocus, FlowBox, Grid, Label,
  Orientation, PolicyType, ScrolledWindow, SelectionMode,
};
use std::rc::{Rc, Weak};

/// Column pickers above a grid of cells; only `custom` cells are entries.
pub struct TablePanel {
  pub root: GtkBox,
  checks: Vec<(Column, CheckButton)>,
  grid: Grid,
}

/// New selection after one checkbox changed; keeps the order columns were picked in.
pub fn toggle_column(selection: &[Column], column: Column, active: bool) -> Vec<Column> {
  let mut out: Vec<Column> = selection.iter().copied().filter(|c| *c != column).collect();
  if active {
    out.push(column);
  }
  out
}

impl TablePanel {
  pub fn new(options: &[Column]) -> Self {
    let root = GtkBox::new(Orientation::Vertical, 6);

    let picker = FlowBox::builder()
      .selection_mode(SelectionMode::None)
      .max_children_per_line(9)
      .column_spacing(4)
      .build();
    let checks: Vec<(Column, CheckButton)> = options
      .iter()
      .map(|&c| {
        let check = CheckButton::with_label(c.name());
        picker.insert(&check, -1);
        (c, check)
      })
      .collect();
    root.append(&picker);

    let grid = Grid::builder()
      .column_spacing(14)
      .row_spacing(2)
      .margin_start(6)
      .margin_end(6)
      .build();
    let scroll = ScrolledWindow::builder()
      .hscrollbar_policy(PolicyType::Automatic)
      .vscrollbar_policy(PolicyType::Automatic)
      .min_content_height(220)
      .vexpand(true)
      .child(&grid)
      .build();
    root.append(&scroll);

    Self { root, checks, grid }
  }

  /// Ticks exactly the selected columns. Callers mute signals around this.
  pub fn sync_checks(&self, selection: &[Column]) {
    for (column, check) in &self.checks {
      check.set_active(selection.contains(column));
    }
  }

  /// Replaces every cell with the contents of `view` and returns the editable ones.
  pub fn rebuild(&self, view: &TableView) -> Vec<(usize, Column, Entry)> {
    let mut editable = Vec::new();
    while let Some(child) = self.grid.first_child() {
      self.grid.remove(&child);
    }

    for (col, meta) in view.columns.iter().enumerate() {
      let header = Label::new(None);
      header.set_markup(&format!("<b>{}</b>", glib::markup_escape_text(meta.column.name())));
      header.set_halign(Align::End);
      self.grid.attach(&header, col as i32, 0, 1, 1);
    }

    for row in 0..view.rows.len() {
      for (col, meta) in view.columns.iter().enumerate() {
        let text = view.display_text(row, col);
        if meta.editable {
          let entry = Entry::builder().text(text.as_str()).width_chars(8).xalign(1.0).build();
          entry.set_widget_name(&format!("cell-{}-{}", row, meta.column.name()));
          self.grid.attach(&entry, col as i32, row as i32 + 1, 1, 1);
          editable.push((row, meta.column, entry));
        } else {
          let label = Label::new(Some(text.as_str()));
          label.set_halign(Align::End);
          label.set_selectable(true);
          self.grid.attach(&label, col as i32, row as i32 + 1, 1, 1);
        }
      }
    }
    editable
  }
}

/// Sends the edited cell back through the ingestion handler.
fn commit(weak: &Weak<Dashboard>, row: usize, column: Column, text: String) {
  let Some(db) = weak.upgrade() else { return };
  if db.is_updating() {
    return;
  }
  let payload = {
    let st = db.state.borrow();
    if st.table.rows.get(row).is_none() {
      return;
    }
    let col = st.table.columns.iter().position(|c| c.column == column);
    let unchanged = col.map(|c| st.table.display_text(row, c) == text).unwrap_or(true);
    if unchanged {
      return;
    }
    let mut payload = st.table.payload();
    payload.set(row, column, &text);
    payload
  };
  db.ingest(IngestEvent::TableEdited(payload));
}

/// Hooks the cells returned by [`TablePanel::rebuild`].
pub fn connect_cells(dashboard: &Weak<Dashboard>, cells: Vec<(usize, Column, Entry)>) {
  for (row, column, entry) in cells {
    // Enter
    let weak = dashboard.clone();
    entry.connect_activate(move |e| {
      let text = e.text().to_string();
      let weak = weak.clone();
      // The grid is rebuilt by the commit, so leave the signal first
      glib::idle_add_local_once(move || commit(&weak, row, column, text));
    });

    // Focus-out
    let focus = EventControllerFocus::new();
    let weak = dashboard.clone();
    let entry_weak = entry.downgrade();
    focus.connect_leave(move |_| {
      let Some(e) = entry_weak.upgrade() else { return };
      let text = e.text().to_string();
      let weak = weak.clone();
      glib::idle_add_local_once(move || commit(&weak, row, column, text));
    });
    entry.add_controller(focus);
  }
}

pub fn connect(dashboard: &Rc<Dashboard>) {
  for (column, check) in &dashboard.table.checks {
    let column = *column;
    let weak = Rc::downgrade(dashboard);
    check.connect_toggled(move |c| {
      let Some(db) = weak.upgrade() else { return };
      if db.is_updating() {
        return;
      }
      {
        let mut st = db.state.borrow_mut();
        let selection = toggle_column(&st.session.table_selection, column, c.is_active());
        st.set_table_selection(selection);
      }
      db.refresh_table();
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn toggling_keeps_pick_order() {
    let sel = vec![Column::AtomIdx, Column::Species];
    let sel = toggle_column(&sel, Column::Custom, true);
    assert_eq!(sel, vec![Column::AtomIdx, Column::Species, Column::Custom]);

    let sel = toggle_column(&sel, Column::AtomIdx, false);
    assert_eq!(sel, vec![Column::Species, Column::Custom]);

    // Re-ticking an already selected column does not duplicate it
    let sel = toggle_column(&sel, Column::Species, true);
    assert_eq!(sel, vec![Column::Custom, Column::Species]);
  }
}
