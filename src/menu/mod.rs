// src/menu/mod.rs

use crate::ui::Dashboard;
use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow, Expander};
use std::rc::Rc;

pub mod actions_file;
pub mod actions_help;
pub mod actions_view;

pub fn build_menu_and_actions(
  app: &Application,
  window: &ApplicationWindow,
  dashboard: &Rc<Dashboard>,
  docs: &Expander,
) -> gtk4::Box {
  // Register Actions
  actions_file::setup(app, window, dashboard);
  actions_view::setup(app, dashboard);
  actions_help::setup(app, window, docs);

  // Keyboard Shortcuts
  app.set_accels_for_action("app.open", &["<Primary>o"]);
  app.set_accels_for_action("app.export_csv", &["<Primary>e"]);
  app.set_accels_for_action("app.quit", &["<Primary>q"]);
  app.set_accels_for_action("app.view_reset", &["<Primary>r"]);
  app.set_accels_for_action("app.toggle_labels", &["<Primary>l"]);
  app.set_accels_for_action("app.docs", &["F1"]);

  // --- BUILD MENU BAR ---
  let menu_bar = gtk4::Box::new(gtk4::Orientation::Horizontal, 0);
  let root_model = gtk4::gio::Menu::new();

  // --- FILE MENU ---
  let file_menu = gtk4::gio::Menu::new();
  file_menu.append(Some("Open..."), Some("app.open"));

  let export_menu = gtk4::gio::Menu::new();
  export_menu.append(Some("Table (CSV)..."), Some("app.export_csv"));
  export_menu.append(Some("Structure Image..."), Some("app.export_structure"));
  export_menu.append(Some("Distribution Plot..."), Some("app.export_plot"));
  export_menu.append(Some("Colorbar..."), Some("app.export_colorbar"));
  file_menu.append_submenu(Some("Export"), &export_menu);

  file_menu.append(Some("Reset Session"), Some("app.reset_session"));
  file_menu.append(Some("Save Colormap and Bins as Defaults"), Some("app.save_defaults"));
  file_menu.append(Some("Quit"), Some("app.quit"));
  root_model.append_submenu(Some("File"), &file_menu);

  // --- VIEW MENU ---
  let view_menu = gtk4::gio::Menu::new();
  view_menu.append(Some("Restore View"), Some("app.view_reset"));
  view_menu.append(Some("Toggle Atom Labels"), Some("app.toggle_labels"));
  root_model.append_submenu(Some("View"), &view_menu);

  // --- HELP MENU ---
  let help_menu = gtk4::gio::Menu::new();
  help_menu.append(Some("Documentation"), Some("app.docs"));
  help_menu.append(Some("About"), Some("app.about"));
  root_model.append_submenu(Some("Help"), &help_menu);

  let popover_bar = gtk4::PopoverMenuBar::from_model(Some(&root_model));
  popover_bar.set_hexpand(true);
  menu_bar.append(&popover_bar);

  // CSV export button at the right end of the bar
  let export_button = gtk4::Button::with_label("Export");
  export_button.set_action_name(Some("app.export_csv"));
  export_button.set_tooltip_text(Some("Export the table as CSV (Ctrl+E)"));
  export_button.set_margin_end(6);
  menu_bar.append(&export_button);

  menu_bar
}
