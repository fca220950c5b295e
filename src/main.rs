// src/main.rs

use gtk4::glib;
use gtk4::prelude::*;
use gtk4::Box as GtkBox;
use gtk4::{
    Application, ApplicationWindow, Frame, Orientation, Paned, PolicyType, ScrolledWindow, TextView,
};
use std::cell::RefCell;
use std::rc::Rc;

pub mod analysis;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod menu;
pub mod model;
pub mod physics;
pub mod rendering;
pub mod state;
pub mod ui;
pub mod utils;

use config::Config;
use dashboard::upload::IngestEvent;
use model::elements::{init_element_colors, ElementColors};
use state::AppState;
use ui::Dashboard;

fn main() {
    let app = Application::builder()
        .application_id("org.mavensgroup.curvview")
        .build();

    app.connect_activate(build_ui);
    app.run();
}

fn build_ui(app: &Application) {
    // 1. Console first, so start-up messages land in it
    let console_view = TextView::builder()
        .editable(false)
        .cursor_visible(false)
        .monospace(true)
        .left_margin(10)
        .right_margin(10)
        .top_margin(6)
        .bottom_margin(6)
        .build();
    if let Err(e) = utils::logger::init(&console_view) {
        eprintln!("Logger not installed: {}", e);
    }

    // 2. Configuration and the element color table
    let (config, msg) = Config::load();
    log::info!("{}", msg);
    let (colors, msg) = ElementColors::load(config.element_colors_path.as_deref());
    log::info!("{}", msg);
    if !init_element_colors(colors) {
        log::debug!("Element colors were already loaded");
    }

    let state = Rc::new(RefCell::new(AppState::new(config)));
    let dashboard = Dashboard::new(state);

    let window = ApplicationWindow::builder()
        .application(app)
        .title("CurvView - Molecular Curvature Dashboard")
        .default_width(1300)
        .default_height(950)
        .build();

    // 3. Left: structure, colorbar, color controls
    let left_vbox = GtkBox::new(Orientation::Vertical, 6);
    let viewer_frame = Frame::new(Some("Structure"));
    viewer_frame.set_child(Some(&dashboard.viewer));
    left_vbox.append(&viewer_frame);
    left_vbox.append(&dashboard.colorbar);
    left_vbox.append(&dashboard.controls.color_box);

    // 4. Right: plot controls, plot, statistics
    let right_vbox = GtkBox::new(Orientation::Vertical, 6);
    right_vbox.append(&dashboard.controls.plot_box);
    let plot_frame = Frame::new(Some("Distribution"));
    plot_frame.set_child(Some(&dashboard.plot));
    right_vbox.append(&plot_frame);
    let stats_scroll = ScrolledWindow::builder()
        .hscrollbar_policy(PolicyType::Automatic)
        .vscrollbar_policy(PolicyType::Never)
        .child(&dashboard.stats)
        .build();
    right_vbox.append(&stats_scroll);

    let top = Paned::new(Orientation::Horizontal);
    top.set_start_child(Some(&left_vbox));
    top.set_end_child(Some(&right_vbox));
    top.set_position(620);

    // 5. Bottom: data table and documentation
    let bottom_vbox = GtkBox::new(Orientation::Vertical, 6);
    bottom_vbox.set_margin_start(6);
    bottom_vbox.set_margin_end(6);
    bottom_vbox.append(&dashboard.table.root);
    let docs = ui::docs::build();
    let docs_scroll = ScrolledWindow::builder()
        .hscrollbar_policy(PolicyType::Never)
        .max_content_height(300)
        .propagate_natural_height(true)
        .child(&docs)
        .build();
    bottom_vbox.append(&docs_scroll);

    let main_paned = Paned::new(Orientation::Vertical);
    main_paned.set_start_child(Some(&top));
    main_paned.set_end_child(Some(&bottom_vbox));
    main_paned.set_vexpand(true);
    main_paned.set_position(560);

    // Console
    let info_frame = Frame::new(Some("Console"));
    let scroll_win = ScrolledWindow::builder()
        .min_content_height(110)
        .child(&console_view)
        .build();
    info_frame.set_child(Some(&scroll_win));

    // 6. Menu bar and assembly
    let menu_bar = menu::build_menu_and_actions(app, &window, &dashboard, &docs);

    let root_vbox = GtkBox::new(Orientation::Vertical, 0);
    root_vbox.append(&menu_bar);
    root_vbox.append(&main_paned);
    root_vbox.append(&info_frame);
    window.set_child(Some(&root_vbox));

    // 7. First analysis on the default structure
    dashboard.ingest(IngestEvent::Startup);

    // Signal handlers only hold weak references; the window keeps the dashboard alive
    let db = dashboard.clone();
    window.connect_close_request(move |_| {
        if db.state.borrow().session.table_edited {
            log::info!("Closing with table edits that were not exported");
        }
        glib::Propagation::Proceed
    });

    window.present();
}
