// src/menu/actions_file.rs

use crate::dashboard::upload::IngestEvent;
use crate::io;
use crate::rendering::{export_figure, Figure};
use crate::ui::Dashboard;
use gtk4::prelude::*;
use gtk4::{
    Application, ApplicationWindow, ButtonsType, FileChooserAction, FileChooserNative, FileFilter,
    MessageDialog, MessageType, ResponseType,
};
use std::path::PathBuf;
use std::rc::{Rc, Weak};

/// Size of exported images when the matching widget is not realized yet.
const FALLBACK_EXPORT_SIZE: (u32, u32) = (1200, 900);

/// Shows a native file chooser and hands the chosen path to `on_accept`.
fn choose_path(
    win: &ApplicationWindow,
    title: &str,
    action: FileChooserAction,
    filters: &[(&str, &[&str])],
    current_name: Option<&str>,
    on_accept: impl Fn(PathBuf) + 'static,
) {
    let accept = match action {
        FileChooserAction::Save => "Save",
        _ => "Open",
    };
    let dialog = FileChooserNative::new(Some(title), Some(win), action, Some(accept), Some("Cancel"));

    for (name, patterns) in filters {
        let filter = FileFilter::new();
        filter.set_name(Some(*name));
        for p in patterns.iter() {
            filter.add_pattern(p);
        }
        dialog.add_filter(&filter);
    }
    if let Some(name) = current_name {
        dialog.set_current_name(name);
    }

    dialog.connect_response(move |d, response| {
        if response == ResponseType::Accept {
            if let Some(path) = d.file().and_then(|f| f.path()) {
                on_accept(path);
            }
        }
        d.destroy();
    });
    dialog.show();
}

fn open_structure(win: &ApplicationWindow, dashboard: Weak<Dashboard>) {
    choose_path(
        win,
        "Open Structure File",
        FileChooserAction::Open,
        &[("XYZ files (*.xyz)", &["*.xyz", "*.XYZ"][..]), ("All files", &["*"][..])],
        None,
        move |path| {
            let Some(db) = dashboard.upgrade() else { return };
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            match std::fs::read(&path) {
                Ok(contents) => db.ingest(IngestEvent::Upload { file_name, contents }),
                Err(e) => log::warn!("Cannot read {}: {}", path.display(), e),
            }
        },
    );
}

/// Uploading over edited data needs the user to drop the edits first.
fn confirm_reset(win: &ApplicationWindow, on_confirm: impl Fn() + 'static) {
    let dialog = MessageDialog::builder()
        .transient_for(win)
        .modal(true)
        .message_type(MessageType::Question)
        .buttons(ButtonsType::OkCancel)
        .text("Discard table edits?")
        .secondary_text(
            "The table was edited by hand. Loading a new structure resets the session and the edits are lost.",
        )
        .build();
    dialog.connect_response(move |d, response| {
        if response == ResponseType::Ok {
            on_confirm();
        } else {
            log::info!("Upload cancelled, table edits kept");
        }
        d.destroy();
    });
    dialog.present();
}

fn export_panel(win: &ApplicationWindow, dashboard: &Rc<Dashboard>, figure: Figure, default_name: &str) {
    let widget = match figure {
        Figure::Structure => dashboard.viewer.clone(),
        Figure::Distribution => dashboard.plot.clone(),
        Figure::Colorbar => dashboard.colorbar.clone(),
    };
    let size = match (widget.width(), widget.height()) {
        (w, h) if w > 0 && h > 0 => (w as u32 * 2, h as u32 * 2),
        _ => FALLBACK_EXPORT_SIZE,
    };

    let weak = Rc::downgrade(dashboard);
    choose_path(
        win,
        "Export Figure",
        FileChooserAction::Save,
        &[
            ("PNG image (*.png)", &["*.png"][..]),
            ("PDF document (*.pdf)", &["*.pdf"][..]),
            ("SVG image (*.svg)", &["*.svg"][..]),
        ],
        Some(default_name),
        move |path| {
            let Some(db) = weak.upgrade() else { return };
            let st = db.state.borrow();
            if let Err(e) = export_figure(&st, figure, &path, size.0, size.1) {
                log::warn!("Export failed: {}", e);
            }
        },
    );
}

pub fn setup(app: &Application, window: &ApplicationWindow, dashboard: &Rc<Dashboard>) {
    // --- OPEN ---
    let open_action = gtk4::gio::SimpleAction::new("open", None);
    let win_weak = window.downgrade();
    let db_weak = Rc::downgrade(dashboard);
    open_action.connect_activate(move |_, _| {
        let (Some(win), Some(db)) = (win_weak.upgrade(), db_weak.upgrade()) else {
            return;
        };
        if !db.state.borrow().session.needs_reset_confirmation() {
            open_structure(&win, Rc::downgrade(&db));
            return;
        }
        let db_inner = Rc::downgrade(&db);
        let win_inner = win.downgrade();
        confirm_reset(&win, move || {
            let (Some(db), Some(win)) = (db_inner.upgrade(), win_inner.upgrade()) else {
                return;
            };
            db.state.borrow_mut().reset_session();
            db.refresh();
            open_structure(&win, Rc::downgrade(&db));
        });
    });
    app.add_action(&open_action);

    // --- EXPORT TABLE (CSV) ---
    let csv_action = gtk4::gio::SimpleAction::new("export_csv", None);
    let win_weak = window.downgrade();
    let db_weak = Rc::downgrade(dashboard);
    csv_action.connect_activate(move |_, _| {
        let (Some(win), Some(db)) = (win_weak.upgrade(), db_weak.upgrade()) else {
            return;
        };
        let default_name = {
            let st = db.state.borrow();
            let stem = st
                .session
                .file_name
                .as_deref()
                .and_then(|n| n.rsplit_once('.').map(|(s, _)| s.to_string()))
                .unwrap_or_else(|| "curvature".to_string());
            format!("{}.csv", stem)
        };
        let weak = Rc::downgrade(&db);
        choose_path(
            &win,
            "Export Table",
            FileChooserAction::Save,
            &[("CSV files (*.csv)", &["*.csv"][..])],
            Some(&default_name),
            move |path| {
                let Some(db) = weak.upgrade() else { return };
                let st = db.state.borrow();
                if let Err(e) = io::export::export_csv(&st.table, &path) {
                    log::warn!("Table export failed: {}", e);
                }
            },
        );
    });
    app.add_action(&csv_action);

    // --- EXPORT FIGURES ---
    for (name, figure, default_name) in [
        ("export_structure", Figure::Structure, "structure.png"),
        ("export_plot", Figure::Distribution, "distribution.png"),
        ("export_colorbar", Figure::Colorbar, "colorbar.png"),
    ] {
        let action = gtk4::gio::SimpleAction::new(name, None);
        let win_weak = window.downgrade();
        let db_weak = Rc::downgrade(dashboard);
        action.connect_activate(move |_, _| {
            if let (Some(win), Some(db)) = (win_weak.upgrade(), db_weak.upgrade()) {
                export_panel(&win, &db, figure, default_name);
            }
        });
        app.add_action(&action);
    }

    // --- RESET SESSION ---
    let reset_action = gtk4::gio::SimpleAction::new("reset_session", None);
    let db_weak = Rc::downgrade(dashboard);
    reset_action.connect_activate(move |_, _| {
        let Some(db) = db_weak.upgrade() else { return };
        db.state.borrow_mut().reset_session();
        db.refresh();
    });
    app.add_action(&reset_action);

    // --- SAVE AS DEFAULTS ---
    let defaults_action = gtk4::gio::SimpleAction::new("save_defaults", None);
    let db_weak = Rc::downgrade(dashboard);
    defaults_action.connect_activate(move |_, _| {
        let Some(db) = db_weak.upgrade() else { return };
        let mut guard = db.state.borrow_mut();
        let st = &mut *guard;
        st.config.default_colormap = st.controls.colormap.clone();
        st.config.default_bins = st.controls.nbins;
        let msg = st.config.save();
        log::info!("{}", msg);
    });
    app.add_action(&defaults_action);

    // --- QUIT ---
    let quit_action = gtk4::gio::SimpleAction::new("quit", None);
    let win_weak = window.downgrade();
    quit_action.connect_activate(move |_, _| {
        if let Some(win) = win_weak.upgrade() {
            win.close();
        }
    });
    app.add_action(&quit_action);
}
