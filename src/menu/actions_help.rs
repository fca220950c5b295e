// src/menu/actions_help.rs

use gtk4::prelude::*;
use gtk4::{AboutDialog, Application, ApplicationWindow, Expander, License};

pub fn setup(app: &Application, window: &ApplicationWindow, docs: &Expander) {
    // --- ABOUT ---
    let about_action = gtk4::gio::SimpleAction::new("about", None);
    let win_weak = window.downgrade();
    about_action.connect_activate(move |_, _| {
        if let Some(win) = win_weak.upgrade() {
            let dialog = AboutDialog::builder()
                .transient_for(&win)
                .modal(true)
                .program_name("curvview")
                .version(env!("CARGO_PKG_VERSION"))
                .comments("Local curvature and hybridization of molecular structures, mapped on the atoms.")
                .license_type(License::MitX11)
                .logo_icon_name("applications-science")
                .build();
            dialog.present();
        }
    });
    app.add_action(&about_action);

    // --- DOCUMENTATION ---
    let docs_action = gtk4::gio::SimpleAction::new("docs", None);
    let docs_weak = docs.downgrade();
    docs_action.connect_activate(move |_, _| {
        if let Some(exp) = docs_weak.upgrade() {
            exp.set_expanded(true);
            exp.grab_focus();
        }
    });
    app.add_action(&docs_action);
}
