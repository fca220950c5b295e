// src/menu/actions_view.rs

use crate::state::ViewState;
use crate::ui::Dashboard;
use gtk4::prelude::*;
use gtk4::Application;
use std::rc::Rc;

pub fn setup(app: &Application, dashboard: &Rc<Dashboard>) {
    // 1. Restore View
    let act_reset = gtk4::gio::SimpleAction::new("view_reset", None);
    let db_weak = Rc::downgrade(dashboard);
    act_reset.connect_activate(move |_, _| {
        if let Some(db) = db_weak.upgrade() {
            db.state.borrow_mut().view = ViewState::default();
            db.viewer.queue_draw();
        }
    });
    app.add_action(&act_reset);

    // 2. Atom labels
    let act_labels = gtk4::gio::SimpleAction::new("toggle_labels", None);
    let db_weak = Rc::downgrade(dashboard);
    act_labels.connect_activate(move |_, _| {
        if let Some(db) = db_weak.upgrade() {
            {
                let mut st = db.state.borrow_mut();
                st.config.style.show_labels = !st.config.style.show_labels;
            }
            db.viewer.queue_draw();
        }
    });
    app.add_action(&act_labels);
}
