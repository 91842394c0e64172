// src/menu/actions_file.rs

use crate::state::AppState;
use crate::ui::export_dialog::{show_data_export_dialog, show_image_export_dialog};
use crate::ui::{show_preferences_window, Views};
use gtk4::prelude::*;
use gtk4::Application;
use std::cell::RefCell;
use std::rc::Rc;

pub fn setup(app: &Application, views: &Views, state: Rc<RefCell<AppState>>) {
    // --- EXPORT DATA ---
    let data_action = gtk4::gio::SimpleAction::new("export_data", None);
    let state_weak = Rc::downgrade(&state);
    let v = views.clone();
    data_action.connect_activate(move |_, _| {
        if let Some(st) = state_weak.upgrade() {
            show_data_export_dialog(&v, st);
        }
    });
    app.add_action(&data_action);

    // --- EXPORT IMAGE ---
    let image_action = gtk4::gio::SimpleAction::new("export_image", None);
    let state_weak = Rc::downgrade(&state);
    let v = views.clone();
    image_action.connect_activate(move |_, _| {
        if let Some(st) = state_weak.upgrade() {
            show_image_export_dialog(&v, st);
        }
    });
    app.add_action(&image_action);

    // --- PREFERENCES ---
    let pref_action = gtk4::gio::SimpleAction::new("preferences", None);
    let state_weak = Rc::downgrade(&state);
    let v = views.clone();
    pref_action.connect_activate(move |_, _| {
        if let Some(st) = state_weak.upgrade() {
            show_preferences_window(&v, st);
        }
    });
    app.add_action(&pref_action);

    // --- QUIT ---
    let quit_action = gtk4::gio::SimpleAction::new("quit", None);
    let win_weak = views.window.downgrade();
    quit_action.connect_activate(move |_, _| {
        if let Some(win) = win_weak.upgrade() {
            win.close();
        }
    });
    app.add_action(&quit_action);
}
