// src/menu/actions_tools.rs

use crate::state::AppState;
use crate::ui::{comparison_window, quiz_window, Views};
use gtk4::prelude::*;
use gtk4::Application;
use std::cell::RefCell;
use std::rc::Rc;

pub fn setup(app: &Application, views: &Views, state: Rc<RefCell<AppState>>) {
    // --- QUIZ ---
    let quiz_action = gtk4::gio::SimpleAction::new("quiz", None);
    let state_weak = Rc::downgrade(&state);
    let v = views.clone();
    quiz_action.connect_activate(move |_, _| {
        if let Some(st) = state_weak.upgrade() {
            quiz_window::show_quiz_window(&v, st);
        }
    });
    app.add_action(&quiz_action);

    // --- COMPARE ---
    let compare_action = gtk4::gio::SimpleAction::new("compare", None);
    let state_weak = Rc::downgrade(&state);
    let v = views.clone();
    compare_action.connect_activate(move |_, _| {
        if let Some(st) = state_weak.upgrade() {
            comparison_window::open(&v, st);
        }
    });
    app.add_action(&compare_action);
}
