// src/menu/actions_view.rs

use crate::state::AppState;
use crate::ui::Views;
use gtk4::prelude::*;
use gtk4::{glib, Application};
use std::cell::RefCell;
use std::rc::Rc;

pub fn setup(app: &Application, views: &Views, state: Rc<RefCell<AppState>>) {
    // 1. Theme
    let act_theme = gtk4::gio::SimpleAction::new("toggle_theme", None);
    let (s, v) = (state.clone(), views.clone());
    act_theme.connect_activate(move |_, _| {
        let result = s.borrow_mut().toggle_theme();
        if let Err(e) = result {
            log::error!("Could not save theme: {}", e);
        }
        v.refresh(&s);
    });
    app.add_action(&act_theme);

    // 2. Filters
    let act_reset = gtk4::gio::SimpleAction::new("reset_filters", None);
    let (s, v) = (state.clone(), views.clone());
    act_reset.connect_activate(move |_, _| {
        s.borrow_mut().reset_filters();
        log::info!("Filters reset");
        v.refresh(&s);
    });
    app.add_action(&act_reset);

    let act_search = gtk4::gio::SimpleAction::new("focus_search", None);
    let v = views.clone();
    act_search.connect_activate(move |_, _| {
        v.sidebar.search.grab_focus();
    });
    app.add_action(&act_search);

    // 3. Trend selection, target is the trend id or "none"
    let act_trend = gtk4::gio::SimpleAction::new("trend", Some(glib::VariantTy::STRING));
    let (s, v) = (state.clone(), views.clone());
    act_trend.connect_activate(move |_, param| {
        let Some(key) = param.and_then(|p| p.str()) else {
            return;
        };
        v.select_trend(&s, key);
    });
    app.add_action(&act_trend);
}
