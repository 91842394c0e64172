// src/ui/mod.rs
pub mod comparison_window;
pub mod element_dialog;
pub mod export_dialog;
pub mod interactions;
pub mod preferences;
pub mod quiz_window;

pub use interactions::setup_interactions;
pub use preferences::show_preferences_window;

use crate::panels::sidebar::Sidebar;
use crate::state::AppState;
use gtk4::prelude::*;
use gtk4::{ApplicationWindow, ButtonsType, DrawingArea, MessageDialog, MessageType, Revealer};
use std::cell::RefCell;
use std::rc::Rc;

/// Widgets that mirror `AppState` and must be refreshed after a command
#[derive(Clone)]
pub struct Views {
    pub window: ApplicationWindow,
    pub table: DrawingArea,
    pub chart: DrawingArea,
    pub chart_revealer: Revealer,
    pub sidebar: Sidebar,
    pub comparison: Rc<RefCell<Option<comparison_window::ComparisonWindow>>>,
    /// Desktop preference captured before the app forced a theme
    pub system_dark: bool,
}

impl Views {
    /// Never call while holding a borrow of `state`
    pub fn refresh(&self, state: &Rc<RefCell<AppState>>) {
        let (has_trend, dark) = {
            let st = state.borrow();
            (st.trend.is_some(), st.dark)
        };
        apply_theme(dark);
        self.chart_revealer.set_reveal_child(has_trend);
        self.table.queue_draw();
        self.chart.queue_draw();
        self.sidebar.sync(state);

        let comparison = self.comparison.borrow().clone();
        if let Some(win) = comparison {
            win.sync(state);
        }
    }

    /// Trend command shared by the menu and the sidebar dropdown
    pub fn select_trend(&self, state: &Rc<RefCell<AppState>>, key: &str) {
        let result = state.borrow_mut().select_trend(key);
        if let Err(e) = result {
            show_error(&self.window, "Trend unavailable", &e.to_string());
        }
        self.refresh(state);
    }
}

pub fn apply_theme(dark: bool) {
    if let Some(settings) = gtk4::Settings::default() {
        if settings.is_gtk_application_prefer_dark_theme() != dark {
            settings.set_gtk_application_prefer_dark_theme(dark);
        }
    }
}

/// Best effort: GTK only exposes the theme name and the app-level dark flag
pub fn system_prefers_dark() -> bool {
    gtk4::Settings::default()
        .map(|s| {
            s.is_gtk_application_prefer_dark_theme()
                || s.gtk_theme_name()
                    .map(|name| name.to_lowercase().contains("dark"))
                    .unwrap_or(false)
        })
        .unwrap_or(false)
}

/// Blocking error dialog for failures that need attention
pub fn show_error(parent: &impl IsA<gtk4::Window>, title: &str, detail: &str) {
    log::error!("{}: {}", title, detail);
    let dialog = MessageDialog::builder()
        .transient_for(parent)
        .modal(true)
        .message_type(MessageType::Error)
        .buttons(ButtonsType::Close)
        .text(title)
        .secondary_text(detail)
        .build();
    dialog.connect_response(|d, _| d.destroy());
    dialog.present();
}

/// Caption on the left, selectable value on the right
pub fn info_row(grid: &gtk4::Grid, row: i32, caption: &str, value: &str) {
    let key = gtk4::Label::builder()
        .label(caption)
        .halign(gtk4::Align::Start)
        .build();
    key.add_css_class("dim-label");
    let val = gtk4::Label::builder()
        .label(value)
        .halign(gtk4::Align::Start)
        .selectable(true)
        .wrap(true)
        .build();
    grid.attach(&key, 0, row, 1, 1);
    grid.attach(&val, 1, row, 1, 1);
}
