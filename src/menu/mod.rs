// src/menu/mod.rs

use crate::analysis::trends::TrendKey;
use crate::state::AppState;
use crate::ui::Views;
use gtk4::prelude::*;
use gtk4::Application;
use std::cell::RefCell;
use std::rc::Rc;

pub mod actions_file;
pub mod actions_help;
pub mod actions_tools;
pub mod actions_view;

pub fn build_menu_and_actions(app: &Application, views: &Views, state: Rc<RefCell<AppState>>) -> gtk4::Box {
  // Register Actions
  actions_file::setup(app, views, state.clone());
  actions_view::setup(app, views, state.clone());
  actions_tools::setup(app, views, state.clone());
  actions_help::setup(app, &views.window);

  // Keyboard Shortcuts
  app.set_accels_for_action("app.export_data", &["<Primary>e"]);
  app.set_accels_for_action("app.export_image", &["<Primary><Shift>e"]);
  app.set_accels_for_action("app.preferences", &["<Primary>comma"]);
  app.set_accels_for_action("app.quit", &["<Primary>q"]);
  app.set_accels_for_action("app.toggle_theme", &["<Primary>t"]);
  app.set_accels_for_action("app.reset_filters", &["<Primary>r"]);
  app.set_accels_for_action("app.focus_search", &["<Primary>f"]);
  app.set_accels_for_action("app.quiz", &["<Primary>k"]);
  app.set_accels_for_action("app.compare", &["<Primary>m"]);
  app.set_accels_for_action("app.help_controls", &["F1"]);

  // --- BUILD MENU BAR ---
  let menu_bar = gtk4::Box::new(gtk4::Orientation::Horizontal, 0);
  let root_model = gtk4::gio::Menu::new();

  // --- FILE MENU ---
  let file_menu = gtk4::gio::Menu::new();
  file_menu.append(Some("Export Data..."), Some("app.export_data"));
  file_menu.append(Some("Export Image..."), Some("app.export_image"));
  file_menu.append(Some("Preferences..."), Some("app.preferences"));
  file_menu.append(Some("Quit"), Some("app.quit"));
  root_model.append_submenu(Some("File"), &file_menu);

  // --- VIEW MENU ---
  let view_menu = gtk4::gio::Menu::new();
  view_menu.append(Some("Toggle Dark Theme"), Some("app.toggle_theme"));
  view_menu.append(Some("Toggle Sidebar"), Some("app.toggle_sidebar"));
  view_menu.append(Some("Find Element"), Some("app.focus_search"));
  view_menu.append(Some("Reset Filters"), Some("app.reset_filters"));

  let trend_submenu = gtk4::gio::Menu::new();
  trend_submenu.append(Some("None"), Some("app.trend::none"));
  for key in TrendKey::ALL {
    trend_submenu.append(Some(key.definition().name), Some(&format!("app.trend::{}", key.id())));
  }
  view_menu.append_submenu(Some("Periodic Trend"), &trend_submenu);
  root_model.append_submenu(Some("View"), &view_menu);

  // --- TOOLS MENU ---
  let tools_menu = gtk4::gio::Menu::new();
  tools_menu.append(Some("Quiz..."), Some("app.quiz"));
  tools_menu.append(Some("Compare Elements..."), Some("app.compare"));
  root_model.append_submenu(Some("Tools"), &tools_menu);

  // --- HELP MENU ---
  let help_menu = gtk4::gio::Menu::new();
  help_menu.append(Some("Controls & Shortcuts"), Some("app.help_controls"));
  help_menu.append(Some("About"), Some("app.about"));
  root_model.append_submenu(Some("Help"), &help_menu);

  let popover_bar = gtk4::PopoverMenuBar::from_model(Some(&root_model));
  menu_bar.append(&popover_bar);

  menu_bar
}
