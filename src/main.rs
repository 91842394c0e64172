use gtk4::prelude::*;
use gtk4::{glib, Application, ApplicationWindow, DrawingArea, Frame, Orientation, Paned, ScrolledWindow, TextView};
use gtk4::Box as GtkBox;
use gtk4::{Revealer, RevealerTransitionType};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod menu;
pub mod model;
pub mod panels;
pub mod quiz;
pub mod rendering;
pub mod state;
pub mod ui;
pub mod utils;

use config::PrefStore;
use io::cache::{AssetCache, FileFetcher, SingleFileFetcher};
use io::dataset::DataSource;
use state::AppState;
use ui::{setup_interactions, Views};

/// Seconds between background dataset refreshes
const SYNC_INTERVAL_SECS: u32 = 600;

/// Pulls `--data <file>` / `--data=<file>` out of the arguments; GTK gets the rest
fn split_data_arg(args: Vec<String>) -> (Option<PathBuf>, Vec<String>) {
    let mut data = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--data" {
            data = iter.next().map(PathBuf::from);
        } else if let Some(path) = arg.strip_prefix("--data=") {
            data = Some(PathBuf::from(path));
        } else {
            rest.push(arg);
        }
    }
    (data, rest)
}

fn main() -> glib::ExitCode {
    let (cli_data, gtk_args) = split_data_arg(std::env::args().collect());
    let source = DataSource::resolve(cli_data);

    let app = Application::builder()
        .application_id("org.ptview.PTView")
        .build();

    app.connect_activate(move |app| build_ui(app, &source));
    app.run_with_args(&gtk_args)
}

fn build_ui(app: &Application, source: &DataSource) {
    // Read before apply_theme overrides it
    let system_dark = ui::system_prefers_dark();

    let window = ApplicationWindow::builder()
        .application(app)
        .title("PTView - Interactive Periodic Table")
        .default_width(1400)
        .default_height(900)
        .build();

    // Console first, so startup messages land in it
    let console_view = TextView::builder()
        .editable(false).cursor_visible(false).monospace(true)
        .left_margin(10).right_margin(10).top_margin(10).bottom_margin(10)
        .build();
    if let Err(e) = utils::logger::init(&console_view) {
        eprintln!("Logger already installed: {}", e);
    }

    let (elements, load_error) = io::load_elements(source);
    let mut initial_state = AppState::new(elements, PrefStore::open_default());
    if initial_state.config.theme.is_none() {
        initial_state.dark = system_dark;
    }
    ui::apply_theme(initial_state.dark);
    let state = Rc::new(RefCell::new(initial_state));

    // 1. TOP LEVEL: Vertical Box (Menu on top, Main Content below)
    let root_vbox = GtkBox::new(Orientation::Vertical, 0);
    window.set_child(Some(&root_vbox));

    // 2. MAIN CONTENT: Horizontal Box (Sidebar | Right_Panel)
    let main_hbox = GtkBox::new(Orientation::Horizontal, 0);
    main_hbox.set_vexpand(true);

    // --- Right Panel (Table + Chart + Console) ---
    let right_vbox = GtkBox::new(Orientation::Vertical, 0);
    right_vbox.set_hexpand(true);

    let table_area = DrawingArea::new();
    table_area.set_vexpand(true);
    table_area.set_hexpand(true);
    rendering::setup_drawing(&table_area, state.clone());

    let chart_area = DrawingArea::new();
    chart_area.set_content_height(260);
    rendering::setup_chart_drawing(&chart_area, state.clone());
    let chart_revealer = Revealer::builder()
        .transition_type(RevealerTransitionType::SlideUp)
        .child(&chart_area)
        .reveal_child(false)
        .build();

    let info_frame = Frame::new(None);
    let scroll_win = ScrolledWindow::builder()
        .min_content_height(110)
        .child(&console_view)
        .build();
    info_frame.set_child(Some(&scroll_win));

    let upper = GtkBox::new(Orientation::Vertical, 0);
    upper.append(&table_area);
    upper.append(&chart_revealer);

    let paned = Paned::new(Orientation::Vertical);
    paned.set_start_child(Some(&upper));
    paned.set_end_child(Some(&info_frame));
    paned.set_resize_end_child(false);
    paned.set_shrink_end_child(true);
    paned.set_vexpand(true);
    right_vbox.append(&paned);

    // --- Left Panel (Sidebar) ---
    let sidebar = panels::sidebar::build(&state);

    let sidebar_revealer = Revealer::builder()
        .transition_type(RevealerTransitionType::SlideRight)
        .child(&sidebar.root)
        .reveal_child(true)
        .build();

    main_hbox.append(&sidebar_revealer);
    main_hbox.append(&right_vbox);

    let views = Views {
        window: window.clone(),
        table: table_area.clone(),
        chart: chart_area.clone(),
        chart_revealer,
        sidebar: sidebar.clone(),
        comparison: Rc::new(RefCell::new(None)),
        system_dark,
    };
    sidebar.connect(&state, &views);

    // 3. Menu Bar
    let menu_bar = menu::build_menu_and_actions(app, &views, state.clone());

    // 4. ACTION: Toggle Sidebar (F9)
    let toggle_action = gtk4::gio::SimpleAction::new("toggle_sidebar", None);
    let rev_weak = sidebar_revealer.downgrade();
    toggle_action.connect_activate(move |_, _| {
        if let Some(rev) = rev_weak.upgrade() {
            rev.set_reveal_child(!rev.reveals_child());
        }
    });
    app.add_action(&toggle_action);
    app.set_accels_for_action("app.toggle_sidebar", &["F9"]);

    // Assemble Root
    root_vbox.append(&menu_bar);
    root_vbox.append(&main_hbox);

    // --- Setup Logic ---
    setup_interactions(&views, state.clone());
    schedule_cache_sync(source);

    views.refresh(&state);
    window.present();

    if let Some(e) = load_error {
        ui::show_error(
            &window,
            "Could not load the element data",
            &format!("{}\n\nThe built-in dataset is shown instead.", e),
        );
    }
}

/// Precache static resources once, then keep the dataset copy fresh
fn schedule_cache_sync(source: &DataSource) {
    let Some(cache) = AssetCache::open_default() else {
        log::warn!("No cache directory available; offline copies disabled");
        return;
    };
    let cache = Rc::new(cache);

    let c = cache.clone();
    glib::timeout_add_seconds_local_once(2, move || {
        if let Ok(cwd) = std::env::current_dir() {
            c.install(&FileFetcher::new(cwd));
        }
    });

    let DataSource::File(path) = source else {
        return;
    };
    let fetcher = SingleFileFetcher::new(path.clone());
    glib::timeout_add_seconds_local(SYNC_INTERVAL_SECS, move || {
        if let Err(e) = cache.sync_dataset(&fetcher) {
            log::warn!("Background dataset sync failed: {}", e);
        }
        glib::ControlFlow::Continue
    });
}
