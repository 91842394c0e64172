// src/ui/element_dialog.rs

use gtk4::{self as gtk, glib, prelude::*};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::analysis::comparison::PickStep;
use crate::model::electron_config;
use crate::model::{Element, Property};
use crate::rendering::painter::{self, Palette};
use crate::state::AppState;
use crate::ui::{comparison_window, info_row, show_error, Views};
use crate::utils::report;

fn rgb_hex((r, g, b): (f64, f64, f64)) -> String {
    format!(
        "#{:02x}{:02x}{:02x}",
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8
    )
}

fn favorite_label(active: bool) -> &'static str {
    if active { "★ Favorite" } else { "☆ Add to Favorites" }
}

fn with_unit(element: &Element, property: Property) -> String {
    match element.property(property) {
        Some(v) => format!("{} {}", v, property.unit()),
        None => "N/A".to_string(),
    }
}

fn page() -> gtk::Grid {
    gtk::Grid::builder()
        .row_spacing(8)
        .column_spacing(16)
        .margin_top(15)
        .margin_bottom(15)
        .margin_start(15)
        .margin_end(15)
        .build()
}

fn basics_tab(element: &Element) -> gtk::Grid {
    let grid = page();
    info_row(&grid, 0, "Atomic Number", &element.atomic_number.to_string());
    info_row(&grid, 1, "Atomic Mass", &format!("{} u", element.formatted_mass()));
    info_row(&grid, 2, "Category", element.category.label());
    info_row(&grid, 3, "State", element.state.label());
    info_row(&grid, 4, "Discovered", element.discovery_year.as_deref().unwrap_or("Unknown"));
    info_row(&grid, 5, "Discovered by", element.discovered_by.as_deref().unwrap_or("Unknown"));
    info_row(
        &grid,
        6,
        "Description",
        element.description.as_deref().unwrap_or("No description available."),
    );
    grid
}

fn properties_tab(element: &Element) -> gtk::Grid {
    let grid = page();
    let rows = [
        ("Density", match element.density {
            Some(_) => format!("{} {}", element.formatted_density(), Property::Density.unit()),
            None => "N/A".to_string(),
        }),
        ("Melting Point", with_unit(element, Property::MeltingPoint)),
        ("Boiling Point", with_unit(element, Property::BoilingPoint)),
        ("Electronegativity", element.formatted_electronegativity()),
        ("Atomic Radius", with_unit(element, Property::AtomicRadius)),
        ("Ionization Energy", with_unit(element, Property::IonizationEnergy)),
        ("Group", element.group.map(|g| g.to_string()).unwrap_or_else(|| "-".to_string())),
        ("Period", element.period.to_string()),
    ];
    for (i, (caption, value)) in rows.iter().enumerate() {
        info_row(&grid, i as i32, caption, value);
    }
    grid
}

fn electrons_tab(element: &Element, state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let shells = electron_config::parse(&element.electron_configuration);

    let vbox = gtk::Box::new(gtk::Orientation::Vertical, 10);
    let grid = page();
    info_row(&grid, 0, "Configuration", &element.electron_configuration);
    info_row(&grid, 1, "Block", element.block.label());
    info_row(&grid, 2, "Electrons per shell", &electron_config::shell_summary(&shells));
    vbox.append(&grid);

    let da = gtk::DrawingArea::new();
    da.set_content_height(260);
    da.set_vexpand(true);

    let phase = Rc::new(Cell::new(0.0f64));
    let (p, s, el) = (phase.clone(), state.clone(), element.clone());
    da.set_draw_func(move |_, cr, w, h| {
        let palette = Palette::from_state(&s.borrow());
        if let Err(e) = painter::draw_shells(cr, &el, &shells, w as f64, h as f64, p.get(), &palette) {
            log::error!("Shell diagram failed: {}", e);
        }
    });

    // Reduced motion freezes the electrons where they are
    let s = state.clone();
    da.add_tick_callback(move |da, clock| {
        if !s.borrow().config.accessibility.reduced_motion {
            phase.set(clock.frame_time() as f64 / 1_000_000.0);
            da.queue_draw();
        }
        glib::ControlFlow::Continue
    });
    vbox.append(&da);
    vbox
}

fn uses_tab(element: &Element) -> gtk::Box {
    let vbox = gtk::Box::new(gtk::Orientation::Vertical, 6);
    vbox.set_margin_top(15);
    vbox.set_margin_start(15);
    vbox.set_margin_end(15);

    let heading = |text: &str| {
        let l = gtk::Label::new(None);
        l.set_markup(&format!("<b>{}</b>", glib::markup_escape_text(text)));
        l.set_halign(gtk::Align::Start);
        l
    };
    let line = |text: &str| {
        gtk::Label::builder()
            .label(text)
            .halign(gtk::Align::Start)
            .wrap(true)
            .selectable(true)
            .build()
    };

    vbox.append(&heading("Applications"));
    if element.applications.is_empty() {
        vbox.append(&line("No applications recorded."));
    }
    for app in &element.applications {
        vbox.append(&line(&format!("• {}", app)));
    }

    let compounds = heading("Common Compounds");
    compounds.set_margin_top(10);
    vbox.append(&compounds);
    if element.compounds.is_empty() {
        vbox.append(&line("No compounds recorded."));
    }
    for c in &element.compounds {
        vbox.append(&line(&format!("{}  {}", report::subscript_formula(&c.formula), c.name)));
    }
    vbox
}

/// Detail window for one element, with favorite toggle and comparison entry point
pub fn show(views: &Views, state: Rc<RefCell<AppState>>, atomic_number: u32) {
    let (element, is_favorite, high_contrast) = {
        let st = state.borrow();
        match st.element(atomic_number) {
            Some(e) => (e.clone(), st.is_favorite(atomic_number), st.config.accessibility.high_contrast),
            None => {
                log::error!("Element not found: {}", atomic_number);
                return;
            }
        }
    };
    log::info!("{}", report::element_summary(&element).trim_end());
    state.borrow().announce(&format!("Opened details for {}", element.display_label()));

    let window = gtk::Window::builder()
        .title(element.display_label())
        .transient_for(&views.window)
        .default_width(520)
        .default_height(580)
        .build();

    let main_vbox = gtk::Box::new(gtk::Orientation::Vertical, 0);

    // --- Header ---
    let header = gtk::Box::new(gtk::Orientation::Horizontal, 15);
    header.set_margin_top(15);
    header.set_margin_start(15);
    header.set_margin_end(15);
    header.set_margin_bottom(10);

    let color = if high_contrast { element.category.high_contrast_color() } else { element.category.color() };
    let symbol = gtk::Label::new(None);
    symbol.set_markup(&format!(
        "<span size='xx-large' weight='bold' foreground='{}'>{}</span>",
        rgb_hex(color),
        glib::markup_escape_text(&element.symbol)
    ));
    header.append(&symbol);

    let titles = gtk::Box::new(gtk::Orientation::Vertical, 2);
    let name = gtk::Label::new(None);
    name.set_markup(&format!("<b>{}</b>", glib::markup_escape_text(&element.name)));
    name.set_halign(gtk::Align::Start);
    titles.append(&name);
    let number = gtk::Label::new(Some(&format!("Atomic number {}", element.atomic_number)));
    number.set_halign(gtk::Align::Start);
    titles.append(&number);
    titles.set_hexpand(true);
    header.append(&titles);

    let fav_btn = gtk::ToggleButton::with_label(favorite_label(is_favorite));
    fav_btn.set_active(is_favorite);
    fav_btn.set_valign(gtk::Align::Center);
    let (s, v) = (state.clone(), views.clone());
    fav_btn.connect_toggled(move |btn| {
        let result = s.borrow_mut().toggle_favorite(atomic_number);
        match result {
            Ok(now) => btn.set_label(favorite_label(now)),
            Err(e) => show_error(&v.window, "Could not update favorites", &e.to_string()),
        }
        v.refresh(&s);
    });
    header.append(&fav_btn);

    let compare_btn = gtk::Button::with_label("Compare…");
    compare_btn.set_valign(gtk::Align::Center);
    let (s, v, w) = (state.clone(), views.clone(), window.clone());
    compare_btn.connect_clicked(move |_| {
        let step = s.borrow_mut().pick_for_comparison(atomic_number);
        match step {
            Ok(PickStep::FirstChosen) => {
                s.borrow().announce("Select the second element to compare");
                comparison_window::open(&v, s.clone());
            }
            Ok(PickStep::Ready(..)) => comparison_window::open(&v, s.clone()),
            Err(e) => show_error(&v.window, "Comparison failed", &e.to_string()),
        }
        w.close();
    });
    header.append(&compare_btn);
    main_vbox.append(&header);

    // --- Tabs ---
    let notebook = gtk::Notebook::new();
    notebook.set_vexpand(true);
    notebook.append_page(&basics_tab(&element), Some(&gtk::Label::new(Some("Basics"))));
    notebook.append_page(&properties_tab(&element), Some(&gtk::Label::new(Some("Properties"))));
    notebook.append_page(&electrons_tab(&element, &state), Some(&gtk::Label::new(Some("Electrons"))));

    let uses = gtk::ScrolledWindow::builder()
        .hscrollbar_policy(gtk::PolicyType::Never)
        .child(&uses_tab(&element))
        .build();
    notebook.append_page(&uses, Some(&gtk::Label::new(Some("Applications"))));
    main_vbox.append(&notebook);

    // --- Footer ---
    let footer = gtk::Box::new(gtk::Orientation::Horizontal, 10);
    footer.set_margin_top(10);
    footer.set_margin_bottom(10);
    footer.set_margin_end(10);
    footer.set_halign(gtk::Align::End);
    let btn_close = gtk::Button::with_label("Close");
    let win_clone = window.clone();
    btn_close.connect_clicked(move |_| win_clone.close());
    footer.append(&btn_close);
    main_vbox.append(&footer);

    // Esc closes
    let keys = gtk::EventControllerKey::new();
    let win_clone = window.clone();
    keys.connect_key_pressed(move |_, key, _, _| {
        if key == gtk::gdk::Key::Escape {
            win_clone.close();
            return glib::Propagation::Stop;
        }
        glib::Propagation::Proceed
    });
    window.add_controller(keys);

    window.set_child(Some(&main_vbox));
    window.present();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex() {
        assert_eq!(rgb_hex((1.0, 0.0, 0.5)), "#ff0080");
        assert_eq!(rgb_hex((0.0, 0.0, 0.0)), "#000000");
    }
}
