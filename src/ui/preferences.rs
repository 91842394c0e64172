// src/ui/preferences.rs

use crate::config::{Accessibility, Theme, FONT_SCALE_MAX, FONT_SCALE_MIN, FONT_SCALE_STEP};
use crate::state::AppState;
use crate::ui::Views;
use gtk4::{self as gtk, prelude::*};
use std::cell::RefCell;
use std::rc::Rc;

pub fn show_preferences_window(views: &Views, state: Rc<RefCell<AppState>>) {
    let window = gtk::Window::builder()
        .title("Preferences")
        .transient_for(&views.window)
        .modal(true)
        .default_width(480)
        .default_height(460)
        .resizable(false)
        .build();

    let main_vbox = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let notebook = gtk::Notebook::new();
    notebook.set_vexpand(true);

    // TAB 1: Appearance
    let appearance_tab = build_appearance_tab(views, state.clone());
    notebook.append_page(&appearance_tab, Some(&gtk::Label::new(Some("Appearance"))));

    // TAB 2: Accessibility
    let a11y_tab = build_accessibility_tab(views, state.clone());
    notebook.append_page(&a11y_tab, Some(&gtk::Label::new(Some("Accessibility"))));

    main_vbox.append(&notebook);

    // Footer
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

    window.set_child(Some(&main_vbox));
    window.present();
}

fn tab_box() -> gtk::Box {
    let vbox = gtk::Box::new(gtk::Orientation::Vertical, 15);
    vbox.set_margin_top(20);
    vbox.set_margin_bottom(20);
    vbox.set_margin_start(20);
    vbox.set_margin_end(20);
    vbox
}

fn theme_index(theme: Option<Theme>) -> u32 {
    match theme {
        None => 0,
        Some(Theme::Light) => 1,
        Some(Theme::Dark) => 2,
    }
}

fn theme_at(index: u32) -> Option<Theme> {
    match index {
        1 => Some(Theme::Light),
        2 => Some(Theme::Dark),
        _ => None,
    }
}

/// Snaps a slider value onto the allowed font scale steps
fn snap_font_scale(value: f64) -> u32 {
    let step = FONT_SCALE_STEP as f64;
    let snapped = (value / step).round() * step;
    (snapped as u32).clamp(FONT_SCALE_MIN, FONT_SCALE_MAX)
}

// ============================================================================
// TAB 1: APPEARANCE
// ============================================================================

fn build_appearance_tab(views: &Views, state: Rc<RefCell<AppState>>) -> gtk::Box {
    let vbox = tab_box();

    let theme_label = gtk::Label::new(Some("Theme:"));
    theme_label.set_halign(gtk::Align::Start);
    vbox.append(&theme_label);

    let theme_dropdown = gtk::DropDown::from_strings(&["Follow System", "Light", "Dark"]);
    theme_dropdown.set_selected(theme_index(state.borrow().config.theme));
    let (s, v) = (state.clone(), views.clone());
    theme_dropdown.connect_selected_notify(move |d| {
        let theme = theme_at(d.selected());
        if s.borrow().config.theme == theme {
            return;
        }
        let result = s.borrow_mut().set_theme(theme, v.system_dark);
        if let Err(e) = result {
            log::error!("Could not save theme: {}", e);
        }
        v.refresh(&s);
    });
    vbox.append(&theme_dropdown);

    let hint = gtk::Label::new(Some("The table, legend and chart follow the selected theme."));
    hint.set_halign(gtk::Align::Start);
    hint.set_wrap(true);
    hint.add_css_class("dim-label");
    vbox.append(&hint);

    vbox
}

// ============================================================================
// TAB 2: ACCESSIBILITY
// ============================================================================

/// Applies one edit to the accessibility settings, persisting only real changes
fn update_accessibility(state: &Rc<RefCell<AppState>>, views: &Views, edit: impl FnOnce(&mut Accessibility)) {
    let current = state.borrow().config.accessibility;
    let mut next = current;
    edit(&mut next);
    if next == current {
        return;
    }
    let result = state.borrow_mut().set_accessibility(next);
    if let Err(e) = result {
        log::error!("Could not save accessibility settings: {}", e);
    }
    views.refresh(state);
}

fn build_accessibility_tab(views: &Views, state: Rc<RefCell<AppState>>) -> gtk::Box {
    let vbox = tab_box();
    let a11y = state.borrow().config.accessibility;

    let check = |label: &str, active: bool| {
        let c = gtk::CheckButton::with_label(label);
        c.set_active(active);
        c
    };

    let high_contrast = check("High contrast colors", a11y.high_contrast);
    let (s, v) = (state.clone(), views.clone());
    high_contrast.connect_toggled(move |c| {
        let on = c.is_active();
        update_accessibility(&s, &v, |a| a.high_contrast = on);
    });
    vbox.append(&high_contrast);

    let reduced_motion = check("Reduce motion", a11y.reduced_motion);
    let (s, v) = (state.clone(), views.clone());
    reduced_motion.connect_toggled(move |c| {
        let on = c.is_active();
        update_accessibility(&s, &v, |a| a.reduced_motion = on);
    });
    vbox.append(&reduced_motion);

    let screen_reader = check("Screen reader announcements", a11y.screen_reader_mode);
    let (s, v) = (state.clone(), views.clone());
    screen_reader.connect_toggled(move |c| {
        let on = c.is_active();
        update_accessibility(&s, &v, |a| a.screen_reader_mode = on);
    });
    vbox.append(&screen_reader);

    let keyboard = check("Arrow-key navigation on the table", a11y.keyboard_navigation);
    let (s, v) = (state.clone(), views.clone());
    keyboard.connect_toggled(move |c| {
        let on = c.is_active();
        update_accessibility(&s, &v, |a| a.keyboard_navigation = on);
    });
    vbox.append(&keyboard);

    let focus = check("Emphasize keyboard focus", a11y.focus_visible);
    let (s, v) = (state.clone(), views.clone());
    focus.connect_toggled(move |c| {
        let on = c.is_active();
        update_accessibility(&s, &v, |a| a.focus_visible = on);
    });
    vbox.append(&focus);

    // Font scale
    vbox.append(&gtk::Separator::new(gtk::Orientation::Horizontal));
    let font_label = gtk::Label::new(Some("Tile Font Size (%):"));
    font_label.set_halign(gtk::Align::Start);
    vbox.append(&font_label);

    let font_scale = gtk::Scale::with_range(
        gtk::Orientation::Horizontal,
        FONT_SCALE_MIN as f64,
        FONT_SCALE_MAX as f64,
        FONT_SCALE_STEP as f64,
    );
    font_scale.set_value(a11y.font_scale as f64);
    font_scale.set_draw_value(true);
    font_scale.set_digits(0);
    font_scale.set_value_pos(gtk::PositionType::Right);
    let (s, v) = (state.clone(), views.clone());
    font_scale.connect_value_changed(move |sc| {
        let percent = snap_font_scale(sc.value());
        update_accessibility(&s, &v, |a| a.set_font_scale(percent));
    });
    vbox.append(&font_scale);

    // Reset: state first, so the widget handlers below see matching values
    let btn_reset = gtk::Button::with_label("Reset to Defaults");
    btn_reset.set_halign(gtk::Align::Start);
    btn_reset.set_margin_top(10);
    let (s, v) = (state.clone(), views.clone());
    btn_reset.connect_clicked(move |_| {
        let defaults = Accessibility::default();
        let result = s.borrow_mut().set_accessibility(defaults);
        if let Err(e) = result {
            log::error!("Could not save accessibility settings: {}", e);
        }
        high_contrast.set_active(defaults.high_contrast);
        reduced_motion.set_active(defaults.reduced_motion);
        screen_reader.set_active(defaults.screen_reader_mode);
        keyboard.set_active(defaults.keyboard_navigation);
        focus.set_active(defaults.focus_visible);
        font_scale.set_value(defaults.font_scale as f64);
        log::info!("Accessibility settings reset");
        v.refresh(&s);
    });
    vbox.append(&btn_reset);

    vbox
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_index_round_trip() {
        for theme in [None, Some(Theme::Light), Some(Theme::Dark)] {
            assert_eq!(theme_at(theme_index(theme)), theme);
        }
    }

    #[test]
    fn test_snap_font_scale() {
        assert_eq!(snap_font_scale(104.0), 100);
        assert_eq!(snap_font_scale(106.0), 110);
        assert_eq!(snap_font_scale(10.0), FONT_SCALE_MIN);
        assert_eq!(snap_font_scale(400.0), FONT_SCALE_MAX);
    }
}
