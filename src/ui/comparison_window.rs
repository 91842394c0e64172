// src/ui/comparison_window.rs

use gtk4::{self as gtk, glib, prelude::*};
use std::cell::RefCell;
use std::rc::Rc;

use crate::analysis::comparison::{self, ComparisonSlots, Greater};
use crate::state::AppState;
use crate::ui::Views;
use crate::utils::report;

/// Non-modal window comparing the two comparison slots
#[derive(Clone)]
pub struct ComparisonWindow {
    pub window: gtk::Window,
    first: gtk::DropDown,
    second: gtk::DropDown,
    grid: gtk::Grid,
    hint: gtk::Label,
}

/// Dropdown index 0 is the empty choice, then elements in dataset order
fn slot_index(state: &AppState, slot: Option<u32>) -> u32 {
    slot.and_then(|z| state.elements.iter().position(|e| e.atomic_number == z))
        .map_or(0, |i| i as u32 + 1)
}

fn slot_value(state: &AppState, index: u32) -> Option<u32> {
    (index as usize)
        .checked_sub(1)
        .and_then(|i| state.elements.get(i))
        .map(|e| e.atomic_number)
}

fn cell(text: &str, bold: bool) -> gtk::Label {
    let label = gtk::Label::new(None);
    let escaped = glib::markup_escape_text(text);
    if bold {
        label.set_markup(&format!("<b>{}</b>", escaped));
    } else {
        label.set_text(text);
    }
    label.set_halign(gtk::Align::Start);
    label.set_selectable(true);
    label
}

impl ComparisonWindow {
    fn build(views: &Views, state: &Rc<RefCell<AppState>>) -> Self {
        let window = gtk::Window::builder()
            .title("Compare Elements")
            .transient_for(&views.window)
            .default_width(720)
            .default_height(520)
            .build();

        let labels: Vec<String> = {
            let st = state.borrow();
            std::iter::once("Choose an element…".to_string())
                .chain(st.elements.iter().map(|e| format!("{} · {}", e.atomic_number, e.display_label())))
                .collect()
        };
        let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();

        let main_vbox = gtk::Box::new(gtk::Orientation::Vertical, 10);
        main_vbox.set_margin_top(15);
        main_vbox.set_margin_bottom(15);
        main_vbox.set_margin_start(15);
        main_vbox.set_margin_end(15);

        let selectors = gtk::Box::new(gtk::Orientation::Horizontal, 10);
        let first = gtk::DropDown::from_strings(&label_refs);
        first.set_hexpand(true);
        let second = gtk::DropDown::from_strings(&label_refs);
        second.set_hexpand(true);
        selectors.append(&first);
        selectors.append(&gtk::Label::new(Some("vs")));
        selectors.append(&second);
        main_vbox.append(&selectors);

        let hint = gtk::Label::builder().halign(gtk::Align::Start).wrap(true).build();
        hint.add_css_class("dim-label");
        main_vbox.append(&hint);

        let grid = gtk::Grid::builder().row_spacing(6).column_spacing(20).build();
        let scroll = gtk::ScrolledWindow::builder()
            .hscrollbar_policy(gtk::PolicyType::Automatic)
            .vexpand(true)
            .child(&grid)
            .build();
        main_vbox.append(&scroll);

        let footer = gtk::Box::new(gtk::Orientation::Horizontal, 10);
        footer.set_halign(gtk::Align::End);
        let btn_copy = gtk::Button::with_label("Copy as Text");
        let btn_close = gtk::Button::with_label("Close");
        footer.append(&btn_copy);
        footer.append(&btn_close);
        main_vbox.append(&footer);

        window.set_child(Some(&main_vbox));

        let this = Self { window, first, second, grid, hint };

        let (s, w) = (state.clone(), this.clone());
        this.first.connect_selected_notify(move |_| w.on_selector_changed(&s));
        let (s, w) = (state.clone(), this.clone());
        this.second.connect_selected_notify(move |_| w.on_selector_changed(&s));

        let s = state.clone();
        let win = this.window.clone();
        btn_copy.connect_clicked(move |_| {
            let text = {
                let st = s.borrow();
                st.comparison.pair().and_then(|(a, b)| {
                    let (a, b) = (st.element(a)?, st.element(b)?);
                    Some(report::comparison_report(a, b, &comparison::compare(a, b)))
                })
            };
            match text {
                Some(text) => {
                    win.clipboard().set_text(&text);
                    log::info!("Comparison copied to clipboard");
                }
                None => log::warn!("Pick two elements before copying"),
            }
        });

        let win = this.window.clone();
        btn_close.connect_clicked(move |_| win.close());

        // Closing abandons any half-finished selection
        let (s, slot) = (state.clone(), views.comparison.clone());
        this.window.connect_close_request(move |_| {
            s.borrow_mut().comparison = ComparisonSlots::default();
            slot.replace(None);
            glib::Propagation::Proceed
        });

        this
    }

    fn on_selector_changed(&self, state: &Rc<RefCell<AppState>>) {
        let (first, second, current) = {
            let st = state.borrow();
            (
                slot_value(&st, self.first.selected()),
                slot_value(&st, self.second.selected()),
                (st.comparison.first, st.comparison.second),
            )
        };
        if (first, second) == current {
            return;
        }
        state.borrow_mut().comparison.set(first, second);
        self.sync(state);
    }

    /// Mirrors the slots into the selectors and rebuilds the table
    pub fn sync(&self, state: &Rc<RefCell<AppState>>) {
        let (first_idx, second_idx, awaiting, rows, headers) = {
            let st = state.borrow();
            let slots = st.comparison;
            let pair = slots
                .pair()
                .and_then(|(a, b)| Some((st.element(a)?, st.element(b)?)));
            let (rows, headers) = match pair {
                Some((a, b)) => (comparison::compare(a, b), Some((a.display_label(), b.display_label()))),
                None => (Vec::new(), None),
            };
            (
                slot_index(&st, slots.first),
                slot_index(&st, slots.second),
                slots.is_awaiting(),
                rows,
                headers,
            )
        };

        if self.first.selected() != first_idx {
            self.first.set_selected(first_idx);
        }
        if self.second.selected() != second_idx {
            self.second.set_selected(second_idx);
        }

        let hint = if awaiting {
            "Click a second element in the table, or choose one above."
        } else if headers.is_none() {
            "Choose two elements to compare."
        } else {
            ""
        };
        self.hint.set_text(hint);
        self.hint.set_visible(!hint.is_empty());

        while let Some(child) = self.grid.first_child() {
            self.grid.remove(&child);
        }
        let Some((first_label, second_label)) = headers else {
            return;
        };

        for (col, title) in ["Property", first_label.as_str(), second_label.as_str(), "Difference"]
            .iter()
            .enumerate()
        {
            self.grid.attach(&cell(title, true), col as i32, 0, 1, 1);
        }

        for (i, row) in rows.iter().enumerate() {
            let r = i as i32 + 1;
            let caption = match row.unit {
                Some(unit) => format!("{} ({})", row.label, unit),
                None => row.label.to_string(),
            };
            self.grid.attach(&cell(&caption, false), 0, r, 1, 1);

            let greater = row.difference.map(|d| d.greater);
            let first_cell = cell(&row.first, greater == Some(Greater::First));
            let second_cell = cell(&row.second, greater == Some(Greater::Second));
            self.grid.attach(&first_cell, 1, r, 1, 1);
            self.grid.attach(&second_cell, 2, r, 1, 1);

            let diff = row.difference.map(|d| d.describe()).unwrap_or_else(|| "-".to_string());
            let diff_cell = cell(&diff, false);
            diff_cell.add_css_class("dim-label");
            self.grid.attach(&diff_cell, 3, r, 1, 1);
        }
    }
}

/// Shows the window, reusing the open one if there is one
pub fn open(views: &Views, state: Rc<RefCell<AppState>>) {
    let existing = views.comparison.borrow().clone();
    let win = match existing {
        Some(win) => win,
        None => {
            let win = ComparisonWindow::build(views, &state);
            views.comparison.replace(Some(win.clone()));
            win
        }
    };
    win.sync(&state);
    win.window.present();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrefStore;
    use crate::io::dataset;
    use tempfile::TempDir;

    #[test]
    fn test_slot_index_round_trip() {
        let tmp = TempDir::new().unwrap();
        let state = AppState::new(dataset::bundled().unwrap(), PrefStore::new(tmp.path()));

        assert_eq!(slot_index(&state, None), 0);
        assert_eq!(slot_value(&state, 0), None);

        let idx = slot_index(&state, Some(26));
        assert_eq!(idx, 26);
        assert_eq!(slot_value(&state, idx), Some(26));
        assert_eq!(slot_value(&state, 10_000), None);
    }
}
