// src/ui/export_dialog.rs

use gtk4::prelude::*;
use gtk4::{
    Box as GtkBox, CheckButton, ComboBoxText, Dialog, FileChooserAction, FileChooserNative,
    FileFilter, Label, Orientation, PolicyType, ResponseType, ScrolledWindow, TextView,
};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::io::export::{self, DataFormat, ExportOptions, ExportRequest, FieldGroup, Selection};
use crate::rendering::export::{export_chart, export_table, ImageFormat};
use crate::state::AppState;
use crate::ui::{show_error, Views};

const PREVIEW_RECORDS: usize = 3;

fn labeled_row(caption: &str, combo: &ComboBoxText) -> GtkBox {
    let row = GtkBox::new(Orientation::Horizontal, 10);
    let label = Label::new(Some(caption));
    label.set_width_chars(12);
    label.set_xalign(0.0);
    combo.set_hexpand(true);
    row.append(&label);
    row.append(combo);
    row
}

fn save_chooser(parent: &impl IsA<gtk4::Window>, title: &str, filter_name: &str, extension: &str, suggested: &str) -> FileChooserNative {
    let chooser = FileChooserNative::new(
        Some(title),
        Some(parent),
        FileChooserAction::Save,
        Some("Save"),
        Some("Cancel"),
    );
    let filter = FileFilter::new();
    filter.set_name(Some(filter_name));
    filter.add_pattern(&format!("*.{}", extension));
    chooser.add_filter(&filter);
    chooser.set_current_name(suggested);
    chooser
}

/// Index 2 is the current search result set
fn selection_for(index: u32, state: &AppState) -> Selection {
    match index {
        1 => Selection::Favorites,
        2 => Selection::Custom(state.search_hits.iter().copied().collect::<BTreeSet<u32>>()),
        _ => Selection::All,
    }
}

#[derive(Clone)]
struct DataForm {
    format: ComboBoxText,
    selection: ComboBoxText,
    fields: Vec<(FieldGroup, CheckButton)>,
    metadata: CheckButton,
    pretty: CheckButton,
    preview: TextView,
}

impl DataForm {
    fn request(&self, state: &AppState) -> ExportRequest {
        let format = self
            .format
            .active()
            .and_then(|i| DataFormat::ALL.get(i as usize).copied())
            .unwrap_or(DataFormat::Json);
        ExportRequest {
            selection: selection_for(self.selection.active().unwrap_or(0), state),
            fields: self
                .fields
                .iter()
                .filter(|(_, check)| check.is_active())
                .map(|(group, _)| *group)
                .collect(),
            format,
            options: ExportOptions {
                include_metadata: self.metadata.is_active(),
                pretty: self.pretty.is_active(),
            },
        }
    }

    fn document(&self, state: &AppState) -> (ExportRequest, export::ExportDocument) {
        let request = self.request(state);
        let doc = export::prepare(&state.elements, state.favorites(), &request, chrono::Utc::now());
        (request, doc)
    }

    fn update_preview(&self, state: &Rc<RefCell<AppState>>) {
        let text = {
            let st = state.borrow();
            let (request, doc) = self.document(&st);
            if request.fields.is_empty() {
                "Select at least one field group.".to_string()
            } else if doc.elements.is_empty() {
                "No elements match this selection.".to_string()
            } else {
                match export::preview(&doc, request.format, &request.options, PREVIEW_RECORDS) {
                    Ok(text) => text,
                    Err(e) => format!("Preview failed: {}", e),
                }
            }
        };
        self.preview.buffer().set_text(&text);
    }
}

/// JSON / CSV / HTML export of the element data
pub fn show_data_export_dialog(views: &Views, state: Rc<RefCell<AppState>>) {
    let dialog = Dialog::builder()
        .title("Export Data")
        .transient_for(&views.window)
        .modal(true)
        .default_width(520)
        .default_height(560)
        .build();

    let content = dialog.content_area();
    let vbox = GtkBox::new(Orientation::Vertical, 12);
    vbox.set_margin_top(15);
    vbox.set_margin_bottom(15);
    vbox.set_margin_start(20);
    vbox.set_margin_end(20);

    // ========================================================================
    // FORMAT & SELECTION
    // ========================================================================
    let format = ComboBoxText::new();
    for f in DataFormat::ALL {
        format.append_text(f.label());
    }
    format.set_active(Some(0));
    vbox.append(&labeled_row("Format:", &format));

    let selection = ComboBoxText::new();
    selection.append_text("All elements");
    selection.append_text("Favorites");
    selection.append_text("Current search results");
    selection.set_active(Some(0));
    vbox.append(&labeled_row("Elements:", &selection));

    // ========================================================================
    // FIELDS
    // ========================================================================
    let fields_label = Label::new(Some("Fields:"));
    fields_label.set_xalign(0.0);
    fields_label.set_margin_top(5);
    vbox.append(&fields_label);

    let fields_box = GtkBox::new(Orientation::Horizontal, 10);
    fields_box.set_margin_start(10);
    let fields: Vec<(FieldGroup, CheckButton)> = FieldGroup::ALL
        .iter()
        .map(|group| {
            let check = CheckButton::with_label(group.label());
            check.set_active(group.default_selected());
            fields_box.append(&check);
            (*group, check)
        })
        .collect();
    vbox.append(&fields_box);

    // ========================================================================
    // OPTIONS
    // ========================================================================
    let metadata = CheckButton::with_label("Include metadata (JSON)");
    metadata.set_active(true);
    metadata.set_margin_start(10);
    vbox.append(&metadata);

    let pretty = CheckButton::with_label("Pretty print (JSON)");
    pretty.set_active(true);
    pretty.set_margin_start(10);
    vbox.append(&pretty);

    // ========================================================================
    // PREVIEW
    // ========================================================================
    let preview_label = Label::new(Some("Preview:"));
    preview_label.set_xalign(0.0);
    vbox.append(&preview_label);

    let preview = TextView::builder()
        .editable(false)
        .cursor_visible(false)
        .monospace(true)
        .left_margin(6)
        .top_margin(6)
        .build();
    let preview_scroll = ScrolledWindow::builder()
        .hscrollbar_policy(PolicyType::Automatic)
        .min_content_height(200)
        .vexpand(true)
        .child(&preview)
        .build();
    vbox.append(&preview_scroll);
    content.append(&vbox);

    let form = DataForm { format, selection, fields, metadata, pretty, preview };

    // Any change refreshes the preview
    let (f, s) = (form.clone(), state.clone());
    form.format.connect_changed(move |_| f.update_preview(&s));
    let (f, s) = (form.clone(), state.clone());
    form.selection.connect_changed(move |_| f.update_preview(&s));
    for check in form.fields.iter().map(|(_, c)| c).chain([&form.metadata, &form.pretty]) {
        let (f, s) = (form.clone(), state.clone());
        check.connect_toggled(move |_| f.update_preview(&s));
    }
    form.update_preview(&state);

    // ========================================================================
    // BUTTONS
    // ========================================================================
    dialog.add_button("Cancel", ResponseType::Cancel);
    dialog.add_button("Export", ResponseType::Ok);

    let v = views.clone();
    dialog.connect_response(move |dialog_ref, response| {
        if response != ResponseType::Ok {
            dialog_ref.close();
            return;
        }
        let (request, doc) = {
            let st = state.borrow();
            form.document(&st)
        };
        if request.fields.is_empty() {
            show_error(&v.window, "Nothing to export", "Select at least one field group.");
            return;
        }

        let chooser = save_chooser(
            &v.window,
            "Export Data",
            &format!("{} File", request.format.label()),
            request.format.extension(),
            &request.format.default_file_name(),
        );
        let v_inner = v.clone();
        chooser.connect_response(move |chooser, resp| {
            if resp == ResponseType::Accept {
                if let Some(path) = chooser.file().and_then(|f| f.path()) {
                    if let Err(e) = export::write(&path, &doc, request.format, &request.options) {
                        show_error(&v_inner.window, "Export failed", &e.to_string());
                    }
                }
            }
            chooser.destroy();
        });
        chooser.show();
        dialog_ref.close();
    });

    dialog.show();
}

/// PNG / PDF / SVG of the table, PNG / PDF of the trend chart
pub fn show_image_export_dialog(views: &Views, state: Rc<RefCell<AppState>>) {
    let dialog = Dialog::builder()
        .title("Export Image")
        .transient_for(&views.window)
        .modal(true)
        .default_width(420)
        .build();

    let content = dialog.content_area();
    let vbox = GtkBox::new(Orientation::Vertical, 15);
    vbox.set_margin_top(15);
    vbox.set_margin_bottom(15);
    vbox.set_margin_start(20);
    vbox.set_margin_end(20);

    let target = ComboBoxText::new();
    target.append_text("Periodic Table");
    target.append_text("Trend Chart");
    target.set_active(Some(0));
    vbox.append(&labeled_row("Image:", &target));

    let format = ComboBoxText::new();
    for f in ImageFormat::ALL {
        format.append_text(f.label());
    }
    format.set_active(Some(0));
    vbox.append(&labeled_row("Format:", &format));

    let note = Label::new(None);
    note.set_xalign(0.0);
    note.set_wrap(true);
    note.add_css_class("dim-label");
    vbox.append(&note);
    content.append(&vbox);

    // The chart has no SVG backend
    let (fmt, n, s) = (format.clone(), note.clone(), state.clone());
    target.connect_changed(move |combo| {
        let chart = combo.active() == Some(1);
        if chart && fmt.active() == Some(2) {
            fmt.set_active(Some(0));
        }
        let hint = if chart && s.borrow().trend.is_none() {
            "Select a trend first to export its chart."
        } else if chart {
            "Charts export as PNG or PDF."
        } else {
            ""
        };
        n.set_text(hint);
    });

    dialog.add_button("Cancel", ResponseType::Cancel);
    dialog.add_button("Export", ResponseType::Ok);

    let v = views.clone();
    dialog.connect_response(move |dialog_ref, response| {
        if response != ResponseType::Ok {
            dialog_ref.close();
            return;
        }
        let chart = target.active() == Some(1);
        let image_format = format
            .active()
            .and_then(|i| ImageFormat::ALL.get(i as usize).copied())
            .unwrap_or(ImageFormat::Png);
        if chart && state.borrow().trend.is_none() {
            show_error(&v.window, "No chart to export", "Select a trend first.");
            return;
        }

        let stem = if chart { "trend-chart" } else { "periodic-table" };
        let chooser = save_chooser(
            &v.window,
            "Export Image",
            image_format.label(),
            image_format.extension(),
            &format!("{}.{}", stem, image_format.extension()),
        );

        let (s, v_inner) = (state.clone(), v.clone());
        chooser.connect_response(move |chooser, resp| {
            if resp == ResponseType::Accept {
                if let Some(path) = chooser.file().and_then(|f| f.path()) {
                    let result = {
                        let st = s.borrow();
                        match (&st.trend, chart) {
                            (Some(view), true) => export_chart(view, &path, image_format, st.dark),
                            _ => export_table(&st, &path, image_format),
                        }
                    };
                    match result {
                        Ok(()) => log::info!("Image exported to {:?}", path),
                        Err(e) => show_error(&v_inner.window, "Image export failed", &e.to_string()),
                    }
                }
            }
            chooser.destroy();
        });
        chooser.show();
        dialog_ref.close();
    });

    dialog.show();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrefStore;
    use crate::io::dataset;
    use tempfile::TempDir;

    #[test]
    fn test_selection_for_search_hits() {
        let tmp = TempDir::new().unwrap();
        let mut state = AppState::new(dataset::bundled().unwrap(), PrefStore::new(tmp.path()));
        state.set_search("Fe");

        assert_eq!(selection_for(0, &state), Selection::All);
        assert_eq!(selection_for(1, &state), Selection::Favorites);
        match selection_for(2, &state) {
            Selection::Custom(set) => assert!(set.contains(&26)),
            other => panic!("unexpected selection {:?}", other),
        }
    }
}
