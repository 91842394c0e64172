// src/rendering/mod.rs
pub mod chart;
pub mod export;
pub mod layout;
pub mod painter;

use crate::state::AppState;
use gtk4::prelude::*;
use gtk4::DrawingArea;
use std::cell::RefCell;
use std::rc::Rc;

pub use export::{export_chart, export_table, ImageFormat};
pub use layout::{Slot, TableLayout};

/// Layout for the widget's current allocation
pub fn widget_layout(drawing_area: &DrawingArea, state: &AppState) -> TableLayout {
    TableLayout::compute(
        &state.elements,
        drawing_area.width() as f64,
        drawing_area.height() as f64,
    )
}

// --- Screen Rendering Entry Point ---
pub fn setup_drawing(drawing_area: &DrawingArea, state: Rc<RefCell<AppState>>) {
    drawing_area.set_draw_func(move |_, cr, width, height| {
        let st = state.borrow();
        let layout = TableLayout::compute(&st.elements, width as f64, height as f64);
        if let Err(e) = painter::draw_table(cr, &st, &layout) {
            log::error!("Table drawing failed: {}", e);
        }
    });
}

/// Trend chart widget; draws a hint while no trend is active
pub fn setup_chart_drawing(drawing_area: &DrawingArea, state: Rc<RefCell<AppState>>) {
    drawing_area.set_draw_func(move |_, cr, width, height| {
        let st = state.borrow();
        match &st.trend {
            Some(view) => {
                if let Err(e) = chart::draw_on_cairo(cr, view, width as f64, height as f64, st.dark) {
                    log::error!("Chart drawing failed: {}", e);
                }
            }
            None => {
                let palette = painter::Palette::from_state(&st);
                let _ = painter::draw_background(cr, &palette);
                let (r, g, b) = palette.text;
                cr.set_source_rgb(r, g, b);
                cr.set_font_size(14.0);
                cr.move_to(12.0, height as f64 / 2.0);
                let _ = cr.show_text("Select a trend to see its chart.");
            }
        }
    });
}
