// src/rendering/painter.rs

use super::layout::{marker_label, Cell, Slot, TableLayout, COLUMNS, STRIP_FIRST_COLUMN};
use crate::analysis::trends::{TrendDefinition, TrendLevel, LEVELS};
use crate::model::electron_config::Shell;
use crate::model::{Element, Series};
use crate::state::{AppState, TileVisual};
use cairo::{Context, FontSlant, FontWeight, LinearGradient};
use std::f64::consts::PI;

pub type Rgb = (f64, f64, f64);

pub fn hex_rgb(hex: u32) -> Rgb {
    (
        ((hex >> 16) & 0xFF) as f64 / 255.0,
        ((hex >> 8) & 0xFF) as f64 / 255.0,
        (hex & 0xFF) as f64 / 255.0,
    )
}

/// Level 1..=5 picks every other entry of the 10-step scale
pub fn level_color(def: &TrendDefinition, level: u8) -> Rgb {
    let level = level.clamp(1, LEVELS) as usize;
    hex_rgb(def.color_scale[level * 2 - 1])
}

/// Black or white, whichever reads better on `bg`
pub fn text_color(bg: Rgb) -> Rgb {
    let luminance = 0.299 * bg.0 + 0.587 * bg.1 + 0.114 * bg.2;
    if luminance > 0.55 { (0.1, 0.1, 0.1) } else { (1.0, 1.0, 1.0) }
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Rgb,
    pub text: Rgb,
    pub unknown: Rgb,
    pub focus: Rgb,
    pub highlight: Rgb,
    pub marker: Rgb,
    pub high_contrast: bool,
    /// Thicker focus ring
    pub strong_focus: bool,
}

impl Palette {
    pub fn new(dark: bool, high_contrast: bool) -> Self {
        let (background, text) = match (dark, high_contrast) {
            (_, true) if dark => ((0.0, 0.0, 0.0), (1.0, 1.0, 1.0)),
            (_, true) => ((1.0, 1.0, 1.0), (0.0, 0.0, 0.0)),
            (true, false) => ((0.12, 0.13, 0.15), (0.92, 0.92, 0.92)),
            (false, false) => ((0.97, 0.97, 0.98), (0.15, 0.15, 0.18)),
        };
        Self {
            background,
            text,
            unknown: if dark { (0.30, 0.30, 0.32) } else { (0.85, 0.85, 0.85) },
            focus: if high_contrast { (1.0, 0.0, 1.0) } else { (0.16, 0.50, 0.73) },
            highlight: (0.95, 0.77, 0.06),
            marker: if dark { (0.25, 0.27, 0.30) } else { (0.88, 0.90, 0.93) },
            high_contrast,
            strong_focus: false,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        let a11y = &state.config.accessibility;
        Self {
            strong_focus: a11y.focus_visible,
            ..Self::new(state.dark, a11y.high_contrast)
        }
    }

    pub fn category_color(&self, element: &Element) -> Rgb {
        if self.high_contrast {
            element.category.high_contrast_color()
        } else {
            element.category.color()
        }
    }
}

fn rounded_rect(cr: &Context, x: f64, y: f64, w: f64, h: f64, r: f64) {
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
    cr.arc(x + r, y + r, r, PI, 1.5 * PI);
    cr.close_path();
}

/// Draws `text` centered on `cx`, shrinking the font until it fits `max_width`
fn centered_text(cr: &Context, text: &str, cx: f64, baseline: f64, size: f64, max_width: f64) -> Result<(), cairo::Error> {
    cr.set_font_size(size);
    let mut ext = cr.text_extents(text)?;
    if ext.width() > max_width && ext.width() > 0.0 {
        cr.set_font_size(size * max_width / ext.width());
        ext = cr.text_extents(text)?;
    }
    cr.move_to(cx - ext.width() / 2.0 - ext.x_bearing(), baseline);
    cr.show_text(text)
}

fn star_path(cr: &Context, cx: f64, cy: f64, outer: f64) {
    let inner = outer * 0.45;
    for i in 0..10 {
        let r = if i % 2 == 0 { outer } else { inner };
        let a = -PI / 2.0 + i as f64 * PI / 5.0;
        let (x, y) = (cx + r * a.cos(), cy + r * a.sin());
        if i == 0 {
            cr.move_to(x, y);
        } else {
            cr.line_to(x, y);
        }
    }
    cr.close_path();
}

pub fn draw_background(cr: &Context, palette: &Palette) -> Result<(), cairo::Error> {
    let (r, g, b) = palette.background;
    cr.set_source_rgb(r, g, b);
    cr.paint()
}

pub fn draw_tile(
    cr: &Context,
    element: &Element,
    cell: &Cell,
    visual: &TileVisual,
    trend: Option<&TrendDefinition>,
    palette: &Palette,
    font_factor: f64,
    hovered: bool,
) -> Result<(), cairo::Error> {
    let s = cell.size;
    let (x, y) = (cell.x, cell.y);

    let fill = match (visual.trend, trend) {
        (Some(TrendLevel::Level(l)), Some(def)) => level_color(def, l),
        (Some(TrendLevel::Unknown), _) => palette.unknown,
        _ => palette.category_color(element),
    };
    let alpha = if visual.dimmed { 0.25 } else { 1.0 };

    cr.save()?;
    rounded_rect(cr, x, y, s, s, s * 0.08);
    let lift = if hovered && !visual.dimmed { 0.08 } else { 0.0 };
    cr.set_source_rgba((fill.0 + lift).min(1.0), (fill.1 + lift).min(1.0), (fill.2 + lift).min(1.0), alpha);
    cr.fill_preserve()?;

    if visual.highlighted {
        let (r, g, b) = palette.highlight;
        cr.set_source_rgba(r, g, b, alpha);
        cr.set_line_width((s * 0.06).max(2.0));
        cr.stroke_preserve()?;
    }
    if palette.high_contrast {
        cr.set_source_rgba(0.0, 0.0, 0.0, alpha);
        cr.set_line_width(1.0);
        cr.stroke_preserve()?;
    }
    cr.new_path();

    // Unknown value: hatch the tile so it never reads as a low level
    if visual.trend == Some(TrendLevel::Unknown) {
        rounded_rect(cr, x, y, s, s, s * 0.08);
        cr.clip();
        cr.set_source_rgba(0.5, 0.5, 0.5, 0.35 * alpha);
        cr.set_line_width(1.0);
        let mut offset = -s;
        while offset < s {
            cr.move_to(x + offset, y + s);
            cr.line_to(x + offset + s, y);
            offset += s * 0.15;
        }
        cr.stroke()?;
        cr.reset_clip();
    }

    let (tr, tg, tb) = text_color(fill);
    cr.set_source_rgba(tr, tg, tb, alpha);

    cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Normal);
    cr.set_font_size(s * 0.16 * font_factor);
    cr.move_to(x + s * 0.08, y + s * 0.22);
    cr.show_text(&element.atomic_number.to_string())?;

    cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Bold);
    centered_text(cr, &element.symbol, x + s / 2.0, y + s * 0.62, s * 0.34 * font_factor, s * 0.9)?;

    cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Normal);
    let caption = if visual.trend == Some(TrendLevel::Unknown) { "?" } else { element.name.as_str() };
    centered_text(cr, caption, x + s / 2.0, y + s * 0.86, s * 0.12 * font_factor, s * 0.9)?;

    if visual.favorite {
        star_path(cr, x + s * 0.84, y + s * 0.16, s * 0.1);
        cr.set_source_rgba(0.95, 0.77, 0.06, alpha);
        cr.fill_preserve()?;
        cr.set_source_rgba(0.4, 0.3, 0.0, alpha);
        cr.set_line_width(0.8);
        cr.stroke()?;
    }

    if visual.focused {
        let (r, g, b) = palette.focus;
        cr.set_source_rgb(r, g, b);
        let width = (s * 0.05).max(2.0);
        cr.set_line_width(if palette.strong_focus { width * 2.0 } else { width });
        cr.set_dash(&[s * 0.08, s * 0.05], 0.0);
        rounded_rect(cr, x - 2.0, y - 2.0, s + 4.0, s + 4.0, s * 0.1);
        cr.stroke()?;
        cr.set_dash(&[], 0.0);
    }

    cr.restore()
}

pub fn draw_marker(cr: &Context, cell: &Cell, series: Series, active: bool, palette: &Palette, font_factor: f64) -> Result<(), cairo::Error> {
    let s = cell.size;
    cr.save()?;
    rounded_rect(cr, cell.x, cell.y, s, s, s * 0.08);
    let (r, g, b) = palette.marker;
    cr.set_source_rgb(r, g, b);
    cr.fill_preserve()?;
    let (r, g, b) = if active { palette.highlight } else { palette.text };
    cr.set_source_rgb(r, g, b);
    cr.set_line_width(if active { (s * 0.06).max(2.0) } else { 1.0 });
    cr.set_dash(&[4.0, 3.0], 0.0);
    cr.stroke()?;
    cr.set_dash(&[], 0.0);

    let (r, g, b) = palette.text;
    cr.set_source_rgb(r, g, b);
    cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Bold);
    centered_text(cr, marker_label(series), cell.x + s / 2.0, cell.y + s * 0.58, s * 0.2 * font_factor, s * 0.9)?;
    cr.restore()
}

/// Gradient bar plus the five level swatches with "Lower"/"Higher" captions
pub fn draw_legend(cr: &Context, def: &TrendDefinition, x: f64, y: f64, w: f64, h: f64, palette: &Palette) -> Result<(), cairo::Error> {
    cr.save()?;
    let (tr, tg, tb) = palette.text;

    cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Bold);
    cr.set_font_size(h * 0.22);
    cr.set_source_rgb(tr, tg, tb);
    cr.move_to(x, y + h * 0.2);
    cr.show_text(&format!("{} ({})", def.name, def.unit))?;

    let bar_y = y + h * 0.3;
    let bar_h = h * 0.12;
    let gradient = LinearGradient::new(x, 0.0, x + w, 0.0);
    let steps = def.color_scale.len();
    for i in 0..steps {
        let hex = if def.reverse { def.color_scale[steps - 1 - i] } else { def.color_scale[i] };
        let (r, g, b) = hex_rgb(hex);
        gradient.add_color_stop_rgb(i as f64 / (steps - 1) as f64, r, g, b);
    }
    cr.set_source(&gradient)?;
    cr.rectangle(x, bar_y, w, bar_h);
    cr.fill()?;

    let cell_w = w / LEVELS as f64;
    let cell_y = bar_y + bar_h + h * 0.06;
    let cell_h = h * 0.22;
    cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Normal);
    for (i, (level, label)) in def.legend().iter().enumerate() {
        let cx = x + i as f64 * cell_w;
        let (r, g, b) = level_color(def, *level);
        cr.set_source_rgb(r, g, b);
        cr.rectangle(cx + 1.0, cell_y, cell_w - 2.0, cell_h);
        cr.fill()?;
        if !label.is_empty() {
            cr.set_source_rgb(tr, tg, tb);
            centered_text(cr, label, cx + cell_w / 2.0, cell_y + cell_h + h * 0.18, h * 0.16, cell_w)?;
        }
    }
    cr.restore()
}

/// Table, markers and (when a trend is active) the legend in the empty block above the d-metals
pub fn draw_table(cr: &Context, state: &AppState, layout: &TableLayout) -> Result<(), cairo::Error> {
    let palette = Palette::from_state(state);
    let font_factor = state.config.accessibility.font_factor();
    let trend = state.trend.as_ref().map(|t| t.definition());

    draw_background(cr, &palette)?;

    for cell in layout.cells() {
        match cell.slot {
            Slot::Element(z) => {
                let Some(element) = state.element(z) else { continue };
                let visual = state.tile_visual(element);
                draw_tile(cr, element, cell, &visual, trend, &palette, font_factor, state.hovered == Some(z))?;
            }
            Slot::Marker(series) => {
                let active = state.highlighted_series == Some(series);
                draw_marker(cr, cell, series, active, &palette, font_factor)?;
            }
        }
    }

    if let Some(def) = trend {
        let p = layout.pitch;
        let x = layout.origin.0 + (STRIP_FIRST_COLUMN as f64) * p;
        let w = (COLUMNS as f64 - 8.0) * p;
        draw_legend(cr, def, x, layout.origin.1 + 0.1 * p, w, 2.2 * p, &palette)?;
    }
    Ok(())
}

/// Bohr-style diagram: nucleus, one ring per shell, at most 8 electrons per ring.
/// `phase` rotates the electrons; outer shells turn slower.
pub fn draw_shells(cr: &Context, element: &Element, shells: &[Shell], width: f64, height: f64, phase: f64, palette: &Palette) -> Result<(), cairo::Error> {
    draw_background(cr, palette)?;
    let (cx, cy) = (width / 2.0, height / 2.0);
    let max_r = width.min(height) / 2.0 - 10.0;
    if max_r <= 0.0 {
        return Ok(());
    }
    let nucleus_r = (max_r * 0.14).max(8.0);
    let ring_step = (max_r - nucleus_r) / shells.len().max(1) as f64;

    let (r, g, b) = palette.category_color(element);
    cr.set_source_rgb(r, g, b);
    cr.arc(cx, cy, nucleus_r, 0.0, 2.0 * PI);
    cr.fill()?;
    let (tr, tg, tb) = text_color((r, g, b));
    cr.set_source_rgb(tr, tg, tb);
    cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Bold);
    centered_text(cr, &element.symbol, cx, cy + nucleus_r * 0.35, nucleus_r, nucleus_r * 1.8)?;

    let (lr, lg, lb) = palette.text;
    for (i, shell) in shells.iter().enumerate() {
        let radius = nucleus_r + ring_step * (i as f64 + 1.0);
        cr.set_source_rgba(lr, lg, lb, 0.4);
        cr.set_line_width(1.0);
        cr.arc(cx, cy, radius, 0.0, 2.0 * PI);
        cr.stroke()?;

        let count = shell.visible_electrons();
        let spin = phase / (i as f64 + 1.0);
        let (er, eg, eb) = palette.focus;
        cr.set_source_rgb(er, eg, eb);
        for k in 0..count {
            let a = spin + 2.0 * PI * k as f64 / count as f64;
            cr.arc(cx + radius * a.cos(), cy + radius * a.sin(), 4.0, 0.0, 2.0 * PI);
            cr.fill()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::trends::TrendKey;
    use crate::config::PrefStore;
    use crate::io::dataset;
    use crate::model::electron_config;
    use cairo::{Format, ImageSurface};

    fn pixel(surface: &mut ImageSurface, x: f64, y: f64) -> (u8, u8, u8) {
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let i = y as usize * stride + x as usize * 4;
        // ARGB32 is stored native-endian: B, G, R, A on little-endian hosts
        if cfg!(target_endian = "little") {
            (data[i + 2], data[i + 1], data[i])
        } else {
            (data[i + 1], data[i + 2], data[i + 3])
        }
    }

    fn close(a: (u8, u8, u8), b: Rgb) -> bool {
        let b = ((b.0 * 255.0).round() as i32, (b.1 * 255.0).round() as i32, (b.2 * 255.0).round() as i32);
        (a.0 as i32 - b.0).abs() <= 2 && (a.1 as i32 - b.1).abs() <= 2 && (a.2 as i32 - b.2).abs() <= 2
    }

    #[test]
    fn test_colors() {
        assert_eq!(hex_rgb(0xFF0000), (1.0, 0.0, 0.0));
        let def = TrendKey::Electronegativity.definition();
        assert_eq!(level_color(def, 1), hex_rgb(0xD1F2EB));
        assert_eq!(level_color(def, 5), hex_rgb(0x0E6251));
        assert_eq!(level_color(def, 9), level_color(def, 5));
        assert_eq!(text_color((1.0, 1.0, 1.0)), (0.1, 0.1, 0.1));
        assert_eq!(text_color((0.0, 0.0, 0.2)), (1.0, 1.0, 1.0));
    }

    #[test]
    fn test_table_paints_trend_levels() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(dataset::bundled().unwrap(), PrefStore::new(dir.path()));
        state.select_trend("electronegativity").unwrap();

        let (w, h) = (1200, 700);
        let mut surface = ImageSurface::create(Format::ARgb32, w, h).unwrap();
        let layout = TableLayout::compute(&state.elements, w as f64, h as f64);
        {
            let cr = Context::new(&surface).unwrap();
            draw_table(&cr, &state, &layout).unwrap();
        }
        surface.flush();

        let def = TrendKey::Electronegativity.definition();
        // Fluorine has the highest value: darkest level
        let f = *layout.cell_of(9).unwrap();
        let spot = (f.x + f.size * 0.05, f.y + f.size * 0.5);
        assert!(close(pixel(&mut surface, spot.0, spot.1), level_color(def, 5)));

        // Helium has no electronegativity: unknown grey under the hatching
        let he = *layout.cell_of(2).unwrap();
        let got = pixel(&mut surface, he.x + he.size * 0.5, he.y + he.size * 0.04);
        let palette = Palette::from_state(&state);
        assert!(!close(got, level_color(def, 1)));
        assert!(got.0 > 150 && (got.0 as i32 - got.2 as i32).abs() < 20, "{:?} vs {:?}", got, palette.unknown);
    }

    #[test]
    fn test_shells_draw_without_error() {
        let elements = dataset::bundled().unwrap();
        let fe = &elements[25];
        let shells = electron_config::parse(&fe.electron_configuration);
        let surface = ImageSurface::create(Format::ARgb32, 300, 300).unwrap();
        let cr = Context::new(&surface).unwrap();
        draw_shells(&cr, fe, &shells, 300.0, 300.0, 0.5, &Palette::new(true, false)).unwrap();
        // Degenerate sizes are a no-op
        draw_shells(&cr, fe, &shells, 4.0, 4.0, 0.0, &Palette::new(false, false)).unwrap();
    }
}
