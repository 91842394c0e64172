// src/rendering/layout.rs

//! Table geometry: the 18x7 main grid, a spacer row and the two f-block strips.
//! Pure math, so the draw callback, the click handler and image export all agree
//! on where a tile lives.

use crate::model::{Element, Series};

pub const COLUMNS: u8 = 18;
pub const MAIN_ROWS: u8 = 7;
pub const STRIP_CELLS: u8 = 15;
/// Strips start under group 3
pub const STRIP_FIRST_COLUMN: u8 = 3;
/// Grid rows of the two strips (row 8 is the spacer)
pub const LANTHANIDE_ROW: u8 = 9;
pub const ACTINIDE_ROW: u8 = 10;

const SPACER_FRACTION: f64 = 0.5;
const GAP_FRACTION: f64 = 0.06;
const MARGIN: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Element(u32),
    /// "La-Lu" / "Ac-Lr" placeholder in group 3
    Marker(Series),
}

impl Slot {
    pub fn atomic_number(self) -> Option<u32> {
        match self {
            Slot::Element(z) => Some(z),
            Slot::Marker(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub slot: Slot,
    /// 1-based grid column and row
    pub column: u8,
    pub row: u8,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Cell {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.size && y >= self.y && y < self.y + self.size
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }
}

pub fn marker_label(series: Series) -> &'static str {
    match series {
        Series::Lanthanide => "La-Lu",
        Series::Actinide => "Ac-Lr",
        Series::Main => "",
    }
}

/// Grid coordinates of an element, or None if it has no place on the table
pub fn grid_slot(element: &Element) -> Option<(u8, u8)> {
    if let Some(pos) = element.grid_position() {
        return Some(pos);
    }
    let offset = element.series_position?;
    let row = match element.series {
        Series::Lanthanide => LANTHANIDE_ROW,
        Series::Actinide => ACTINIDE_ROW,
        Series::Main => return None,
    };
    Some((STRIP_FIRST_COLUMN + offset - 1, row))
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub origin: (f64, f64),
    /// Distance between neighbouring cell origins
    pub pitch: f64,
    pub width: f64,
    pub height: f64,
    cells: Vec<Cell>,
}

impl TableLayout {
    /// Fits the table inside `width` x `height`, centered
    pub fn compute(elements: &[Element], width: f64, height: f64) -> Self {
        let rows_units = MAIN_ROWS as f64 + SPACER_FRACTION + 2.0;
        let avail_w = (width - 2.0 * MARGIN).max(1.0);
        let avail_h = (height - 2.0 * MARGIN).max(1.0);
        let pitch = (avail_w / COLUMNS as f64).min(avail_h / rows_units).max(1.0);

        let table_w = pitch * COLUMNS as f64;
        let table_h = pitch * rows_units;
        let origin = ((width - table_w) / 2.0, (height - table_h) / 2.0);
        let size = pitch * (1.0 - GAP_FRACTION);

        let place = |column: u8, row: u8| -> (f64, f64) {
            let mut y = origin.1 + (row as f64 - 1.0) * pitch;
            if row > MAIN_ROWS {
                // Skip the full spacer row and keep only half of it
                y -= pitch * (1.0 - SPACER_FRACTION);
            }
            (origin.0 + (column as f64 - 1.0) * pitch, y)
        };

        let mut cells: Vec<Cell> = elements
            .iter()
            .filter_map(|e| {
                let (column, row) = grid_slot(e)?;
                let (x, y) = place(column, row);
                Some(Cell { slot: Slot::Element(e.atomic_number), column, row, x, y, size })
            })
            .collect();

        for (series, row) in [(Series::Lanthanide, 6), (Series::Actinide, 7)] {
            let (x, y) = place(STRIP_FIRST_COLUMN, row);
            cells.push(Cell { slot: Slot::Marker(series), column: STRIP_FIRST_COLUMN, row, x, y, size });
        }

        Self { origin, pitch, width: table_w, height: table_h, cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell_of(&self, atomic_number: u32) -> Option<&Cell> {
        self.cells.iter().find(|c| c.slot == Slot::Element(atomic_number))
    }

    pub fn hit_test(&self, x: f64, y: f64) -> Option<Slot> {
        self.cells.iter().find(|c| c.contains(x, y)).map(|c| c.slot)
    }

    /// Nearest element tile from `from` in direction (dx, dy), skipping holes
    pub fn step(&self, from: u32, dx: i32, dy: i32) -> Option<u32> {
        let start = self.cell_of(from)?;
        let (mut col, mut row) = (start.column as i32, start.row as i32);
        loop {
            col += dx;
            row += dy;
            if col < 1 || col > COLUMNS as i32 || row < 1 || row > ACTINIDE_ROW as i32 {
                return None;
            }
            let found = self.cells.iter().find(|c| {
                c.column as i32 == col && c.row as i32 == row && matches!(c.slot, Slot::Element(_))
            });
            if let Some(cell) = found {
                return cell.slot.atomic_number();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dataset;

    fn layout() -> TableLayout {
        let elements = dataset::bundled().unwrap();
        TableLayout::compute(&elements, 1800.0 + 2.0 * MARGIN, 950.0 + 2.0 * MARGIN)
    }

    #[test]
    fn test_every_element_is_placed_once() {
        let layout = layout();
        let elements = layout.cells().iter().filter(|c| matches!(c.slot, Slot::Element(_))).count();
        assert_eq!(elements, 118);
        assert_eq!(layout.cells().len(), 120);

        let mut coords: Vec<(u8, u8)> = layout.cells().iter().map(|c| (c.column, c.row)).collect();
        coords.sort();
        coords.dedup();
        assert_eq!(coords.len(), 120);
    }

    #[test]
    fn test_grid_positions() {
        let layout = layout();
        let h = layout.cell_of(1).unwrap();
        assert_eq!((h.column, h.row), (1, 1));
        let og = layout.cell_of(118).unwrap();
        assert_eq!((og.column, og.row), (18, 7));
        let la = layout.cell_of(57).unwrap();
        assert_eq!((la.column, la.row), (3, LANTHANIDE_ROW));
        let lr = layout.cell_of(103).unwrap();
        assert_eq!((lr.column, lr.row), (17, ACTINIDE_ROW));
    }

    #[test]
    fn test_hit_test() {
        let layout = layout();
        assert_eq!(layout.pitch, 100.0);

        let fe = layout.cell_of(26).unwrap();
        let (cx, cy) = fe.center();
        assert_eq!(layout.hit_test(cx, cy), Some(Slot::Element(26)));

        let marker = layout
            .cells()
            .iter()
            .find(|c| c.slot == Slot::Marker(Series::Actinide))
            .unwrap();
        let (mx, my) = marker.center();
        assert_eq!(layout.hit_test(mx, my), Some(Slot::Marker(Series::Actinide)));

        // Hole between H and He
        let (hx, hy) = layout.cell_of(1).unwrap().center();
        assert_eq!(layout.hit_test(hx + 5.0 * layout.pitch, hy), None);
        // Spacer row
        assert_eq!(layout.hit_test(cx, layout.origin.1 + 7.25 * layout.pitch), None);
    }

    #[test]
    fn test_strips_sit_below_spacer() {
        let layout = layout();
        let fr = layout.cell_of(87).unwrap();
        let ce = layout.cell_of(58).unwrap();
        assert!((ce.y - fr.y - 1.5 * layout.pitch).abs() < 1e-9);
    }

    #[test]
    fn test_step_skips_holes() {
        let layout = layout();
        assert_eq!(layout.step(1, 1, 0), Some(2));
        assert_eq!(layout.step(2, -1, 0), Some(1));
        assert_eq!(layout.step(1, 0, 1), Some(3));
        assert_eq!(layout.step(1, -1, 0), None);
        // Down from Ba lands on Ra, the marker is not a stop
        assert_eq!(layout.step(56, 0, 1), Some(88));
        // Column 1 has no strip cell below Fr
        assert_eq!(layout.step(87, 0, 1), None);
    }
}
