// src/analysis/trends.rs

//! Periodic trend classification.
//!
//! A trend maps one numeric property onto five intensity levels using the
//! observed min..max of the elements that carry a value. The chart dataset
//! is built from the same filtered set, so the legend scale and the tile
//! colors always agree.

use crate::error::{PtError, Result};
use crate::model::{Element, Property};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const LEVELS: u8 = 5;

// --- 1. DEFINITIONS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendKey {
    Electronegativity,
    AtomicRadius,
    IonizationEnergy,
    MeltingPoint,
    Density,
}

impl TrendKey {
    pub const ALL: [TrendKey; 5] = [
        TrendKey::Electronegativity,
        TrendKey::AtomicRadius,
        TrendKey::IonizationEnergy,
        TrendKey::MeltingPoint,
        TrendKey::Density,
    ];

    pub fn id(self) -> &'static str {
        self.definition().property.key()
    }

    pub fn definition(self) -> &'static TrendDefinition {
        match self {
            TrendKey::Electronegativity => &DEFINITIONS[0],
            TrendKey::AtomicRadius => &DEFINITIONS[1],
            TrendKey::IonizationEnergy => &DEFINITIONS[2],
            TrendKey::MeltingPoint => &DEFINITIONS[3],
            TrendKey::Density => &DEFINITIONS[4],
        }
    }
}

impl fmt::Display for TrendKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What the trend selector can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendSelection {
    None,
    Trend(TrendKey),
}

impl FromStr for TrendSelection {
    type Err = PtError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "none" {
            return Ok(TrendSelection::None);
        }
        TrendKey::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .map(TrendSelection::Trend)
            .ok_or_else(|| PtError::UnknownTrend(s.to_string()))
    }
}

#[derive(Debug)]
pub struct TrendDefinition {
    pub key: TrendKey,
    pub name: &'static str,
    pub property: Property,
    pub unit: &'static str,
    pub description: &'static str,
    /// Higher raw value maps to lower intensity
    pub reverse: bool,
    /// Gradient reference for the legend, lightest first (0xRRGGBB)
    pub color_scale: [u32; 10],
}

static DEFINITIONS: [TrendDefinition; 5] = [
    TrendDefinition {
        key: TrendKey::Electronegativity,
        name: "Electronegativity",
        property: Property::Electronegativity,
        unit: "Pauling scale",
        description: "Electronegativity is the ability of an atom to attract the shared electrons of a chemical bond.",
        reverse: false,
        color_scale: [
            0xE8F8F5, 0xD1F2EB, 0xA3E4D7, 0x76D7C4, 0x48C9B0, 0x1ABC9C, 0x17A589, 0x148F77,
            0x117864, 0x0E6251,
        ],
    },
    TrendDefinition {
        key: TrendKey::AtomicRadius,
        name: "Atomic Radius",
        property: Property::AtomicRadius,
        unit: "pm",
        description: "The atomic radius is half the distance between the nuclei of two adjacent atoms of the same element.",
        reverse: true,
        color_scale: [
            0xFEF9E7, 0xFCF3CF, 0xF9E79F, 0xF7DC6F, 0xF4D03F, 0xF1C40F, 0xD4AC0D, 0xB7950B,
            0x9A7D0A, 0x7D6608,
        ],
    },
    TrendDefinition {
        key: TrendKey::IonizationEnergy,
        name: "Ionization Energy",
        property: Property::IonizationEnergy,
        unit: "eV",
        description: "Ionization energy is the minimum energy needed to remove an electron from a gaseous atom in its ground state.",
        reverse: false,
        color_scale: [
            0xEBDEF0, 0xD7BDE2, 0xC39BD3, 0xAF7AC5, 0x9B59B6, 0x8E44AD, 0x7D3C98, 0x6C3483,
            0x5B2C6F, 0x4A235A,
        ],
    },
    TrendDefinition {
        key: TrendKey::MeltingPoint,
        name: "Melting Point",
        property: Property::MeltingPoint,
        unit: "K",
        description: "The melting point is the temperature at which a solid turns into a liquid.",
        reverse: false,
        color_scale: [
            0xFADBD8, 0xF5B7B1, 0xF1948A, 0xEC7063, 0xE74C3C, 0xCB4335, 0xB03A2E, 0x943126,
            0x78281F, 0x5C1F1F,
        ],
    },
    TrendDefinition {
        key: TrendKey::Density,
        name: "Density",
        property: Property::Density,
        unit: "g/cm³",
        description: "Density is the mass per unit volume of a substance.",
        reverse: false,
        color_scale: [
            0xD6EAF8, 0xAED6F1, 0x85C1E9, 0x5DADE2, 0x3498DB, 0x2E86C1, 0x2874A6, 0x21618C,
            0x1B4F72, 0x154360,
        ],
    },
];

impl TrendDefinition {
    /// Direction across a period
    pub fn left_to_right(&self) -> &'static str {
        if self.reverse { "Decreases" } else { "Increases" }
    }

    /// Direction down a group
    pub fn top_to_bottom(&self) -> &'static str {
        if self.reverse { "Increases" } else { "Decreases" }
    }

    /// Legend cells, lowest intensity label first
    pub fn legend(&self) -> [(u8, &'static str); LEVELS as usize] {
        let mut cells = [(0u8, ""); LEVELS as usize];
        for (i, cell) in cells.iter_mut().enumerate() {
            let level = if self.reverse { LEVELS - i as u8 } else { i as u8 + 1 };
            let label = match i {
                0 => "Lower",
                4 => "Higher",
                _ => "",
            };
            *cell = (level, label);
        }
        cells
    }
}

// --- 2. RESULTS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendLevel {
    Level(u8),
    /// Element has no value for the property
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileTrend {
    pub level: TrendLevel,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub group: u8,
    pub value: f64,
    pub atomic_number: u32,
    pub symbol: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub period: u8,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendView {
    pub key: TrendKey,
    pub min: f64,
    pub max: f64,
    pub tiles: BTreeMap<u32, TileTrend>,
    pub chart: Vec<ChartSeries>,
}

impl TrendView {
    pub fn definition(&self) -> &'static TrendDefinition {
        self.key.definition()
    }

    pub fn level_of(&self, atomic_number: u32) -> Option<TrendLevel> {
        self.tiles.get(&atomic_number).map(|t| t.level)
    }

    pub fn tooltip_of(&self, atomic_number: u32) -> Option<&str> {
        self.tiles.get(&atomic_number).map(|t| t.tooltip.as_str())
    }

    pub fn count_known(&self) -> usize {
        self.tiles
            .values()
            .filter(|t| matches!(t.level, TrendLevel::Level(_)))
            .count()
    }
}

// --- 3. CALCULATION ---

/// Bucket a value into 1..=5. A zero range puts everything at level 1.
pub fn compute_level(value: f64, min: f64, max: f64, reverse: bool) -> u8 {
    let range = max - min;
    if !(range > 0.0) {
        return 1;
    }
    let fraction = (value - min) / range;
    let scaled = if reverse { (1.0 - fraction) * LEVELS as f64 } else { fraction * LEVELS as f64 };
    (scaled.ceil() as i64).clamp(1, LEVELS as i64) as u8
}

fn defined_value(element: &Element, property: Property) -> Option<f64> {
    element.property(property).filter(|v| v.is_finite())
}

/// Main-block groups used for the simplified chart
pub fn is_representative_group(group: u8) -> bool {
    group == 1 || group == 2 || (13..=18).contains(&group)
}

/// Classify every element for `key` and build the chart from the same data.
///
/// # Returns
/// - `Err(PtError::NoTrendData)` when no element has a value
pub fn compute(elements: &[Element], key: TrendKey) -> Result<TrendView> {
    let def = key.definition();

    let valid: Vec<(&Element, f64)> = elements
        .iter()
        .filter_map(|e| defined_value(e, def.property).map(|v| (e, v)))
        .collect();

    if valid.is_empty() {
        return Err(PtError::NoTrendData(def.name));
    }

    let min = valid.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = valid.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);

    let mut tiles = BTreeMap::new();
    for element in elements {
        let tile = match defined_value(element, def.property) {
            Some(value) => TileTrend {
                level: TrendLevel::Level(compute_level(value, min, max, def.reverse)),
                tooltip: format!("{}: {} {}", def.name, value, def.unit),
            },
            None => TileTrend {
                level: TrendLevel::Unknown,
                tooltip: format!("{}: not available", def.name),
            },
        };
        tiles.insert(element.atomic_number, tile);
    }

    let chart = build_chart(&valid);

    Ok(TrendView { key, min, max, tiles, chart })
}

fn build_chart(valid: &[(&Element, f64)]) -> Vec<ChartSeries> {
    (1..=7u8)
        .filter_map(|period| {
            let mut points: Vec<ChartPoint> = valid
                .iter()
                .filter(|(e, _)| e.period == period)
                .filter_map(|(e, v)| {
                    let group = e.group.filter(|g| is_representative_group(*g))?;
                    Some(ChartPoint {
                        group,
                        value: *v,
                        atomic_number: e.atomic_number,
                        symbol: e.symbol.clone(),
                        name: e.name.clone(),
                    })
                })
                .collect();

            if points.is_empty() {
                return None;
            }
            points.sort_by_key(|p| p.group);
            Some(ChartSeries { period, points })
        })
        .collect()
}

/// Fixed chart color per period (r, g, b)
pub fn period_color(period: u8) -> (u8, u8, u8) {
    const COLORS: [(u8, u8, u8); 7] = [
        (231, 76, 60),   // Red
        (241, 196, 15),  // Yellow
        (46, 204, 113),  // Green
        (52, 152, 219),  // Blue
        (155, 89, 182),  // Purple
        (230, 126, 34),  // Orange
        (149, 165, 166), // Grey
    ];
    COLORS[(period.max(1) as usize - 1) % COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::elements::fixtures::element;

    fn sample() -> Vec<Element> {
        let mut h = element(1, "H", Some(1), 1);
        h.electronegativity = Some(2.20);
        h.atomic_radius = Some(53.0);
        let mut li = element(3, "Li", Some(1), 2);
        li.electronegativity = Some(0.98);
        li.atomic_radius = Some(167.0);
        let mut f = element(9, "F", Some(17), 2);
        f.electronegativity = Some(3.98);
        f.atomic_radius = Some(42.0);
        let ne = element(10, "Ne", Some(18), 2);
        vec![h, li, f, ne]
    }

    #[test]
    fn test_electronegativity_example() {
        let view = compute(&sample(), TrendKey::Electronegativity).unwrap();
        assert!((view.min - 0.98).abs() < 1e-12);
        assert!((view.max - 3.98).abs() < 1e-12);
        assert_eq!(view.level_of(3), Some(TrendLevel::Level(1)));
        assert_eq!(view.level_of(1), Some(TrendLevel::Level(3)));
        assert_eq!(view.level_of(9), Some(TrendLevel::Level(5)));
    }

    #[test]
    fn test_missing_value_is_unknown() {
        let view = compute(&sample(), TrendKey::Electronegativity).unwrap();
        assert_eq!(view.level_of(10), Some(TrendLevel::Unknown));
        assert_eq!(view.tooltip_of(10), Some("Electronegativity: not available"));
        assert_eq!(view.count_known(), 3);
    }

    #[test]
    fn test_tooltip_combines_value_and_unit() {
        let view = compute(&sample(), TrendKey::Electronegativity).unwrap();
        assert_eq!(view.tooltip_of(1), Some("Electronegativity: 2.2 Pauling scale"));
    }

    #[test]
    fn test_reverse_trend_inverts_ordering() {
        // Radius: F 42 < H 53 < Li 167, reverse so the smallest is the most intense
        let view = compute(&sample(), TrendKey::AtomicRadius).unwrap();
        assert_eq!(view.level_of(9), Some(TrendLevel::Level(5)));
        assert_eq!(view.level_of(3), Some(TrendLevel::Level(1)));
        match (view.level_of(1), view.level_of(9)) {
            (Some(TrendLevel::Level(h)), Some(TrendLevel::Level(f))) => assert!(h <= f),
            other => panic!("unexpected levels {:?}", other),
        }
    }

    #[test]
    fn test_levels_stay_in_range() {
        let values = [-3.5, 0.0, 0.001, 1.0, 2.5, 9.99, 10.0];
        for &v in &values {
            for reverse in [false, true] {
                let level = compute_level(v, -3.5, 10.0, reverse);
                assert!((1..=5).contains(&level), "value {} gave {}", v, level);
            }
        }
        assert_eq!(compute_level(-3.5, -3.5, 10.0, false), 1);
        assert_eq!(compute_level(10.0, -3.5, 10.0, false), 5);
        assert_eq!(compute_level(-3.5, -3.5, 10.0, true), 5);
        assert_eq!(compute_level(10.0, -3.5, 10.0, true), 1);
    }

    #[test]
    fn test_zero_range_is_level_one() {
        let mut a = element(11, "Na", Some(1), 3);
        a.density = Some(1.0);
        let mut b = element(12, "Mg", Some(2), 3);
        b.density = Some(1.0);
        let view = compute(&[a, b], TrendKey::Density).unwrap();
        assert_eq!(view.level_of(11), Some(TrendLevel::Level(1)));
        assert_eq!(view.level_of(12), Some(TrendLevel::Level(1)));
    }

    #[test]
    fn test_no_data_is_an_error() {
        let err = compute(&sample(), TrendKey::MeltingPoint).unwrap_err();
        assert!(matches!(err, PtError::NoTrendData("Melting Point")));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let elements = sample();
        let a = compute(&elements, TrendKey::Electronegativity).unwrap();
        let b = compute(&elements, TrendKey::Electronegativity).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_chart_keeps_main_groups_sorted() {
        let mut elements = sample();
        let mut fe = element(26, "Fe", Some(8), 4);
        fe.electronegativity = Some(1.83);
        let mut ga = element(31, "Ga", Some(13), 4);
        ga.electronegativity = Some(1.81);
        let mut k = element(19, "K", Some(1), 4);
        k.electronegativity = Some(0.82);
        elements.extend([fe, ga, k]);

        let view = compute(&elements, TrendKey::Electronegativity).unwrap();
        let periods: Vec<u8> = view.chart.iter().map(|s| s.period).collect();
        assert_eq!(periods, vec![1, 2, 4]);

        let p2: Vec<u8> = view.chart[1].points.iter().map(|p| p.group).collect();
        assert_eq!(p2, vec![1, 17]); // Ne has no value

        let p4: Vec<&str> = view.chart[2].points.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(p4, vec!["K", "Ga"]); // Fe is a transition metal
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!("none".parse::<TrendSelection>().unwrap(), TrendSelection::None);
        assert_eq!(
            "atomicRadius".parse::<TrendSelection>().unwrap(),
            TrendSelection::Trend(TrendKey::AtomicRadius)
        );
        assert!(matches!("boilingPoint".parse::<TrendSelection>(), Err(PtError::UnknownTrend(_))));
    }

    #[test]
    fn test_legend_order_follows_direction() {
        let normal = TrendKey::Density.definition().legend();
        assert_eq!(normal.map(|c| c.0), [1, 2, 3, 4, 5]);
        let reverse = TrendKey::AtomicRadius.definition().legend();
        assert_eq!(reverse.map(|c| c.0), [5, 4, 3, 2, 1]);
        assert_eq!(reverse[0].1, "Lower");
    }
}
