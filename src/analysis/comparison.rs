// src/analysis/comparison.rs

//! Side-by-side comparison of two elements.

use crate::model::{Element, Property};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greater {
    First,
    Second,
    Equal,
}

/// Numeric difference, second relative to first
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difference {
    pub delta: f64,
    /// None when the first value is zero
    pub percent: Option<f64>,
    pub greater: Greater,
}

impl Difference {
    fn between(first: f64, second: f64) -> Self {
        let delta = second - first;
        let percent = if first != 0.0 { Some(delta / first * 100.0) } else { None };
        let greater = if delta > 0.0 {
            Greater::Second
        } else if delta < 0.0 {
            Greater::First
        } else {
            Greater::Equal
        };
        Self { delta, percent, greater }
    }

    pub fn describe(&self) -> String {
        let pct = self
            .percent
            .map(|p| format!("{:.1}%", p))
            .unwrap_or_else(|| "N/A".to_string());
        match self.greater {
            Greater::Equal => "No difference".to_string(),
            Greater::Second => format!("+{:.2} ({})", self.delta, pct),
            Greater::First => format!("{:.2} ({})", self.delta, pct),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub first: String,
    pub second: String,
    pub difference: Option<Difference>,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Category,
    Number(Property, Format),
    Configuration,
    Block,
    State,
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Decimal,
    Integer,
    Density,
}

const FIELDS: [(&str, Field); 11] = [
    ("Category", Field::Category),
    ("Atomic Mass", Field::Number(Property::AtomicMass, Format::Decimal)),
    ("Density", Field::Number(Property::Density, Format::Density)),
    ("Electronegativity", Field::Number(Property::Electronegativity, Format::Decimal)),
    ("Atomic Radius", Field::Number(Property::AtomicRadius, Format::Integer)),
    ("Ionization Energy", Field::Number(Property::IonizationEnergy, Format::Decimal)),
    ("Melting Point", Field::Number(Property::MeltingPoint, Format::Integer)),
    ("Boiling Point", Field::Number(Property::BoilingPoint, Format::Integer)),
    ("Electron Configuration", Field::Configuration),
    ("Block", Field::Block),
    ("Natural State", Field::State),
];

fn format_number(value: Option<f64>, format: Format) -> String {
    match (value, format) {
        (None, _) => "N/A".to_string(),
        (Some(v), Format::Decimal) => format!("{:.2}", v),
        (Some(v), Format::Integer) => format!("{}", v),
        (Some(v), Format::Density) if v < 0.01 => format!("{:.2e}", v),
        (Some(v), Format::Density) => format!("{:.2}", v),
    }
}

fn text_or_na(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Rows for every compared property, skipping those unknown on both sides
pub fn compare(first: &Element, second: &Element) -> Vec<ComparisonRow> {
    let mut rows = Vec::new();

    for (label, field) in FIELDS {
        let row = match field {
            Field::Number(prop, format) => {
                let (a, b) = (first.property(prop), second.property(prop));
                if a.is_none() && b.is_none() {
                    continue;
                }
                ComparisonRow {
                    label,
                    unit: Some(prop.unit()),
                    first: format_number(a, format),
                    second: format_number(b, format),
                    difference: a.zip(b).map(|(a, b)| Difference::between(a, b)),
                }
            }
            _ => {
                let text = |e: &Element| match field {
                    Field::Category => Some(e.category.label().to_string()),
                    Field::Configuration => text_or_na(&e.electron_configuration),
                    Field::Block => Some(e.block.label().to_string()),
                    Field::State => Some(e.state.label().to_string()),
                    Field::Number(..) => None,
                };
                let (a, b) = (text(first), text(second));
                if a.is_none() && b.is_none() {
                    continue;
                }
                ComparisonRow {
                    label,
                    unit: None,
                    first: a.unwrap_or_else(|| "N/A".to_string()),
                    second: b.unwrap_or_else(|| "N/A".to_string()),
                    difference: None,
                }
            }
        };
        rows.push(row);
    }
    rows
}

/// Two-step selection: the first pick fills slot one, the next fills slot two
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComparisonSlots {
    pub first: Option<u32>,
    pub second: Option<u32>,
    awaiting_second: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickStep {
    /// Window should open with only the first slot filled
    FirstChosen,
    Ready(u32, u32),
}

impl ComparisonSlots {
    pub fn pick(&mut self, atomic_number: u32) -> PickStep {
        match (self.awaiting_second, self.first) {
            (true, Some(first)) => {
                self.second = Some(atomic_number);
                self.awaiting_second = false;
                PickStep::Ready(first, atomic_number)
            }
            _ => {
                self.first = Some(atomic_number);
                self.second = None;
                self.awaiting_second = true;
                PickStep::FirstChosen
            }
        }
    }

    /// Direct assignment from the window's selectors
    pub fn set(&mut self, first: Option<u32>, second: Option<u32>) {
        self.first = first;
        self.second = second;
        self.awaiting_second = false;
    }

    pub fn pair(&self) -> Option<(u32, u32)> {
        self.first.zip(self.second)
    }

    pub fn is_awaiting(&self) -> bool {
        self.awaiting_second
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::elements::fixtures::element;
    use crate::model::MatterState;

    #[test]
    fn test_rows_skip_unknown_on_both_sides() {
        let mut na = element(11, "Na", Some(1), 3);
        na.density = Some(0.968);
        na.melting_point = Some(370.87);
        let mut k = element(19, "K", Some(1), 4);
        k.density = Some(0.862);
        k.state = MatterState::Solid;

        let rows = compare(&na, &k);
        let labels: Vec<&str> = rows.iter().map(|r| r.label).collect();
        assert!(labels.contains(&"Density"));
        assert!(labels.contains(&"Melting Point"));
        assert!(!labels.contains(&"Electronegativity"));
        assert!(!labels.contains(&"Electron Configuration"));
        assert_eq!(labels[0], "Category");
    }

    #[test]
    fn test_numeric_rows_report_greater_side() {
        let mut na = element(11, "Na", Some(1), 3);
        na.electronegativity = Some(0.93);
        let mut cl = element(17, "Cl", Some(17), 3);
        cl.electronegativity = Some(3.16);

        let rows = compare(&na, &cl);
        let en = rows.iter().find(|r| r.label == "Electronegativity").unwrap();
        assert_eq!(en.first, "0.93");
        assert_eq!(en.second, "3.16");
        let diff = en.difference.unwrap();
        assert_eq!(diff.greater, Greater::Second);
        assert!((diff.delta - 2.23).abs() < 1e-9);

        let mass = rows.iter().find(|r| r.label == "Atomic Mass").unwrap();
        assert_eq!(mass.difference.unwrap().greater, Greater::Second);
    }

    #[test]
    fn test_one_sided_value_has_no_difference() {
        let mut a = element(1, "H", Some(1), 1);
        a.boiling_point = Some(20.28);
        let b = element(2, "He", Some(18), 1);
        let rows = compare(&a, &b);
        let bp = rows.iter().find(|r| r.label == "Boiling Point").unwrap();
        assert_eq!(bp.second, "N/A");
        assert!(bp.difference.is_none());
    }

    #[test]
    fn test_zero_base_has_no_percentage() {
        let d = Difference::between(0.0, 5.0);
        assert_eq!(d.percent, None);
        assert_eq!(d.describe(), "+5.00 (N/A)");
        assert_eq!(Difference::between(2.0, 2.0).describe(), "No difference");
    }

    #[test]
    fn test_two_step_pick() {
        let mut slots = ComparisonSlots::default();
        assert_eq!(slots.pick(26), PickStep::FirstChosen);
        assert_eq!(slots.pair(), None);
        assert_eq!(slots.pick(29), PickStep::Ready(26, 29));
        assert_eq!(slots.pair(), Some((26, 29)));
        // Next pick starts over
        assert_eq!(slots.pick(1), PickStep::FirstChosen);
        assert_eq!(slots.first, Some(1));
        assert_eq!(slots.second, None);
    }
}
