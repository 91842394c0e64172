// src/utils/report.rs

use crate::analysis::comparison::ComparisonRow;
use crate::model::electron_config;
use crate::model::{Element, Property};

/// H2SO4 -> H₂SO₄
pub fn subscript_formula(formula: &str) -> String {
    formula
        .chars()
        .map(|c| match c {
            '0'..='9' => char::from_u32('₀' as u32 + (c as u32 - '0' as u32)).unwrap_or(c),
            _ => c,
        })
        .collect()
}

fn value_or_na(element: &Element, property: Property) -> String {
    match element.property(property) {
        Some(v) => format!("{} {}", v, property.unit()),
        None => "N/A".to_string(),
    }
}

/// Text block written to the console when an element is opened
pub fn element_summary(element: &Element) -> String {
    let shells = electron_config::parse(&element.electron_configuration);

    let mut out = String::new();
    out.push_str(&format!("{} ({}), Z = {}\n", element.name, element.symbol, element.atomic_number));
    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!("{:<22} {}\n", "Atomic Mass", format!("{} u", element.formatted_mass())));
    out.push_str(&format!("{:<22} {}\n", "Category", element.category.label()));
    out.push_str(&format!(
        "{:<22} {} / {} / {}\n",
        "Group / Period / Block",
        element.group.map(|g| g.to_string()).unwrap_or_else(|| "-".to_string()),
        element.period,
        element.block.label()
    ));
    if !element.electron_configuration.is_empty() {
        out.push_str(&format!(
            "{:<22} {} ({})\n",
            "Configuration",
            element.electron_configuration,
            electron_config::shell_summary(&shells)
        ));
    }
    for property in [
        Property::Electronegativity,
        Property::AtomicRadius,
        Property::IonizationEnergy,
        Property::Density,
        Property::MeltingPoint,
        Property::BoilingPoint,
    ] {
        out.push_str(&format!("{:<22} {}\n", property.label(), value_or_na(element, property)));
    }
    out
}

/// Plain-text table of a comparison, one row per compared property
pub fn comparison_report(first: &Element, second: &Element, rows: &[ComparisonRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<24} {:<18} {:<18} {}\n",
        "Property",
        first.display_label(),
        second.display_label(),
        "Difference"
    ));
    out.push_str(&"-".repeat(76));
    out.push('\n');
    for row in rows {
        let label = match row.unit {
            Some(unit) => format!("{} ({})", row.label, unit),
            None => row.label.to_string(),
        };
        let diff = row.difference.map(|d| d.describe()).unwrap_or_default();
        out.push_str(&format!("{:<24} {:<18} {:<18} {}\n", label, row.first, row.second, diff));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::comparison;
    use crate::io::dataset;

    #[test]
    fn test_subscript_formula() {
        assert_eq!(subscript_formula("H2SO4"), "H₂SO₄");
        assert_eq!(subscript_formula("C6H12O6"), "C₆H₁₂O₆");
        assert_eq!(subscript_formula("NaCl"), "NaCl");
    }

    #[test]
    fn test_element_summary() {
        let elements = dataset::bundled().unwrap();
        let text = element_summary(&elements[25]);
        assert!(text.starts_with("Iron (Fe), Z = 26"));
        assert!(text.contains("2, 8, 14, 2"));

        // Oganesson has no measured properties
        let og = element_summary(&elements[117]);
        assert!(og.contains("N/A"));
    }

    #[test]
    fn test_comparison_report_rows() {
        let elements = dataset::bundled().unwrap();
        let (na, cl) = (&elements[10], &elements[16]);
        let rows = comparison::compare(na, cl);
        let text = comparison_report(na, cl, &rows);
        assert_eq!(text.lines().count(), rows.len() + 2);
        assert!(text.contains("Sodium (Na)"));
        assert!(text.contains("Atomic Mass (u)"));
    }
}
