// src/model/elements.rs

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_ATOMIC_NUMBER: u32 = 118;
pub const LANTHANIDES: std::ops::RangeInclusive<u32> = 57..=71;
pub const ACTINIDES: std::ops::RangeInclusive<u32> = 89..=103;

// --- Classification ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Nonmetal,
    AlkaliMetal,
    AlkalineEarthMetal,
    TransitionMetal,
    PostTransitionMetal,
    Metalloid,
    Halogen,
    NobleGas,
    Lanthanide,
    Actinide,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Nonmetal,
        Category::AlkaliMetal,
        Category::AlkalineEarthMetal,
        Category::TransitionMetal,
        Category::PostTransitionMetal,
        Category::Metalloid,
        Category::Halogen,
        Category::NobleGas,
        Category::Lanthanide,
        Category::Actinide,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Nonmetal => "Nonmetal",
            Category::AlkaliMetal => "Alkali Metal",
            Category::AlkalineEarthMetal => "Alkaline Earth Metal",
            Category::TransitionMetal => "Transition Metal",
            Category::PostTransitionMetal => "Post-Transition Metal",
            Category::Metalloid => "Metalloid",
            Category::Halogen => "Halogen",
            Category::NobleGas => "Noble Gas",
            Category::Lanthanide => "Lanthanide",
            Category::Actinide => "Actinide",
        }
    }

    /// Stable identifier, identical to the dataset spelling
    pub fn slug(self) -> &'static str {
        match self {
            Category::Nonmetal => "nonmetal",
            Category::AlkaliMetal => "alkali-metal",
            Category::AlkalineEarthMetal => "alkaline-earth-metal",
            Category::TransitionMetal => "transition-metal",
            Category::PostTransitionMetal => "post-transition-metal",
            Category::Metalloid => "metalloid",
            Category::Halogen => "halogen",
            Category::NobleGas => "noble-gas",
            Category::Lanthanide => "lanthanide",
            Category::Actinide => "actinide",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }

    /// Tile background (r, g, b) for the default category coloring
    pub fn color(self) -> (f64, f64, f64) {
        match self {
            Category::Nonmetal => (0.55, 0.85, 0.55),            // Green
            Category::AlkaliMetal => (0.98, 0.55, 0.45),         // Salmon
            Category::AlkalineEarthMetal => (1.00, 0.80, 0.45),  // Apricot
            Category::TransitionMetal => (0.95, 0.70, 0.75),     // Pink
            Category::PostTransitionMetal => (0.70, 0.78, 0.85), // Steel
            Category::Metalloid => (0.80, 0.80, 0.55),           // Olive
            Category::Halogen => (0.95, 0.95, 0.55),             // Yellow
            Category::NobleGas => (0.65, 0.85, 0.98),            // Sky
            Category::Lanthanide => (0.85, 0.75, 0.95),          // Lilac
            Category::Actinide => (0.95, 0.65, 0.90),            // Orchid
        }
    }

    /// Saturated variant used by the high-contrast palette
    pub fn high_contrast_color(self) -> (f64, f64, f64) {
        let (r, g, b) = self.color();
        let boost = |c: f64| if c > 0.75 { 1.0 } else { (c - 0.35).max(0.0) };
        (boost(r), boost(g), boost(b))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Block {
    S,
    P,
    D,
    F,
}

impl Block {
    pub const ALL: [Block; 4] = [Block::S, Block::P, Block::D, Block::F];

    pub fn label(self) -> &'static str {
        match self {
            Block::S => "S",
            Block::P => "P",
            Block::D => "D",
            Block::F => "F",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.to_ascii_lowercase().as_str() {
            "s" => Some(Block::S),
            "p" => Some(Block::P),
            "d" => Some(Block::D),
            "f" => Some(Block::F),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatterState {
    Solid,
    Liquid,
    Gas,
    #[default]
    #[serde(other)]
    Unknown,
}

impl MatterState {
    pub fn label(self) -> &'static str {
        match self {
            MatterState::Solid => "Solid",
            MatterState::Liquid => "Liquid",
            MatterState::Gas => "Gas",
            MatterState::Unknown => "Unknown",
        }
    }
}

/// Which strip of the table an element is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Series {
    #[default]
    Main,
    Lanthanide,
    Actinide,
}

// --- Numeric properties ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    AtomicMass,
    Density,
    MeltingPoint,
    BoilingPoint,
    Electronegativity,
    AtomicRadius,
    IonizationEnergy,
}

impl Property {
    pub fn key(self) -> &'static str {
        match self {
            Property::AtomicMass => "atomicMass",
            Property::Density => "density",
            Property::MeltingPoint => "meltingPoint",
            Property::BoilingPoint => "boilingPoint",
            Property::Electronegativity => "electronegativity",
            Property::AtomicRadius => "atomicRadius",
            Property::IonizationEnergy => "ionizationEnergy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Property::AtomicMass => "Atomic Mass",
            Property::Density => "Density",
            Property::MeltingPoint => "Melting Point",
            Property::BoilingPoint => "Boiling Point",
            Property::Electronegativity => "Electronegativity",
            Property::AtomicRadius => "Atomic Radius",
            Property::IonizationEnergy => "Ionization Energy",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Property::AtomicMass => "u",
            Property::Density => "g/cm³",
            Property::MeltingPoint | Property::BoilingPoint => "K",
            Property::Electronegativity => "Pauling",
            Property::AtomicRadius => "pm",
            Property::IonizationEnergy => "eV",
        }
    }
}

// --- Element record ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compound {
    pub formula: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub atomic_number: u32,
    pub symbol: String,
    pub name: String,
    pub atomic_mass: f64,
    pub category: Category,
    #[serde(default)]
    pub group: Option<u8>,
    pub period: u8,
    pub block: Block,
    #[serde(default)]
    pub electron_configuration: String,

    #[serde(default)]
    pub electronegativity: Option<f64>,
    #[serde(default)]
    pub atomic_radius: Option<f64>,
    #[serde(default)]
    pub ionization_energy: Option<f64>,
    #[serde(default)]
    pub density: Option<f64>,
    #[serde(default)]
    pub melting_point: Option<f64>,
    #[serde(default)]
    pub boiling_point: Option<f64>,
    #[serde(default)]
    pub state: MatterState,

    #[serde(default)]
    pub discovery_year: Option<String>,
    #[serde(default)]
    pub discovered_by: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub applications: Vec<String>,
    #[serde(default)]
    pub compounds: Vec<Compound>,

    // Derived at load time (see io::dataset::process)
    #[serde(skip)]
    pub series: Series,
    #[serde(skip)]
    pub series_position: Option<u8>,
}

impl Element {
    pub fn property(&self, property: Property) -> Option<f64> {
        match property {
            Property::AtomicMass => Some(self.atomic_mass),
            Property::Density => self.density,
            Property::MeltingPoint => self.melting_point,
            Property::BoilingPoint => self.boiling_point,
            Property::Electronegativity => self.electronegativity,
            Property::AtomicRadius => self.atomic_radius,
            Property::IonizationEnergy => self.ionization_energy,
        }
    }

    /// (column, row) in the main 18x7 grid; None for the f-block strips
    pub fn grid_position(&self) -> Option<(u8, u8)> {
        match (self.series, self.group) {
            (Series::Main, Some(group)) => Some((group, self.period)),
            _ => None,
        }
    }

    pub fn formatted_mass(&self) -> String {
        format!("{:.4}", self.atomic_mass)
    }

    pub fn formatted_electronegativity(&self) -> String {
        self.electronegativity
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Gas densities are tiny, so they switch to scientific notation
    pub fn formatted_density(&self) -> String {
        match self.density {
            Some(d) if d < 0.01 => format!("{:.2e}", d),
            Some(d) => format!("{:.4}", d),
            None => "N/A".to_string(),
        }
    }

    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}

/// Series membership by atomic number, with the 1-based slot inside the strip
pub fn classify_series(atomic_number: u32) -> (Series, Option<u8>) {
    if LANTHANIDES.contains(&atomic_number) {
        (Series::Lanthanide, Some((atomic_number - 56) as u8))
    } else if ACTINIDES.contains(&atomic_number) {
        (Series::Actinide, Some((atomic_number - 88) as u8))
    } else {
        (Series::Main, None)
    }
}

pub fn find_element(elements: &[Element], atomic_number: u32) -> Option<&Element> {
    elements.iter().find(|e| e.atomic_number == atomic_number)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal element for unit tests; callers fill in what they need
    pub fn element(atomic_number: u32, symbol: &str, group: Option<u8>, period: u8) -> Element {
        let (series, series_position) = classify_series(atomic_number);
        Element {
            atomic_number,
            symbol: symbol.to_string(),
            name: format!("Element-{}", symbol),
            atomic_mass: atomic_number as f64 * 2.0,
            category: Category::TransitionMetal,
            group,
            period,
            block: Block::D,
            electron_configuration: String::new(),
            electronegativity: None,
            atomic_radius: None,
            ionization_energy: None,
            density: None,
            melting_point: None,
            boiling_point: None,
            state: MatterState::Solid,
            discovery_year: None,
            discovered_by: None,
            description: None,
            applications: Vec::new(),
            compounds: Vec::new(),
            series,
            series_position,
        }
    }
}
