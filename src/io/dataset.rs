// src/io/dataset.rs

use crate::error::{PtError, Result};
use crate::model::elements::{classify_series, MAX_ATOMIC_NUMBER};
use crate::model::Element;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Dataset compiled into the binary, used when nothing else is available
pub const BUNDLED: &str = include_str!("../../data/elements.json");

pub const DATA_ENV: &str = "PTVIEW_DATA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Bundled,
    File(PathBuf),
}

impl DataSource {
    /// `--data <file>` wins over the environment variable
    pub fn resolve(cli: Option<PathBuf>) -> Self {
        cli.or_else(|| std::env::var_os(DATA_ENV).map(PathBuf::from))
            .map(DataSource::File)
            .unwrap_or(DataSource::Bundled)
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::Bundled => "built-in dataset".to_string(),
            DataSource::File(p) => p.display().to_string(),
        }
    }
}

/// Parse, derive series fields, validate, and sort by atomic number
pub fn parse(json: &str) -> Result<Vec<Element>> {
    let mut elements: Vec<Element> = serde_json::from_str(json)?;
    if elements.is_empty() {
        return Err(PtError::EmptyDataset);
    }
    process(&mut elements);
    validate(&elements)?;
    elements.sort_by_key(|e| e.atomic_number);
    Ok(elements)
}

pub fn process(elements: &mut [Element]) {
    for element in elements.iter_mut() {
        let (series, position) = classify_series(element.atomic_number);
        element.series = series;
        element.series_position = position;
    }
}

fn invalid(atomic_number: u32, reason: impl Into<String>) -> PtError {
    PtError::InvalidElement { atomic_number, reason: reason.into() }
}

pub fn validate(elements: &[Element]) -> Result<()> {
    let mut seen = HashSet::new();

    for e in elements {
        let z = e.atomic_number;
        if !(1..=MAX_ATOMIC_NUMBER).contains(&z) {
            return Err(invalid(z, "atomic number out of range"));
        }
        if !seen.insert(z) {
            return Err(invalid(z, "duplicate atomic number"));
        }
        if !(1..=7).contains(&e.period) {
            return Err(invalid(z, format!("period {} out of range", e.period)));
        }
        if let Some(g) = e.group {
            if !(1..=18).contains(&g) {
                return Err(invalid(z, format!("group {} out of range", g)));
            }
        }
        if e.symbol.trim().is_empty() {
            return Err(invalid(z, "empty symbol"));
        }
        if !e.atomic_mass.is_finite() {
            return Err(invalid(z, "non-finite atomic mass"));
        }
        let numeric = [
            e.density,
            e.melting_point,
            e.boiling_point,
            e.electronegativity,
            e.atomic_radius,
            e.ionization_energy,
        ];
        if numeric.iter().flatten().any(|v| !v.is_finite()) {
            return Err(invalid(z, "non-finite property value"));
        }
    }
    Ok(())
}

pub fn load(path: &Path) -> Result<Vec<Element>> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

pub fn bundled() -> Result<Vec<Element>> {
    parse(BUNDLED)
}

/// Loads the requested source; on failure returns the bundled set and the error
pub fn load_with_fallback(source: &DataSource) -> (Vec<Element>, Option<PtError>) {
    let primary = match source {
        DataSource::Bundled => bundled(),
        DataSource::File(path) => load(path),
    };

    match primary {
        Ok(elements) => {
            log::info!("Loaded {} elements from {}", elements.len(), source.describe());
            (elements, None)
        }
        Err(e) => {
            log::error!("Failed to load {}: {}", source.describe(), e);
            match bundled() {
                Ok(elements) if *source != DataSource::Bundled => {
                    log::warn!("Falling back to the built-in dataset");
                    (elements, Some(e))
                }
                _ => (Vec::new(), Some(e)),
            }
        }
    }
}
