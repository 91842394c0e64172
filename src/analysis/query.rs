// src/analysis/query.rs

use crate::model::{Block, Category, Element};

/// Category and block restrictions; `None` means "all"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filters {
    pub category: Option<Category>,
    pub block: Option<Block>,
}

impl Filters {
    pub fn matches(&self, element: &Element) -> bool {
        self.category.map_or(true, |c| element.category == c)
            && self.block.map_or(true, |b| element.block == b)
    }

    pub fn is_active(&self) -> bool {
        self.category.is_some() || self.block.is_some()
    }
}

/// Case-insensitive substring on name or symbol, or on the decimal atomic number
pub fn matches_search(element: &Element, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    element.name.to_lowercase().contains(&q)
        || element.symbol.to_lowercase().contains(&q)
        || element.atomic_number.to_string().contains(&q)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Empty query, highlighting removed
    Cleared,
    NoMatch,
    Single(u32),
    Many(Vec<u32>),
}

impl SearchOutcome {
    pub fn matched(&self) -> &[u32] {
        match self {
            SearchOutcome::Single(z) => std::slice::from_ref(z),
            SearchOutcome::Many(list) => list,
            _ => &[],
        }
    }
}

pub fn search(elements: &[Element], query: &str) -> SearchOutcome {
    if query.trim().is_empty() {
        return SearchOutcome::Cleared;
    }
    let hits: Vec<u32> = elements
        .iter()
        .filter(|e| matches_search(e, query))
        .map(|e| e.atomic_number)
        .collect();

    match hits.len() {
        0 => SearchOutcome::NoMatch,
        1 => SearchOutcome::Single(hits[0]),
        _ => SearchOutcome::Many(hits),
    }
}

pub fn filter(elements: &[Element], filters: &Filters) -> Vec<u32> {
    elements
        .iter()
        .filter(|e| filters.matches(e))
        .map(|e| e.atomic_number)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::elements::fixtures::element;

    fn sample() -> Vec<Element> {
        let mut h = element(1, "H", Some(1), 1);
        h.name = "Hydrogen".into();
        h.category = Category::Nonmetal;
        h.block = Block::S;
        let mut he = element(2, "He", Some(18), 1);
        he.name = "Helium".into();
        he.category = Category::NobleGas;
        he.block = Block::S;
        let mut fe = element(26, "Fe", Some(8), 4);
        fe.name = "Iron".into();
        let mut hf = element(72, "Hf", Some(4), 6);
        hf.name = "Hafnium".into();
        vec![h, he, fe, hf]
    }

    #[test]
    fn test_search_by_symbol_name_and_number() {
        let elements = sample();
        assert_eq!(search(&elements, "iron"), SearchOutcome::Single(26));
        assert_eq!(search(&elements, "  FE "), SearchOutcome::Single(26));
        assert_eq!(search(&elements, "72"), SearchOutcome::Single(72));
        assert_eq!(search(&elements, "h"), SearchOutcome::Many(vec![1, 2, 72]));
    }

    #[test]
    fn test_search_empty_and_missing() {
        let elements = sample();
        assert_eq!(search(&elements, "   "), SearchOutcome::Cleared);
        assert_eq!(search(&elements, "xenon"), SearchOutcome::NoMatch);
        assert!(SearchOutcome::NoMatch.matched().is_empty());
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let elements = sample();
        let all = Filters::default();
        assert!(!all.is_active());
        assert_eq!(filter(&elements, &all).len(), elements.len());

        let s_block = Filters { category: None, block: Some(Block::S) };
        assert_eq!(filter(&elements, &s_block), vec![1, 2]);

        let noble_s = Filters { category: Some(Category::NobleGas), block: Some(Block::S) };
        assert_eq!(filter(&elements, &noble_s), vec![2]);

        let noble_d = Filters { category: Some(Category::NobleGas), block: Some(Block::D) };
        assert!(filter(&elements, &noble_d).is_empty());
    }
}
