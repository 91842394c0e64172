// src/quiz/generator.rs

use super::{Difficulty, QuestionKind, OPTIONS_PER_QUESTION, QUESTIONS_PER_ROUND};
use crate::model::elements::MAX_ATOMIC_NUMBER;
use crate::model::{Block, Category, Element, Property};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub atomic_number: u32,
    pub kind: QuestionKind,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: String,
    pub explanation: String,
}

impl Question {
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct
    }
}

/// One question per element, drawn from distinct shuffled elements
pub fn generate_round<R: Rng + ?Sized>(
    elements: &[Element],
    difficulty: Difficulty,
    rng: &mut R,
) -> Vec<Question> {
    let mut pool: Vec<&Element> = elements.iter().collect();
    pool.shuffle(rng);

    pool.into_iter()
        .take(QUESTIONS_PER_ROUND)
        .map(|element| {
            let kind = *difficulty.kinds().choose(rng).unwrap_or(&QuestionKind::Symbol);
            create(elements, element, kind, rng)
        })
        .collect()
}

/// Correct answer plus up to three distinct distractors, shuffled
fn with_options<R: Rng + ?Sized>(correct: String, candidates: Vec<String>, rng: &mut R) -> Vec<String> {
    let mut pool: Vec<String> = Vec::new();
    for c in candidates {
        if c != correct && !pool.contains(&c) {
            pool.push(c);
        }
    }
    pool.shuffle(rng);
    pool.truncate(OPTIONS_PER_QUESTION - 1);
    pool.push(correct);
    pool.shuffle(rng);
    pool
}

fn quiz_properties() -> [Property; 4] {
    [
        Property::Density,
        Property::MeltingPoint,
        Property::BoilingPoint,
        Property::Electronegativity,
    ]
}

fn format_property(property: Property, value: f64) -> String {
    match property {
        Property::Density => format!("{:.4} g/cm³", value),
        Property::MeltingPoint | Property::BoilingPoint => format!("{:.1} K", value),
        _ => format!("{:.2}", value),
    }
}

/// Values within ±100% of the real one, never negative
fn property_distractors<R: Rng + ?Sized>(property: Property, value: f64, rng: &mut R) -> Vec<String> {
    let correct = format_property(property, value);
    let mut out: Vec<String> = Vec::new();

    for _ in 0..100 {
        if out.len() == OPTIONS_PER_QUESTION - 1 {
            break;
        }
        let variation: f64 = rng.random_range(-1.0..1.0);
        let candidate = format_property(property, (value * (1.0 + variation)).max(0.0));
        if candidate != correct && !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    // Values of zero leave no room for variation
    let mut step = 1.0;
    while out.len() < OPTIONS_PER_QUESTION - 1 {
        let candidate = format_property(property, value + step);
        if !out.contains(&candidate) {
            out.push(candidate);
        }
        step += 1.0;
    }
    out
}

pub fn create<R: Rng + ?Sized>(
    elements: &[Element],
    element: &Element,
    kind: QuestionKind,
    rng: &mut R,
) -> Question {
    let name = &element.name;
    let symbol = &element.symbol;
    let z = element.atomic_number;

    let build = |kind, prompt: String, correct: String, options: Vec<String>, explanation: String| Question {
        atomic_number: z,
        kind,
        prompt,
        options,
        correct,
        explanation,
    };

    match kind {
        QuestionKind::Symbol => {
            let others = elements.iter().map(|e| e.symbol.clone()).collect();
            build(
                kind,
                format!("What is the symbol of {}?", name),
                symbol.clone(),
                with_options(symbol.clone(), others, rng),
                format!("{} has the symbol {} and atomic number {}.", name, symbol, z),
            )
        }
        QuestionKind::Name => {
            let others = elements.iter().map(|e| e.name.clone()).collect();
            build(
                kind,
                format!("Which element has the symbol {}?", symbol),
                name.clone(),
                with_options(name.clone(), others, rng),
                format!("{} is {}, atomic number {}.", symbol, name, z),
            )
        }
        QuestionKind::AtomicNumber => {
            let others = (1..=MAX_ATOMIC_NUMBER).map(|n| n.to_string()).collect();
            build(
                kind,
                format!("What is the atomic number of {} ({})?", name, symbol),
                z.to_string(),
                with_options(z.to_string(), others, rng),
                format!("{} has atomic number {}, so it has {} protons.", name, z, z),
            )
        }
        QuestionKind::Category => {
            let label = element.category.label().to_string();
            let others = Category::ALL.iter().map(|c| c.label().to_string()).collect();
            build(
                kind,
                format!("Which category does {} ({}) belong to?", name, symbol),
                label.clone(),
                with_options(label.clone(), others, rng),
                format!("{} is classified as {}.", name, label),
            )
        }
        QuestionKind::Group => match element.group {
            Some(group) => {
                let others = (1..=18u8).map(|g| g.to_string()).collect();
                build(
                    kind,
                    format!("Which group does {} ({}) belong to?", name, symbol),
                    group.to_string(),
                    with_options(group.to_string(), others, rng),
                    format!("{} belongs to group {} of the periodic table.", name, group),
                )
            }
            None => create(elements, element, QuestionKind::Symbol, rng),
        },
        QuestionKind::Period => {
            let others = (1..=7u8).map(|p| p.to_string()).collect();
            build(
                kind,
                format!("Which period is {} ({}) in?", name, symbol),
                element.period.to_string(),
                with_options(element.period.to_string(), others, rng),
                format!("{} is located in period {}.", name, element.period),
            )
        }
        QuestionKind::Block => {
            let label = element.block.label().to_string();
            let others = Block::ALL.iter().map(|b| b.label().to_string()).collect();
            build(
                kind,
                format!("Which block does {} ({}) belong to?", name, symbol),
                label.clone(),
                with_options(label.clone(), others, rng),
                format!("{} belongs to the {} block.", name, label),
            )
        }
        QuestionKind::Property => {
            let available: Vec<(Property, f64)> = quiz_properties()
                .into_iter()
                .filter_map(|p| element.property(p).map(|v| (p, v)))
                .collect();
            let Some(&(property, value)) = available.choose(rng) else {
                return create(elements, element, QuestionKind::Symbol, rng);
            };
            let correct = format_property(property, value);
            let distractors = property_distractors(property, value, rng);
            build(
                kind,
                format!(
                    "What is the {} of {} ({})?",
                    property.label().to_lowercase(),
                    name,
                    symbol
                ),
                correct.clone(),
                with_options(correct.clone(), distractors, rng),
                format!("The {} of {} is {}.", property.label().to_lowercase(), name, correct),
            )
        }
        QuestionKind::Application => {
            let others: Vec<String> = elements
                .iter()
                .flat_map(|e| e.applications.iter())
                .filter(|a| !element.applications.contains(a))
                .cloned()
                .collect();
            let picked = element.applications.choose(rng).cloned();
            match picked {
                Some(app) if others.len() >= OPTIONS_PER_QUESTION - 1 => build(
                    kind,
                    format!("Which of the following is an application of {}?", name),
                    app.clone(),
                    with_options(app.clone(), others, rng),
                    format!("{} is one of the main applications of {}.", app, name),
                ),
                _ => create(elements, element, QuestionKind::Symbol, rng),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dataset;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_well_formed(q: &Question) {
        assert_eq!(q.options.len(), OPTIONS_PER_QUESTION, "{:?}", q);
        assert!(q.options.contains(&q.correct));
        let mut unique = q.options.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), OPTIONS_PER_QUESTION, "duplicate options in {:?}", q);
    }

    #[test]
    fn test_round_uses_distinct_elements() {
        let elements = dataset::bundled().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for difficulty in Difficulty::ALL {
            let round = generate_round(&elements, difficulty, &mut rng);
            assert_eq!(round.len(), QUESTIONS_PER_ROUND);

            let mut numbers: Vec<u32> = round.iter().map(|q| q.atomic_number).collect();
            numbers.sort();
            numbers.dedup();
            assert_eq!(numbers.len(), QUESTIONS_PER_ROUND);

            for q in &round {
                assert!(difficulty.kinds().contains(&q.kind) || q.kind == QuestionKind::Symbol);
                assert_well_formed(q);
            }
        }
    }

    #[test]
    fn test_every_kind_is_well_formed() {
        let elements = dataset::bundled().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let kinds = Difficulty::Hard.kinds();
        for element in &elements {
            for &kind in kinds {
                let q = create(&elements, element, kind, &mut rng);
                assert_well_formed(&q);
            }
        }
    }

    #[test]
    fn test_fallback_to_symbol() {
        let elements = dataset::bundled().unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        // Lanthanum has no group
        let la = &elements[56];
        assert_eq!(create(&elements, la, QuestionKind::Group, &mut rng).kind, QuestionKind::Symbol);

        // Oganesson has neither properties nor applications
        let og = &elements[117];
        assert_eq!(create(&elements, og, QuestionKind::Property, &mut rng).kind, QuestionKind::Symbol);
        assert_eq!(
            create(&elements, og, QuestionKind::Application, &mut rng).kind,
            QuestionKind::Symbol
        );
    }

    #[test]
    fn test_application_distractors_are_foreign() {
        let elements = dataset::bundled().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let h = &elements[0];
        let q = create(&elements, h, QuestionKind::Application, &mut rng);
        assert_eq!(q.kind, QuestionKind::Application);
        let own = q.options.iter().filter(|o| h.applications.contains(o)).count();
        assert_eq!(own, 1);
    }

    #[test]
    fn test_zero_property_still_has_options() {
        let mut rng = StdRng::seed_from_u64(9);
        let d = property_distractors(Property::Electronegativity, 0.0, &mut rng);
        assert_eq!(d.len(), OPTIONS_PER_QUESTION - 1);
        assert!(!d.contains(&"0.00".to_string()));
    }
}
