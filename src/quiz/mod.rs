// src/quiz/mod.rs
pub mod generator;
pub mod session;

pub use generator::{generate_round, Question};
pub use session::{Feedback, QuizResults, QuizSession};

pub const QUESTIONS_PER_ROUND: usize = 10;
pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Symbol,
    Name,
    AtomicNumber,
    Category,
    Group,
    Period,
    Block,
    Property,
    Application,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Each level adds kinds on top of the previous one
    pub fn kinds(self) -> &'static [QuestionKind] {
        use QuestionKind::*;
        match self {
            Difficulty::Easy => &[Symbol, Name, AtomicNumber, Category],
            Difficulty::Medium => &[Symbol, Name, AtomicNumber, Category, Group, Period, Block],
            Difficulty::Hard => &[
                Symbol,
                Name,
                AtomicNumber,
                Category,
                Group,
                Period,
                Block,
                Property,
                Application,
            ],
        }
    }
}
