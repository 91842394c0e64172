// src/quiz/session.rs

use super::{Difficulty, Question};
use crate::config::QuizRecords;

#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}

impl Feedback {
    pub fn headline(&self) -> String {
        if self.correct {
            "Correct! 🎉".to_string()
        } else {
            format!("Incorrect. The correct answer is: {}", self.correct_answer)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizResults {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub max_streak: u32,
    pub best_score: u32,
    pub new_best: bool,
}

impl QuizResults {
    pub fn message(&self) -> &'static str {
        performance_message(self.percentage)
    }

    pub fn share_text(&self) -> String {
        share_text(self.percentage)
    }
}

pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (score as f64 / total as f64 * 100.0).round() as u32
}

pub fn performance_message(percentage: u32) -> &'static str {
    match percentage {
        90.. => "🏆 Excellent! You are a chemistry master!",
        80..=89 => "🌟 Very good! You know your elements!",
        70..=79 => "👍 Good job! Keep studying!",
        60..=69 => "📚 Not bad, but there is room to improve!",
        _ => "📖 Keep studying the periodic table!",
    }
}

pub fn share_text(percentage: u32) -> String {
    format!(
        "I just scored {}% on the Periodic Table Quiz! 🧪⚗️ Test your knowledge with PTView.",
        percentage
    )
}

pub struct QuizSession {
    pub difficulty: Difficulty,
    questions: Vec<Question>,
    current: usize,
    score: u32,
    streak: u32,
    max_streak: u32,
    answered: bool,
}

impl QuizSession {
    pub fn new(difficulty: Difficulty, questions: Vec<Question>) -> Self {
        Self {
            difficulty,
            questions,
            current: 0,
            score: 0,
            streak: 0,
            max_streak: 0,
            answered: false,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// 1-based position for the progress label
    pub fn position(&self) -> (usize, usize) {
        ((self.current + 1).min(self.questions.len()), self.questions.len())
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// Only the first answer to a question counts
    pub fn answer(&mut self, choice: &str) -> Option<Feedback> {
        if self.answered {
            return None;
        }
        let question = self.questions.get(self.current)?;
        let correct = question.is_correct(choice);
        let feedback = Feedback {
            correct,
            correct_answer: question.correct.clone(),
            explanation: question.explanation.clone(),
        };

        if correct {
            self.score += 1;
            self.streak += 1;
            self.max_streak = self.max_streak.max(self.streak);
        } else {
            self.streak = 0;
        }
        self.answered = true;
        Some(feedback)
    }

    /// Returns false once the round is over
    pub fn advance(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.current += 1;
        self.answered = false;
        !self.is_finished()
    }

    /// Folds this round into the persisted records
    pub fn finish(&self, records: &mut QuizRecords) -> QuizResults {
        let new_best = self.score > records.best_score;
        records.best_score = records.best_score.max(self.score);
        records.max_streak = records.max_streak.max(self.max_streak);

        let total = self.questions.len() as u32;
        QuizResults {
            score: self.score,
            total,
            percentage: percentage(self.score, total),
            max_streak: records.max_streak,
            best_score: records.best_score,
            new_best,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::QuestionKind;

    fn question(n: u32) -> Question {
        Question {
            atomic_number: n,
            kind: QuestionKind::AtomicNumber,
            prompt: format!("Q{}", n),
            options: vec![n.to_string(), "0".into(), "200".into(), "201".into()],
            correct: n.to_string(),
            explanation: String::new(),
        }
    }

    fn play(answers: &[bool]) -> QuizSession {
        let questions = (1..=answers.len() as u32).map(question).collect();
        let mut session = QuizSession::new(Difficulty::Easy, questions);
        for &right in answers {
            let q = session.current_question().unwrap().clone();
            let choice = if right { q.correct.clone() } else { "0".to_string() };
            session.answer(&choice).unwrap();
            session.advance();
        }
        session
    }

    #[test]
    fn test_score_and_streak() {
        let session = play(&[true, true, true, false, true, true, false, true, true, true]);
        assert!(session.is_finished());
        assert_eq!(session.score(), 8);

        let mut records = QuizRecords::default();
        let results = session.finish(&mut records);
        assert_eq!(results.percentage, 80);
        assert_eq!(results.max_streak, 3);
        assert!(results.new_best);
        assert_eq!(records, QuizRecords { best_score: 8, max_streak: 3 });
        assert_eq!(results.message(), "🌟 Very good! You know your elements!");
    }

    #[test]
    fn test_records_keep_maximum() {
        let mut records = QuizRecords { best_score: 9, max_streak: 6 };
        let results = play(&[true, false, true]).finish(&mut records);
        assert!(!results.new_best);
        assert_eq!(results.best_score, 9);
        assert_eq!(results.max_streak, 6);
    }

    #[test]
    fn test_second_answer_ignored() {
        let mut session = QuizSession::new(Difficulty::Easy, vec![question(5)]);
        assert!(session.answer("0").is_some());
        assert!(session.answer("5").is_none());
        assert_eq!(session.score(), 0);
        assert!(!session.advance());
        assert!(session.current_question().is_none());
    }

    #[test]
    fn test_performance_bands() {
        assert_eq!(performance_message(100), "🏆 Excellent! You are a chemistry master!");
        assert_eq!(performance_message(90), "🏆 Excellent! You are a chemistry master!");
        assert_eq!(performance_message(70), "👍 Good job! Keep studying!");
        assert_eq!(performance_message(60), "📚 Not bad, but there is room to improve!");
        assert_eq!(performance_message(59), "📖 Keep studying the periodic table!");
        assert_eq!(percentage(2, 3), 67);
        assert!(share_text(80).contains("80%"));
    }
}
