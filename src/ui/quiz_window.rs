// src/ui/quiz_window.rs

use gtk4::{self as gtk, prelude::*};
use std::cell::RefCell;
use std::rc::Rc;

use crate::quiz::{self, Difficulty, QuizResults, QuizSession, OPTIONS_PER_QUESTION};
use crate::state::AppState;
use crate::ui::Views;

const PAGE_START: &str = "start";
const PAGE_QUESTION: &str = "question";
const PAGE_RESULTS: &str = "results";

#[derive(Clone)]
struct QuizPages {
    stack: gtk::Stack,
    difficulty: gtk::DropDown,
    progress: gtk::Label,
    score: gtk::Label,
    prompt: gtk::Label,
    options: Vec<gtk::Button>,
    feedback: gtk::Label,
    explanation: gtk::Label,
    next: gtk::Button,
    result_message: gtk::Label,
    result_score: gtk::Label,
    result_records: gtk::Label,
    share: gtk::Label,
}

fn progress_text(position: (usize, usize)) -> String {
    format!("Question {} of {}", position.0, position.1)
}

fn score_text(score: u32, streak: u32) -> String {
    format!("Score: {}   Streak: {}", score, streak)
}

fn results_score_text(results: &QuizResults) -> String {
    format!("You scored {} / {} ({}%)", results.score, results.total, results.percentage)
}

fn results_records_text(results: &QuizResults) -> String {
    let best = if results.new_best {
        format!("New best score: {}!", results.best_score)
    } else {
        format!("Best score: {}", results.best_score)
    };
    format!("{}\nLongest streak: {}", best, results.max_streak)
}

fn clear_answer_styles(button: &gtk::Button) {
    button.remove_css_class("suggested-action");
    button.remove_css_class("destructive-action");
}

impl QuizPages {
    /// Shows the current question of the running session
    fn show_question(&self, state: &Rc<RefCell<AppState>>) {
        let st = state.borrow();
        let Some(session) = st.quiz.as_ref() else {
            self.stack.set_visible_child_name(PAGE_START);
            return;
        };
        let Some(question) = session.current_question() else {
            return;
        };

        self.progress.set_text(&progress_text(session.position()));
        self.score.set_text(&score_text(session.score(), session.streak()));
        self.prompt.set_text(&question.prompt);
        for (button, option) in self.options.iter().zip(question.options.iter()) {
            button.set_label(option);
            button.set_sensitive(true);
            button.set_visible(true);
            clear_answer_styles(button);
        }
        for button in self.options.iter().skip(question.options.len()) {
            button.set_visible(false);
        }
        self.feedback.set_text("");
        self.explanation.set_text("");
        self.next.set_sensitive(false);
        let (pos, total) = session.position();
        self.next.set_label(if pos >= total { "See Results" } else { "Next Question" });
        self.stack.set_visible_child_name(PAGE_QUESTION);
    }

    fn answer(&self, state: &Rc<RefCell<AppState>>, choice: &str) {
        let outcome = {
            let mut st = state.borrow_mut();
            st.quiz.as_mut().and_then(|q| {
                let feedback = q.answer(choice)?;
                Some((feedback, q.score(), q.streak()))
            })
        };
        let Some((feedback, score, streak)) = outcome else {
            return;
        };

        for button in &self.options {
            button.set_sensitive(false);
            let label = button.label().map(|l| l.to_string()).unwrap_or_default();
            if label == feedback.correct_answer {
                button.add_css_class("suggested-action");
            } else if label == choice {
                button.add_css_class("destructive-action");
            }
        }
        self.feedback.set_text(&feedback.headline());
        self.explanation.set_text(&feedback.explanation);
        self.score.set_text(&score_text(score, streak));
        self.next.set_sensitive(true);

        let st = state.borrow();
        st.announce(&feedback.headline());
    }

    fn show_results(&self, results: &QuizResults) {
        self.result_message.set_text(results.message());
        self.result_score.set_text(&results_score_text(results));
        self.result_records.set_text(&results_records_text(results));
        self.share.set_text(&results.share_text());
        self.stack.set_visible_child_name(PAGE_RESULTS);
    }
}

fn start_page(pages_difficulty: &gtk::DropDown) -> (gtk::Box, gtk::Button) {
    let page = gtk::Box::new(gtk::Orientation::Vertical, 15);
    page.set_valign(gtk::Align::Center);
    page.set_halign(gtk::Align::Center);

    let title = gtk::Label::new(None);
    title.set_markup("<span size='x-large' weight='bold'>Periodic Table Quiz</span>");
    page.append(&title);
    page.append(&gtk::Label::new(Some(&format!(
        "{} questions per round. Pick a difficulty to begin.",
        quiz::QUESTIONS_PER_ROUND
    ))));
    page.append(pages_difficulty);

    let start = gtk::Button::with_label("Start Quiz");
    start.add_css_class("suggested-action");
    page.append(&start);
    (page, start)
}

pub fn show_quiz_window(views: &Views, state: Rc<RefCell<AppState>>) {
    let window = gtk::Window::builder()
        .title("Quiz")
        .transient_for(&views.window)
        .default_width(560)
        .default_height(440)
        .build();

    let difficulty_labels: Vec<&str> = Difficulty::ALL.iter().map(|d| d.label()).collect();
    let difficulty = gtk::DropDown::from_strings(&difficulty_labels);
    let stack = gtk::Stack::new();
    stack.set_transition_type(gtk::StackTransitionType::Crossfade);
    if state.borrow().config.accessibility.reduced_motion {
        stack.set_transition_type(gtk::StackTransitionType::None);
    }

    // --- Start page ---
    let (start, btn_start) = start_page(&difficulty);
    stack.add_named(&start, Some(PAGE_START));

    // --- Question page ---
    let question_page = gtk::Box::new(gtk::Orientation::Vertical, 12);
    question_page.set_margin_top(20);
    question_page.set_margin_bottom(20);
    question_page.set_margin_start(20);
    question_page.set_margin_end(20);

    let status = gtk::Box::new(gtk::Orientation::Horizontal, 10);
    let progress = gtk::Label::builder().halign(gtk::Align::Start).hexpand(true).build();
    let score = gtk::Label::builder().halign(gtk::Align::End).build();
    status.append(&progress);
    status.append(&score);
    question_page.append(&status);

    let prompt = gtk::Label::builder().wrap(true).halign(gtk::Align::Start).build();
    prompt.add_css_class("title-3");
    question_page.append(&prompt);

    let option_grid = gtk::Grid::builder()
        .row_spacing(8)
        .column_spacing(8)
        .column_homogeneous(true)
        .build();
    let options: Vec<gtk::Button> = (0..OPTIONS_PER_QUESTION)
        .map(|i| {
            let b = gtk::Button::with_label("");
            option_grid.attach(&b, (i % 2) as i32, (i / 2) as i32, 1, 1);
            b
        })
        .collect();
    question_page.append(&option_grid);

    let feedback = gtk::Label::builder().halign(gtk::Align::Start).wrap(true).build();
    let explanation = gtk::Label::builder().halign(gtk::Align::Start).wrap(true).build();
    explanation.add_css_class("dim-label");
    question_page.append(&feedback);
    question_page.append(&explanation);

    let next = gtk::Button::with_label("Next Question");
    next.set_halign(gtk::Align::End);
    next.set_vexpand(true);
    next.set_valign(gtk::Align::End);
    question_page.append(&next);
    stack.add_named(&question_page, Some(PAGE_QUESTION));

    // --- Results page ---
    let results_page = gtk::Box::new(gtk::Orientation::Vertical, 12);
    results_page.set_valign(gtk::Align::Center);
    results_page.set_halign(gtk::Align::Center);
    let result_message = gtk::Label::new(None);
    result_message.add_css_class("title-2");
    let result_score = gtk::Label::new(None);
    let result_records = gtk::Label::new(None);
    result_records.set_justify(gtk::Justification::Center);
    let share = gtk::Label::builder().wrap(true).selectable(true).max_width_chars(50).build();
    share.add_css_class("dim-label");
    results_page.append(&result_message);
    results_page.append(&result_score);
    results_page.append(&result_records);
    results_page.append(&share);

    let result_buttons = gtk::Box::new(gtk::Orientation::Horizontal, 10);
    result_buttons.set_halign(gtk::Align::Center);
    let btn_copy = gtk::Button::with_label("Copy Share Text");
    let btn_again = gtk::Button::with_label("Play Again");
    let btn_close = gtk::Button::with_label("Close");
    result_buttons.append(&btn_copy);
    result_buttons.append(&btn_again);
    result_buttons.append(&btn_close);
    results_page.append(&result_buttons);
    stack.add_named(&results_page, Some(PAGE_RESULTS));

    window.set_child(Some(&stack));

    let pages = QuizPages {
        stack,
        difficulty,
        progress,
        score,
        prompt,
        options,
        feedback,
        explanation,
        next,
        result_message,
        result_score,
        result_records,
        share,
    };

    // --- Handlers ---
    let (s, p) = (state.clone(), pages.clone());
    btn_start.connect_clicked(move |_| {
        let level = Difficulty::ALL
            .get(p.difficulty.selected() as usize)
            .copied()
            .unwrap_or_default();
        {
            let mut st = s.borrow_mut();
            let questions = quiz::generate_round(&st.elements, level, &mut rand::rng());
            log::info!("Quiz started ({}, {} questions)", level.label(), questions.len());
            st.quiz = Some(QuizSession::new(level, questions));
        }
        p.show_question(&s);
    });

    for button in &pages.options {
        let (s, p) = (state.clone(), pages.clone());
        button.connect_clicked(move |b| {
            let choice = b.label().map(|l| l.to_string()).unwrap_or_default();
            p.answer(&s, &choice);
        });
    }

    let (s, p, v) = (state.clone(), pages.clone(), views.clone());
    pages.next.connect_clicked(move |_| {
        let more = s.borrow_mut().quiz.as_mut().map(|q| q.advance()).unwrap_or(false);
        if more {
            p.show_question(&s);
            return;
        }
        let results = s.borrow_mut().finish_quiz();
        if let Some(results) = results {
            log::info!("Quiz finished: {}", results_score_text(&results));
            p.show_results(&results);
        }
        s.borrow_mut().quiz = None;
        v.refresh(&s);
    });

    let p = pages.clone();
    let win = window.clone();
    btn_copy.connect_clicked(move |_| {
        win.clipboard().set_text(&p.share.text());
        log::info!("Share text copied to clipboard");
    });

    let p = pages.clone();
    btn_again.connect_clicked(move |_| p.stack.set_visible_child_name(PAGE_START));

    let win = window.clone();
    btn_close.connect_clicked(move |_| win.close());

    // An abandoned round does not count towards the records
    let s = state.clone();
    window.connect_close_request(move |_| {
        if s.borrow_mut().quiz.take().is_some() {
            log::info!("Quiz abandoned");
        }
        gtk::glib::Propagation::Proceed
    });

    pages.stack.set_visible_child_name(PAGE_START);
    window.present();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_texts() {
        let results = QuizResults {
            score: 7,
            total: 10,
            percentage: 70,
            max_streak: 4,
            best_score: 7,
            new_best: true,
        };
        assert_eq!(results_score_text(&results), "You scored 7 / 10 (70%)");
        assert_eq!(results_records_text(&results), "New best score: 7!\nLongest streak: 4");
        assert_eq!(progress_text((3, 10)), "Question 3 of 10");
        assert_eq!(score_text(2, 1), "Score: 2   Streak: 1");
    }
}
