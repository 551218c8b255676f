use std::collections::BTreeMap;

use crate::model::{QuestionId, Quiz, QuizId};

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq)]
enum AttemptState {
    InProgress {
        current: usize,
        answers: BTreeMap<usize, usize>,
    },
    Completed(QuizResult),
}

/// One pass through a quiz.
///
/// Starts on the first question with no answers and moves to a terminal
/// completed state when `next` is called on the last question. The engine does
/// not refuse to advance past an unanswered question; callers that want that
/// guard check [`QuizAttempt::has_answer`] first. Revisiting a quiz means
/// building a new attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizAttempt {
    quiz: Quiz,
    state: AttemptState,
}

impl QuizAttempt {
    #[must_use]
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            state: AttemptState::InProgress {
                current: 0,
                answers: BTreeMap::new(),
            },
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Index of the question being shown, or `None` once completed.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match &self.state {
            AttemptState::InProgress { current, .. } => Some(*current),
            AttemptState::Completed(_) => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&crate::model::QuizQuestion> {
        self.current_index()
            .and_then(|idx| self.quiz.questions().get(idx))
    }

    /// Option recorded for the current question.
    #[must_use]
    pub fn selected_answer(&self) -> Option<usize> {
        match &self.state {
            AttemptState::InProgress { current, answers } => answers.get(current).copied(),
            AttemptState::Completed(_) => None,
        }
    }

    /// Whether the current question has an answer; the caller-side guard for
    /// enabling "next".
    #[must_use]
    pub fn has_answer(&self) -> bool {
        self.selected_answer().is_some()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index()
            .is_some_and(|idx| idx + 1 == self.quiz.question_count())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, AttemptState::Completed(_))
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        match &self.state {
            AttemptState::Completed(result) => Some(result),
            AttemptState::InProgress { .. } => None,
        }
    }

    /// Record (or overwrite) the answer to the current question.
    ///
    /// Returns `false` without changing anything when the attempt is complete
    /// or `option` does not index into the question's options.
    pub fn select_answer(&mut self, option: usize) -> bool {
        let AttemptState::InProgress { current, answers } = &mut self.state else {
            return false;
        };
        let in_range = self
            .quiz
            .questions()
            .get(*current)
            .is_some_and(|q| option < q.options().len());
        if !in_range {
            return false;
        }
        answers.insert(*current, option);
        true
    }

    /// Advance one question, or finish the attempt from the last question.
    ///
    /// No effect once completed.
    pub fn next(&mut self) {
        let AttemptState::InProgress { current, answers } = &mut self.state else {
            return;
        };
        if *current + 1 < self.quiz.question_count() {
            *current += 1;
            return;
        }
        let result = QuizResult::score(&self.quiz, answers);
        self.state = AttemptState::Completed(result);
    }

    /// Step back one question, keeping every recorded answer.
    pub fn previous(&mut self) {
        if let AttemptState::InProgress { current, .. } = &mut self.state {
            *current = current.saturating_sub(1);
        }
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// Per-question breakdown shown after a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub question_id: QuestionId,
    pub question: String,
    pub selected: Option<usize>,
    pub selected_text: Option<String>,
    pub correct_answer: usize,
    pub correct_text: String,
    pub explanation: String,
    pub is_correct: bool,
}

/// Final score of a completed attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    quiz_id: QuizId,
    correct: usize,
    total: usize,
    outcomes: Vec<QuestionOutcome>,
}

impl QuizResult {
    fn score(quiz: &Quiz, answers: &BTreeMap<usize, usize>) -> Self {
        let outcomes: Vec<_> = quiz
            .questions()
            .iter()
            .enumerate()
            .map(|(idx, q)| {
                let selected = answers.get(&idx).copied();
                QuestionOutcome {
                    question_id: q.id().clone(),
                    question: q.question().to_owned(),
                    selected,
                    selected_text: selected.and_then(|s| q.option(s)).map(str::to_owned),
                    correct_answer: q.correct_answer(),
                    correct_text: q.correct_option().to_owned(),
                    explanation: q.explanation().to_owned(),
                    is_correct: selected.is_some_and(|s| q.is_correct(s)),
                }
            })
            .collect();
        let correct = outcomes.iter().filter(|o| o.is_correct).count();

        Self {
            quiz_id: quiz.id().clone(),
            correct,
            total: outcomes.len(),
            outcomes,
        }
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// `100 * correct / total`, unrounded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }

    /// Score rounded for display.
    #[must_use]
    pub fn rounded_score(&self) -> u8 {
        crate::progress::round_percent(self.score_percent())
    }

    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
