use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{LessonId, QuestionId, QuizId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz {0} has no questions")]
    NoQuestions(QuizId),

    #[error("question {0} has no options")]
    NoOptions(QuestionId),

    #[error("question {question} marks option {index} correct but has {len} options")]
    CorrectAnswerOutOfRange {
        question: QuestionId,
        index: usize,
        len: usize,
    },

    #[error("question {0} appears more than once")]
    DuplicateQuestion(QuestionId),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Unvalidated question record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionDraft {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestionDraft {
    /// # Errors
    ///
    /// Returns `QuizError` when there are no options or `correct_answer` does
    /// not index into them.
    pub fn validate(self) -> Result<QuizQuestion, QuizError> {
        if self.options.is_empty() {
            return Err(QuizError::NoOptions(self.id));
        }
        if self.correct_answer >= self.options.len() {
            return Err(QuizError::CorrectAnswerOutOfRange {
                index: self.correct_answer,
                len: self.options.len(),
                question: self.id,
            });
        }
        Ok(QuizQuestion {
            id: self.id,
            question: self.question,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
        })
    }
}

/// A multiple-choice question. `correct_answer` always indexes into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuizQuestionDraft", rename_all = "camelCase")]
pub struct QuizQuestion {
    id: QuestionId,
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: String,
}

impl TryFrom<QuizQuestionDraft> for QuizQuestion {
    type Error = QuizError;

    fn try_from(draft: QuizQuestionDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl QuizQuestion {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer]
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_answer
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDraft {
    pub id: QuizId,
    pub lesson_id: LessonId,
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

impl QuizDraft {
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty quiz and
    /// `QuizError::DuplicateQuestion` when question ids repeat.
    pub fn validate(self) -> Result<Quiz, QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions(self.id));
        }
        let mut seen = HashSet::with_capacity(self.questions.len());
        for question in &self.questions {
            if !seen.insert(question.id.clone()) {
                return Err(QuizError::DuplicateQuestion(question.id.clone()));
            }
        }
        Ok(Quiz {
            id: self.id,
            lesson_id: self.lesson_id,
            title: self.title,
            questions: self.questions,
        })
    }
}

/// A quiz attached (by id only) to a quiz-type lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuizDraft", rename_all = "camelCase")]
pub struct Quiz {
    id: QuizId,
    lesson_id: LessonId,
    title: String,
    questions: Vec<QuizQuestion>,
}

impl TryFrom<QuizDraft> for Quiz {
    type Error = QuizError;

    fn try_from(draft: QuizDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl Quiz {
    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
