use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{CourseId, LessonId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course id cannot be empty")]
    EmptyId,

    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("lesson in course {course} has an empty id or title")]
    InvalidLesson { course: CourseId },

    #[error("lesson {lesson} appears more than once in course {course}")]
    DuplicateLesson { course: CourseId, lesson: LessonId },

    #[error("rating must be between 0 and 5")]
    InvalidRating,

    #[error("price cannot be negative")]
    InvalidPrice,
}

//
// ─── ENUMS ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

/// How a lesson is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Video,
    Text,
    Quiz,
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A single unit of a course. `order` is a display hint; the course's lesson
/// sequence is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    id: LessonId,
    title: String,
    duration: String,
    #[serde(rename = "type")]
    kind: LessonKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_url: Option<String>,
    order: u32,
}

impl Lesson {
    #[must_use]
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        duration: impl Into<String>,
        kind: LessonKind,
        order: u32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            duration: duration.into(),
            kind,
            content: None,
            video_url: None,
            order,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn kind(&self) -> LessonKind {
        self.kind
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    #[must_use]
    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[must_use]
    pub fn is_quiz(&self) -> bool {
        self.kind == LessonKind::Quiz
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

/// Unvalidated course record, as read from a catalog source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub instructor: Instructor,
    pub category: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub students: u32,
    pub duration: String,
    pub level: Level,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl CourseDraft {
    /// Validate the draft into an immutable course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` for empty ids/titles, duplicate lesson ids, or
    /// out-of-range rating/price.
    pub fn validate(self) -> Result<Course, CourseError> {
        if self.id.as_str().trim().is_empty() {
            return Err(CourseError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        if !self.rating.is_finite() || !(0.0..=5.0).contains(&self.rating) {
            return Err(CourseError::InvalidRating);
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CourseError::InvalidPrice);
        }

        check_lessons(&self.id, &self.lessons)?;

        Ok(Course {
            id: self.id,
            title: self.title.trim().to_owned(),
            description: self.description,
            instructor: self.instructor,
            category: self.category,
            rating: self.rating,
            students: self.students,
            duration: self.duration,
            level: self.level,
            thumbnail: self.thumbnail,
            price: self.price,
            lessons: self.lessons,
        })
    }
}

fn check_lessons(course: &CourseId, lessons: &[Lesson]) -> Result<(), CourseError> {
    let mut seen = HashSet::with_capacity(lessons.len());
    for lesson in lessons {
        if lesson.id.as_str().trim().is_empty() || lesson.title.trim().is_empty() {
            return Err(CourseError::InvalidLesson {
                course: course.clone(),
            });
        }
        if !seen.insert(lesson.id.as_str()) {
            return Err(CourseError::DuplicateLesson {
                course: course.clone(),
                lesson: lesson.id.clone(),
            });
        }
    }
    Ok(())
}

/// A catalog course owning its ordered lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CourseDraft", rename_all = "camelCase")]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    instructor: Instructor,
    category: String,
    rating: f32,
    students: u32,
    duration: String,
    level: Level,
    thumbnail: String,
    price: f64,
    lessons: Vec<Lesson>,
}

impl TryFrom<CourseDraft> for Course {
    type Error = CourseError;

    fn try_from(draft: CourseDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl Course {
    // Accessors
    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn instructor(&self) -> &Instructor {
        &self.instructor
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn rating(&self) -> f32 {
        self.rating
    }

    #[must_use]
    pub fn students(&self) -> u32 {
        self.students
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn thumbnail(&self) -> &str {
        &self.thumbnail
    }

    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Lessons in course order.
    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id.as_str() == lesson_id)
    }

    /// Position of the lesson within the course sequence.
    #[must_use]
    pub fn lesson_position(&self, lesson_id: &str) -> Option<usize> {
        self.lessons.iter().position(|l| l.id.as_str() == lesson_id)
    }

    #[must_use]
    pub fn first_lesson(&self) -> Option<&Lesson> {
        self.lessons.first()
    }

    pub fn lesson_ids(&self) -> impl Iterator<Item = &LessonId> {
        self.lessons.iter().map(|l| &l.id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
