use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;

use crate::model::{Course, CourseId, Lesson, LessonId, Quiz, QuizId, User};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Cross-record problems detected when assembling a catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("course {0} is defined more than once")]
    DuplicateCourse(CourseId),

    #[error("quiz {0} is defined more than once")]
    DuplicateQuiz(QuizId),

    #[error("lesson {0} is defined in more than one course")]
    DuplicateLesson(LessonId),

    #[error("quiz {quiz} refers to unknown lesson {lesson}")]
    UnknownQuizLesson { quiz: QuizId, lesson: LessonId },

    #[error("lesson {0} has more than one quiz")]
    MultipleQuizzes(LessonId),
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Read-only collection of courses and quizzes.
///
/// Every lookup returns `None` (or an empty iterator) for unknown ids; the
/// catalog never fails after construction.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    quizzes: Vec<Quiz>,
    course_index: HashMap<CourseId, usize>,
    quiz_by_lesson: HashMap<LessonId, usize>,
}

/// Neighbours of a lesson inside its course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjacentLessons<'a> {
    pub previous: Option<&'a Lesson>,
    pub next: Option<&'a Lesson>,
}

impl Catalog {
    /// Assemble a catalog, checking ids and quiz references.
    ///
    /// Lesson ids must be unique across the whole catalog because progress
    /// sets store bare lesson ids.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for duplicate ids or a quiz pointing at a lesson
    /// that does not exist.
    pub fn new(courses: Vec<Course>, quizzes: Vec<Quiz>) -> Result<Self, CatalogError> {
        let mut course_index = HashMap::with_capacity(courses.len());
        let mut lessons = HashSet::new();
        for (idx, course) in courses.iter().enumerate() {
            if course_index.insert(course.id().clone(), idx).is_some() {
                return Err(CatalogError::DuplicateCourse(course.id().clone()));
            }
            for id in course.lesson_ids() {
                if !lessons.insert(id.clone()) {
                    return Err(CatalogError::DuplicateLesson(id.clone()));
                }
            }
        }

        let mut quiz_ids = HashSet::with_capacity(quizzes.len());
        let mut quiz_by_lesson = HashMap::with_capacity(quizzes.len());
        for (idx, quiz) in quizzes.iter().enumerate() {
            if !quiz_ids.insert(quiz.id().clone()) {
                return Err(CatalogError::DuplicateQuiz(quiz.id().clone()));
            }
            if !lessons.contains(quiz.lesson_id()) {
                return Err(CatalogError::UnknownQuizLesson {
                    quiz: quiz.id().clone(),
                    lesson: quiz.lesson_id().clone(),
                });
            }
            if quiz_by_lesson.insert(quiz.lesson_id().clone(), idx).is_some() {
                return Err(CatalogError::MultipleQuizzes(quiz.lesson_id().clone()));
            }
        }

        Ok(Self {
            courses,
            quizzes,
            course_index,
            quiz_by_lesson,
        })
    }

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[must_use]
    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    #[must_use]
    pub fn course(&self, course_id: &str) -> Option<&Course> {
        self.course_index
            .get(course_id)
            .and_then(|idx| self.courses.get(*idx))
    }

    #[must_use]
    pub fn lesson(&self, course_id: &str, lesson_id: &str) -> Option<&Lesson> {
        self.course(course_id)?.lesson(lesson_id)
    }

    #[must_use]
    pub fn quiz(&self, quiz_id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id().as_str() == quiz_id)
    }

    #[must_use]
    pub fn quiz_for_lesson(&self, lesson_id: &str) -> Option<&Quiz> {
        self.quiz_by_lesson
            .get(lesson_id)
            .and_then(|idx| self.quizzes.get(*idx))
    }

    /// Previous and next lesson in course order.
    #[must_use]
    pub fn adjacent_lessons(
        &self,
        course_id: &str,
        lesson_id: &str,
    ) -> Option<AdjacentLessons<'_>> {
        let course = self.course(course_id)?;
        let pos = course.lesson_position(lesson_id)?;
        let lessons = course.lessons();
        Some(AdjacentLessons {
            previous: pos.checked_sub(1).and_then(|p| lessons.get(p)),
            next: lessons.get(pos + 1),
        })
    }

    /// Catalog courses the user is enrolled in, in catalog order.
    ///
    /// Enrollment ids with no matching course are skipped.
    pub fn enrolled_courses<'a>(
        &'a self,
        user: &'a User,
    ) -> impl Iterator<Item = &'a Course> + 'a {
        self.courses
            .iter()
            .filter(move |c| user.is_enrolled(c.id().as_str()))
    }

    /// Distinct categories, sorted.
    #[must_use]
    pub fn categories(&self) -> BTreeSet<&str> {
        self.courses.iter().map(Course::category).collect()
    }

    pub fn courses_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Course> + 'a {
        self.courses
            .iter()
            .filter(move |c| c.category().eq_ignore_ascii_case(category))
    }

    /// Case-insensitive match on title, description, or instructor name.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Course> + 'a {
        let needle = query.trim().to_lowercase();
        self.courses.iter().filter(move |c| {
            needle.is_empty()
                || c.title().to_lowercase().contains(&needle)
                || c.description().to_lowercase().contains(&needle)
                || c.instructor().name.to_lowercase().contains(&needle)
        })
    }

    /// Quiz-type lessons that have no quiz attached.
    #[must_use]
    pub fn quiz_lessons_without_quiz(&self) -> Vec<&LessonId> {
        self.courses
            .iter()
            .flat_map(Course::lessons)
            .filter(|l| l.is_quiz() && !self.quiz_by_lesson.contains_key(l.id().as_str()))
            .map(Lesson::id)
            .collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CourseDraft, Instructor, LessonKind, Level, QuestionId, QuizDraft, QuizQuestionDraft,
        Role, UserId,
    };

    fn course(id: &str, category: &str, lessons: &[(&str, LessonKind)]) -> Course {
        CourseDraft {
            id: CourseId::new(id),
            title: format!("Course {id}"),
            description: format!("About course {id}"),
            instructor: Instructor {
                name: "Sarah Chen".into(),
                avatar: String::new(),
            },
            category: category.into(),
            rating: 4.5,
            students: 100,
            duration: "1 hour".into(),
            level: Level::Beginner,
            thumbnail: String::new(),
            price: 10.0,
            lessons: lessons
                .iter()
                .zip(1..)
                .map(|((lid, kind), order)| {
                    Lesson::new(LessonId::new(*lid), format!("Lesson {lid}"), "5 min", *kind, order)
                })
                .collect(),
        }
        .validate()
        .unwrap()
    }

    fn quiz(id: &str, lesson: &str) -> Quiz {
        QuizDraft {
            id: QuizId::new(id),
            lesson_id: LessonId::new(lesson),
            title: "Quiz".into(),
            questions: vec![
                QuizQuestionDraft {
                    id: QuestionId::new("q1"),
                    question: "?".into(),
                    options: vec!["a".into(), "b".into()],
                    correct_answer: 1,
                    explanation: String::new(),
                }
                .validate()
                .unwrap(),
            ],
        }
        .validate()
        .unwrap()
    }

    fn sample() -> Catalog {
        Catalog::new(
            vec![
                course(
                    "1",
                    "Web Development",
                    &[
                        ("1-1", LessonKind::Video),
                        ("1-2", LessonKind::Text),
                        ("1-3", LessonKind::Quiz),
                    ],
                ),
                course("2", "Design", &[("2-1", LessonKind::Video)]),
                course("3", "Design", &[]),
            ],
            vec![quiz("quiz-1", "1-3")],
        )
        .unwrap()
    }

    #[test]
    fn lookups_return_none_for_unknown_ids() {
        let catalog = sample();
        assert!(catalog.course("9").is_none());
        assert!(catalog.lesson("1", "2-1").is_none());
        assert!(catalog.lesson("9", "1-1").is_none());
        assert!(catalog.quiz_for_lesson("1-1").is_none());
        assert!(catalog.quiz("quiz-9").is_none());
        assert!(catalog.adjacent_lessons("1", "9-9").is_none());
    }

    #[test]
    fn finds_quiz_by_lesson() {
        let catalog = sample();
        let quiz = catalog.quiz_for_lesson("1-3").unwrap();
        assert_eq!(quiz.id().as_str(), "quiz-1");
        assert!(catalog.quiz_lessons_without_quiz().is_empty());
    }

    #[test]
    fn adjacent_lessons_follow_course_order() {
        let catalog = sample();
        let first = catalog.adjacent_lessons("1", "1-1").unwrap();
        assert!(first.previous.is_none());
        assert_eq!(first.next.map(|l| l.id().as_str()), Some("1-2"));

        let last = catalog.adjacent_lessons("1", "1-3").unwrap();
        assert_eq!(last.previous.map(|l| l.id().as_str()), Some("1-2"));
        assert!(last.next.is_none());
    }

    #[test]
    fn enrolled_courses_skip_unknown_ids() {
        let catalog = sample();
        let user = User::new(UserId::new("1"), "Alex", "alex@example.com", "", Role::Student)
            .with_enrolled_courses([CourseId::new("2"), CourseId::new("missing")]);
        let ids: Vec<_> = catalog
            .enrolled_courses(&user)
            .map(|c| c.id().as_str())
            .collect();
        assert_eq!(ids, ["2"]);
    }

    #[test]
    fn categories_and_search() {
        let catalog = sample();
        let cats: Vec<_> = catalog.categories().into_iter().collect();
        assert_eq!(cats, ["Design", "Web Development"]);
        assert_eq!(catalog.courses_in_category("design").count(), 2);
        assert_eq!(catalog.search("course 1").count(), 1);
        assert_eq!(catalog.search("  ").count(), 3);
        assert_eq!(catalog.search("sarah").count(), 3);
    }

    #[test]
    fn rejects_quiz_for_unknown_lesson() {
        let err = Catalog::new(vec![course("1", "x", &[])], vec![quiz("quiz-1", "1-3")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownQuizLesson { .. }));
    }

    #[test]
    fn rejects_duplicate_courses_and_lessons() {
        let err = Catalog::new(
            vec![course("1", "x", &[]), course("1", "y", &[])],
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateCourse(CourseId::new("1")));

        let err = Catalog::new(
            vec![
                course("1", "x", &[("a", LessonKind::Video)]),
                course("2", "x", &[("a", LessonKind::Text)]),
            ],
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateLesson(LessonId::new("a")));
    }

    #[test]
    fn reports_quiz_lessons_without_quiz() {
        let catalog = Catalog::new(
            vec![course("1", "x", &[("1-3", LessonKind::Quiz)])],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(
            catalog.quiz_lessons_without_quiz(),
            vec![&LessonId::new("1-3")]
        );
    }
}
