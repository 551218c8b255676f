use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::ids::{CourseId, LessonId, QuizId, UserId};

//
// ─── ROLE ──────────────────────────────────────────────────────────────────────
//

/// What a user can do on the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Instructor,
}

//
// ─── USER ──────────────────────────────────────────────────────────────────────
//

/// A learner (or instructor) together with their progress sets.
///
/// The serialized form is the persisted session snapshot:
/// `id`, `name`, `email`, `avatar`, `enrolledCourses`, `completedLessons`,
/// `completedQuizzes`, `role`. Each progress set holds unique ids; order carries
/// no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    avatar: String,
    #[serde(default)]
    enrolled_courses: BTreeSet<CourseId>,
    #[serde(default)]
    completed_lessons: BTreeSet<LessonId>,
    #[serde(default)]
    completed_quizzes: BTreeSet<QuizId>,
    #[serde(default)]
    role: Role,
}

impl User {
    /// Creates a user with empty progress sets.
    #[must_use]
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        avatar: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            avatar: avatar.into(),
            enrolled_courses: BTreeSet::new(),
            completed_lessons: BTreeSet::new(),
            completed_quizzes: BTreeSet::new(),
            role,
        }
    }

    #[must_use]
    pub fn with_enrolled_courses<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = CourseId>,
    {
        self.enrolled_courses.extend(ids);
        self
    }

    #[must_use]
    pub fn with_completed_lessons<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = LessonId>,
    {
        self.completed_lessons.extend(ids);
        self
    }

    #[must_use]
    pub fn with_completed_quizzes<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = QuizId>,
    {
        self.completed_quizzes.extend(ids);
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn enrolled_courses(&self) -> &BTreeSet<CourseId> {
        &self.enrolled_courses
    }

    #[must_use]
    pub fn completed_lessons(&self) -> &BTreeSet<LessonId> {
        &self.completed_lessons
    }

    #[must_use]
    pub fn completed_quizzes(&self) -> &BTreeSet<QuizId> {
        &self.completed_quizzes
    }

    #[must_use]
    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled_courses.contains(course_id)
    }

    #[must_use]
    pub fn has_completed_lesson(&self, lesson_id: &str) -> bool {
        self.completed_lessons.contains(lesson_id)
    }

    #[must_use]
    pub fn has_completed_quiz(&self, quiz_id: &str) -> bool {
        self.completed_quizzes.contains(quiz_id)
    }

    // Mutators return `true` only when the set actually changed.

    pub fn enroll(&mut self, course_id: CourseId) -> bool {
        self.enrolled_courses.insert(course_id)
    }

    pub fn complete_lesson(&mut self, lesson_id: LessonId) -> bool {
        self.completed_lessons.insert(lesson_id)
    }

    pub fn complete_quiz(&mut self, quiz_id: QuizId) -> bool {
        self.completed_quizzes.insert(quiz_id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> User {
        User::new(
            UserId::new("7"),
            "Ann",
            "ann@x.com",
            "https://example.com/a.png",
            Role::Student,
        )
    }

    #[test]
    fn new_user_has_empty_progress() {
        let user = student();
        assert!(user.enrolled_courses().is_empty());
        assert!(user.completed_lessons().is_empty());
        assert!(user.completed_quizzes().is_empty());
        assert_eq!(user.role(), Role::Student);
    }

    #[test]
    fn enroll_is_idempotent() {
        let mut user = student();
        assert!(user.enroll(CourseId::new("1")));
        assert!(!user.enroll(CourseId::new("1")));
        assert_eq!(user.enrolled_courses().len(), 1);
        assert!(user.is_enrolled("1"));
    }

    #[test]
    fn completion_sets_are_idempotent() {
        let mut user = student();
        user.complete_lesson(LessonId::new("1-1"));
        user.complete_lesson(LessonId::new("1-1"));
        user.complete_quiz(QuizId::new("quiz-1"));
        user.complete_quiz(QuizId::new("quiz-1"));
        assert_eq!(user.completed_lessons().len(), 1);
        assert_eq!(user.completed_quizzes().len(), 1);
        assert!(user.has_completed_lesson("1-1"));
        assert!(user.has_completed_quiz("quiz-1"));
    }

    #[test]
    fn snapshot_uses_camel_case_layout() {
        let user = student()
            .with_enrolled_courses([CourseId::new("1")])
            .with_completed_lessons([LessonId::new("1-1")]);
        let value = serde_json::to_value(&user).unwrap();

        assert_eq!(value["id"], "7");
        assert_eq!(value["role"], "student");
        assert_eq!(value["enrolledCourses"], serde_json::json!(["1"]));
        assert_eq!(value["completedLessons"], serde_json::json!(["1-1"]));
        assert_eq!(value["completedQuizzes"], serde_json::json!([]));
    }

    #[test]
    fn snapshot_with_duplicate_ids_collapses_to_a_set() {
        let raw = r#"{
            "id": "1",
            "name": "Alex",
            "email": "alex@example.com",
            "avatar": "",
            "enrolledCourses": ["1", "2", "1"],
            "completedLessons": [],
            "completedQuizzes": [],
            "role": "instructor"
        }"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.enrolled_courses().len(), 2);
        assert_eq!(user.role(), Role::Instructor);
    }
}
