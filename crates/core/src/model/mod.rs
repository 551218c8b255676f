mod course;
mod ids;
mod quiz;
mod user;

pub use ids::{CourseId, LessonId, QuestionId, QuizId, UserId};

pub use course::{Course, CourseDraft, CourseError, Instructor, Lesson, LessonKind, Level};
pub use quiz::{Quiz, QuizDraft, QuizError, QuizQuestion, QuizQuestionDraft};
pub use user::{Role, User};
