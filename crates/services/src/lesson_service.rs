use std::sync::Arc;

use chrono::{DateTime, Utc};
use learnify_core::model::{Course, Lesson, LessonId, QuizId, User};
use learnify_core::{Catalog, Clock, QuizAttempt, QuizResult};

use crate::error::SessionStoreError;
use crate::session_store::SessionStore;

/// Minimum score, in percent, that counts as passing a quiz.
pub const PASSING_SCORE: f64 = 70.0;

//
// ─── VIEW ──────────────────────────────────────────────────────────────────────
//

/// Everything needed to render one lesson inside its course.
#[derive(Debug, Clone)]
pub struct LessonView<'a> {
    pub course: &'a Course,
    pub lesson: &'a Lesson,
    /// Zero-based position within the course.
    pub position: usize,
    pub total: usize,
    pub previous: Option<&'a Lesson>,
    pub next: Option<&'a Lesson>,
    pub is_completed: bool,
    /// Fresh attempt for quiz lessons that have a quiz attached.
    pub quiz: Option<QuizAttempt>,
}

impl LessonView<'_> {
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// Outcome of handing a finished attempt to [`LessonService::finish_quiz`].
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSubmission {
    pub quiz_id: QuizId,
    pub lesson_id: LessonId,
    pub result: QuizResult,
    pub passed: bool,
    pub completed_at: DateTime<Utc>,
    /// False when nobody was signed in, so nothing was saved.
    pub recorded: bool,
}

impl QuizSubmission {
    #[must_use]
    pub fn score(&self) -> u8 {
        self.result.rounded_score()
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Lesson navigation and completion.
#[derive(Clone)]
pub struct LessonService {
    catalog: Arc<Catalog>,
    clock: Clock,
}

impl LessonService {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, clock: Clock) -> Self {
        Self { catalog, clock }
    }

    /// Look up a lesson and its neighbours.
    ///
    /// Returns `None` if either id is unknown or the lesson belongs to another
    /// course.
    #[must_use]
    pub fn open_lesson(
        &self,
        user: Option<&User>,
        course_id: &str,
        lesson_id: &str,
    ) -> Option<LessonView<'_>> {
        let course = self.catalog.course(course_id)?;
        let lesson = course.lesson(lesson_id)?;
        let position = course.lesson_position(lesson_id)?;
        let adjacent = self.catalog.adjacent_lessons(course_id, lesson_id)?;
        let quiz = lesson
            .is_quiz()
            .then(|| self.catalog.quiz_for_lesson(lesson_id))
            .flatten()
            .map(|quiz| QuizAttempt::new(quiz.clone()));

        Some(LessonView {
            course,
            lesson,
            position,
            total: course.lessons().len(),
            previous: adjacent.previous,
            next: adjacent.next,
            is_completed: user.is_some_and(|u| u.has_completed_lesson(lesson_id)),
            quiz,
        })
    }

    /// Mark a catalog lesson complete for the signed-in user.
    ///
    /// Unknown lessons and missing sessions give `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the snapshot cannot be written.
    pub async fn mark_complete(
        &self,
        session: &mut SessionStore,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<Option<User>, SessionStoreError> {
        let Some(lesson) = self.catalog.lesson(course_id, lesson_id) else {
            tracing::debug!(course_id, lesson_id, "mark_complete ignored: unknown lesson");
            return Ok(None);
        };
        session.complete_lesson(lesson.id().clone()).await
    }

    /// Record a finished attempt: the quiz and its lesson both become
    /// completed, whatever the score.
    ///
    /// Returns `Ok(None)` while the attempt is still in progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the snapshot cannot be written.
    pub async fn finish_quiz(
        &self,
        session: &mut SessionStore,
        attempt: &QuizAttempt,
    ) -> Result<Option<QuizSubmission>, SessionStoreError> {
        let Some(result) = attempt.result() else {
            return Ok(None);
        };
        let quiz = attempt.quiz();

        let recorded = session
            .complete_quiz_lesson(quiz.id().clone(), quiz.lesson_id().clone())
            .await?
            .is_some();

        let passed = result.score_percent() >= PASSING_SCORE;
        tracing::info!(
            quiz_id = %quiz.id(),
            score = result.rounded_score(),
            passed,
            recorded,
            "quiz finished"
        );

        Ok(Some(QuizSubmission {
            quiz_id: quiz.id().clone(),
            lesson_id: quiz.lesson_id().clone(),
            result: result.clone(),
            passed,
            completed_at: self.clock.now(),
            recorded,
        }))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::seed::bundled_seed;
    use async_trait::async_trait;
    use learnify_core::time::fixed_now;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::repository::{
        InMemoryStore, InMemoryUserDirectory, KeyValueStore, Storage, StorageError,
    };

    /// Accepts a fixed number of writes, then rejects every later one.
    struct WriteBudget {
        inner: InMemoryStore,
        writes_left: AtomicUsize,
    }

    #[async_trait]
    impl KeyValueStore for WriteBudget {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key).await
        }
        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let granted = self
                .writes_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if !granted {
                return Err(StorageError::Connection("disk full".into()));
            }
            self.inner.set(key, value).await
        }
        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key).await
        }
    }

    fn setup() -> (LessonService, SessionStore) {
        let seed = bundled_seed().unwrap();
        let storage = Storage::in_memory(seed.users);
        (
            LessonService::new(Arc::new(seed.catalog), Clock::fixed(fixed_now())),
            SessionStore::from_storage(&storage, SessionConfig::default()),
        )
    }

    fn answered(service: &LessonService, answers: &[usize]) -> QuizAttempt {
        let mut attempt = service.open_lesson(None, "1", "1-3").unwrap().quiz.unwrap();
        for a in answers {
            attempt.select_answer(*a);
            attempt.next();
        }
        attempt
    }

    #[test]
    fn open_lesson_reports_position_and_neighbours() {
        let (lessons, _) = setup();
        let view = lessons.open_lesson(None, "1", "1-2").unwrap();
        assert_eq!(view.position, 1);
        assert_eq!(view.total, 3);
        assert_eq!(view.previous.map(|l| l.id().as_str()), Some("1-1"));
        assert_eq!(view.next.map(|l| l.id().as_str()), Some("1-3"));
        assert!(view.quiz.is_none());
        assert!(!view.is_completed);

        let quiz = lessons.open_lesson(None, "1", "1-3").unwrap();
        assert!(quiz.is_last());
        assert_eq!(
            quiz.quiz.as_ref().map(|a| a.quiz().id().as_str()),
            Some("quiz-1")
        );
    }

    #[test]
    fn open_lesson_rejects_mismatched_ids() {
        let (lessons, _) = setup();
        assert!(lessons.open_lesson(None, "2", "1-1").is_none());
        assert!(lessons.open_lesson(None, "9", "1-1").is_none());
    }

    #[tokio::test]
    async fn mark_complete_needs_known_lesson_and_session() {
        let (lessons, mut session) = setup();
        let anonymous = lessons.mark_complete(&mut session, "1", "1-1").await;
        assert_eq!(anonymous.unwrap(), None);

        session.login("alex@example.com", "pw").await.unwrap();
        let unknown = lessons.mark_complete(&mut session, "1", "9-9").await;
        assert_eq!(unknown.unwrap(), None);

        let user = lessons
            .mark_complete(&mut session, "2", "2-1")
            .await
            .unwrap()
            .unwrap();
        assert!(user.has_completed_lesson("2-1"));
        assert!(
            lessons
                .open_lesson(session.current_user(), "2", "2-1")
                .unwrap()
                .is_completed
        );
    }

    #[tokio::test]
    async fn finish_quiz_records_quiz_and_lesson() {
        let (lessons, mut session) = setup();
        session.signup("Ann", "ann@x.com", "pw").await.unwrap();

        let submission = lessons
            .finish_quiz(&mut session, &answered(&lessons, &[1, 0, 1]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(submission.score(), 67);
        assert!(!submission.passed);
        assert!(submission.recorded);
        assert_eq!(submission.completed_at, fixed_now());

        let user = session.current_user().unwrap();
        assert!(user.has_completed_quiz("quiz-1"));
        assert!(user.has_completed_lesson("1-3"));
    }

    #[tokio::test]
    async fn finish_quiz_ignores_incomplete_attempts() {
        let (lessons, mut session) = setup();
        session.signup("Ann", "ann@x.com", "pw").await.unwrap();
        let attempt = answered(&lessons, &[1, 1]);
        assert!(!attempt.is_complete());
        let submission = lessons.finish_quiz(&mut session, &attempt).await;
        assert_eq!(submission.unwrap(), None);
        assert!(session.current_user().unwrap().completed_quizzes().is_empty());
    }

    #[tokio::test]
    async fn finish_quiz_without_session_still_scores() {
        let (lessons, mut session) = setup();
        let submission = lessons
            .finish_quiz(&mut session, &answered(&lessons, &[1, 1, 1]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(submission.score(), 100);
        assert!(submission.passed);
        assert!(!submission.recorded);
    }

    #[tokio::test]
    async fn failed_quiz_write_records_neither_quiz_nor_lesson() {
        let seed = bundled_seed().unwrap();
        let lessons = LessonService::new(Arc::new(seed.catalog), Clock::fixed(fixed_now()));
        let inner = InMemoryStore::new();
        let mut session = SessionStore::new(
            Arc::new(WriteBudget {
                inner: inner.clone(),
                writes_left: AtomicUsize::new(1),
            }),
            Arc::new(InMemoryUserDirectory::default()),
            SessionConfig::default(),
        );
        session.signup("Ann", "ann@x.com", "pw").await.unwrap();

        let attempt = answered(&lessons, &[1, 1, 1]);
        assert!(lessons.finish_quiz(&mut session, &attempt).await.is_err());

        let user = session.current_user().unwrap();
        assert!(!user.has_completed_quiz("quiz-1"));
        assert!(!user.has_completed_lesson("1-3"));

        let raw = inner.get("learnify-user").await.unwrap().unwrap();
        let stored: User = serde_json::from_str(&raw).unwrap();
        assert!(stored.completed_quizzes().is_empty());
        assert!(stored.completed_lessons().is_empty());
    }

    #[tokio::test]
    async fn finish_quiz_writes_one_snapshot() {
        let seed = bundled_seed().unwrap();
        let lessons = LessonService::new(Arc::new(seed.catalog), Clock::fixed(fixed_now()));
        let mut session = SessionStore::new(
            Arc::new(WriteBudget {
                inner: InMemoryStore::new(),
                writes_left: AtomicUsize::new(2),
            }),
            Arc::new(InMemoryUserDirectory::default()),
            SessionConfig::default(),
        );
        session.signup("Ann", "ann@x.com", "pw").await.unwrap();

        let attempt = answered(&lessons, &[1, 1, 1]);
        let submission = lessons
            .finish_quiz(&mut session, &attempt)
            .await
            .unwrap()
            .unwrap();
        assert!(submission.recorded);
        let user = session.current_user().unwrap();
        assert!(user.has_completed_quiz("quiz-1"));
        assert!(user.has_completed_lesson("1-3"));
    }
}
