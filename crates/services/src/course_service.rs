use std::sync::Arc;

use learnify_core::Catalog;
use learnify_core::model::{Course, CourseId, LessonId, User};
use learnify_core::progress::{
    completed_lessons_in, course_progress, is_course_certified, round_percent,
};

use crate::error::SessionStoreError;
use crate::session_store::SessionStore;

/// Narrowing for the course list. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    pub category: Option<String>,
    pub query: Option<String>,
}

/// A course as seen by a particular (possibly anonymous) visitor.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseOverview<'a> {
    pub course: &'a Course,
    pub is_enrolled: bool,
    pub completed_lessons: usize,
    pub progress: f64,
    pub certified: bool,
}

impl CourseOverview<'_> {
    #[must_use]
    pub fn percent(&self) -> u8 {
        round_percent(self.progress)
    }
}

/// Result of a successful enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub user: User,
    /// Where the learner should start, if the course has lessons.
    pub first_lesson: Option<LessonId>,
}

/// Catalog browsing and enrollment.
#[derive(Clone)]
pub struct CourseService {
    catalog: Arc<Catalog>,
}

impl CourseService {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn list(&self, filter: &CourseFilter) -> Vec<&Course> {
        let query = filter.query.as_deref().unwrap_or_default();
        self.catalog
            .search(query)
            .filter(|course| {
                filter
                    .category
                    .as_deref()
                    .is_none_or(|cat| course.category().eq_ignore_ascii_case(cat))
            })
            .collect()
    }

    /// Course details plus the visitor's progress in it.
    ///
    /// Anonymous visitors see zero progress. Unknown ids give `None`.
    #[must_use]
    pub fn overview(&self, user: Option<&User>, course_id: &str) -> Option<CourseOverview<'_>> {
        let course = self.catalog.course(course_id)?;
        let Some(user) = user else {
            return Some(CourseOverview {
                course,
                is_enrolled: false,
                completed_lessons: 0,
                progress: 0.0,
                certified: false,
            });
        };
        Some(CourseOverview {
            course,
            is_enrolled: user.is_enrolled(course_id),
            completed_lessons: completed_lessons_in(user, course),
            progress: course_progress(user, course),
            certified: is_course_certified(user, course),
        })
    }

    /// Enroll the signed-in user in a catalog course.
    ///
    /// Returns `Ok(None)` without touching the session when nobody is signed
    /// in or the course id is unknown.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the snapshot cannot be written.
    pub async fn enroll(
        &self,
        session: &mut SessionStore,
        course_id: &str,
    ) -> Result<Option<Enrollment>, SessionStoreError> {
        let Some(course) = self.catalog.course(course_id) else {
            tracing::debug!(course_id, "enroll ignored: unknown course");
            return Ok(None);
        };
        let Some(user) = session.enroll(CourseId::new(course_id)).await? else {
            return Ok(None);
        };
        Ok(Some(Enrollment {
            user,
            first_lesson: course.first_lesson().map(|l| l.id().clone()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::seed::bundled_seed;
    use storage::repository::Storage;

    fn setup() -> (CourseService, SessionStore) {
        let seed = bundled_seed().unwrap();
        let storage = Storage::in_memory(seed.users);
        (
            CourseService::new(Arc::new(seed.catalog)),
            SessionStore::from_storage(&storage, SessionConfig::default()),
        )
    }

    #[test]
    fn list_filters_by_category_and_query() {
        let (courses, _) = setup();
        assert_eq!(courses.list(&CourseFilter::default()).len(), 4);

        let design = courses.list(&CourseFilter {
            category: Some("design".into()),
            query: None,
        });
        assert_eq!(design.len(), 1);
        assert_eq!(design[0].id().as_str(), "2");

        let react = courses.list(&CourseFilter {
            category: None,
            query: Some("react".into()),
        });
        assert_eq!(react.len(), 1);

        let none = courses.list(&CourseFilter {
            category: Some("Marketing".into()),
            query: Some("react".into()),
        });
        assert!(none.is_empty());
    }

    #[test]
    fn overview_for_anonymous_and_unknown() {
        let (courses, _) = setup();
        let anon = courses.overview(None, "1").unwrap();
        assert!(!anon.is_enrolled);
        assert_eq!(anon.percent(), 0);
        assert!(courses.overview(None, "99").is_none());
    }

    #[tokio::test]
    async fn enroll_requires_session_and_known_course() {
        let (courses, mut session) = setup();
        assert_eq!(courses.enroll(&mut session, "3").await.unwrap(), None);

        session.signup("Ann", "ann@x.com", "pw").await.unwrap();
        assert_eq!(courses.enroll(&mut session, "99").await.unwrap(), None);
        assert!(session.current_user().unwrap().enrolled_courses().is_empty());

        let enrollment = courses
            .enroll(&mut session, "3")
            .await
            .unwrap()
            .unwrap();
        assert!(enrollment.user.is_enrolled("3"));
        assert_eq!(enrollment.first_lesson, Some(LessonId::new("3-1")));

        let overview = courses.overview(session.current_user(), "3").unwrap();
        assert!(overview.is_enrolled);
    }
}
