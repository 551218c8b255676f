use learnify_core::Catalog;
use learnify_core::model::{Course, CourseId, LessonId, User};
use learnify_core::progress::{
    completed_lessons_in, course_progress, is_course_certified, overall_progress, round_percent,
};

/// Progress of one enrolled course.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseProgressRow {
    pub course_id: CourseId,
    pub title: String,
    pub completed: usize,
    pub total: usize,
    pub progress: f64,
    pub certified: bool,
    /// First lesson in course order not yet completed; where "Continue" leads.
    pub next_lesson: Option<LessonId>,
}

impl CourseProgressRow {
    fn new(user: &User, course: &Course) -> Self {
        Self {
            course_id: course.id().clone(),
            title: course.title().to_owned(),
            completed: completed_lessons_in(user, course),
            total: course.lessons().len(),
            progress: course_progress(user, course),
            certified: is_course_certified(user, course),
            next_lesson: course
                .lessons()
                .iter()
                .find(|l| !user.has_completed_lesson(l.id().as_str()))
                .map(|l| l.id().clone()),
        }
    }

    #[must_use]
    pub fn percent(&self) -> u8 {
        round_percent(self.progress)
    }
}

/// Headline numbers for a learner's dashboard.
///
/// Only courses present in the catalog count; lessons completed outside the
/// enrolled courses are not included.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub enrolled_courses: usize,
    pub completed_lessons: usize,
    pub certificates: usize,
    pub overall_progress: f64,
    pub courses: Vec<CourseProgressRow>,
}

impl DashboardStats {
    #[must_use]
    pub fn for_user(user: &User, catalog: &Catalog) -> Self {
        let courses: Vec<CourseProgressRow> = catalog
            .enrolled_courses(user)
            .map(|course| CourseProgressRow::new(user, course))
            .collect();

        Self {
            enrolled_courses: courses.len(),
            completed_lessons: courses.iter().map(|row| row.completed).sum(),
            certificates: courses.iter().filter(|row| row.certified).count(),
            overall_progress: overall_progress(user, catalog.enrolled_courses(user)),
            courses,
        }
    }

    #[must_use]
    pub fn overall_percent(&self) -> u8 {
        round_percent(self.overall_progress)
    }
}
