//! Completion metrics derived from a user's progress sets.
//!
//! Nothing here is stored: every value is recomputed from `completedLessons`
//! and the catalog, so the completed-lesson set stays the single source of
//! truth.

use crate::model::{Course, User};

/// Number of the course's lessons the user has completed.
#[must_use]
pub fn completed_lessons_in(user: &User, course: &Course) -> usize {
    course
        .lesson_ids()
        .filter(|id| user.has_completed_lesson(id.as_str()))
        .count()
}

/// Share of the course's lessons completed, as a percentage in `[0, 100]`.
///
/// A course without lessons is at 0.
#[must_use]
pub fn course_progress(user: &User, course: &Course) -> f64 {
    percentage(completed_lessons_in(user, course), course.lessons().len())
}

/// Completed lessons across the given courses divided by their total lesson
/// count, as a percentage. 0 when the courses have no lessons at all.
#[must_use]
pub fn overall_progress<'a, I>(user: &User, enrolled: I) -> f64
where
    I: IntoIterator<Item = &'a Course>,
{
    let (done, total) = enrolled.into_iter().fold((0, 0), |(done, total), course| {
        (
            done + completed_lessons_in(user, course),
            total + course.lessons().len(),
        )
    });
    percentage(done, total)
}

/// True when every lesson of the course is in the completed set.
///
/// Vacuously true for a course without lessons.
#[must_use]
pub fn is_course_certified(user: &User, course: &Course) -> bool {
    course
        .lesson_ids()
        .all(|id| user.has_completed_lesson(id.as_str()))
}

/// Round a percentage for display, clamped to `[0, 100]`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_percent(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CourseDraft, CourseId, Instructor, Lesson, LessonId, LessonKind, Level, Role, UserId,
    };

    fn course(id: &str, lessons: &[&str]) -> Course {
        CourseDraft {
            id: CourseId::new(id),
            title: format!("Course {id}"),
            description: String::new(),
            instructor: Instructor {
                name: "Dr. Emily Watson".into(),
                avatar: String::new(),
            },
            category: "AI & Machine Learning".into(),
            rating: 4.7,
            students: 1,
            duration: "16 hours".into(),
            level: Level::Advanced,
            thumbnail: String::new(),
            price: 129.99,
            lessons: lessons
                .iter()
                .zip(1..)
                .map(|(lid, order)| {
                    Lesson::new(LessonId::new(*lid), "Lesson", "5 min", LessonKind::Video, order)
                })
                .collect(),
        }
        .validate()
        .unwrap()
    }

    fn user(completed: &[&str]) -> User {
        User::new(UserId::new("u"), "Ann", "ann@x.com", "", Role::Student)
            .with_completed_lessons(completed.iter().map(|id| LessonId::new(*id)))
    }

    #[test]
    fn progress_steps_through_a_three_lesson_course() {
        let c = course("1", &["L1", "L2", "L3"]);
        assert_eq!(round_percent(course_progress(&user(&[]), &c)), 0);
        assert_eq!(round_percent(course_progress(&user(&["L1"]), &c)), 33);
        assert_eq!(round_percent(course_progress(&user(&["L1", "L2"]), &c)), 67);
        assert_eq!(
            round_percent(course_progress(&user(&["L1", "L2", "L3"]), &c)),
            100
        );
    }

    #[test]
    fn empty_course_is_zero_percent() {
        let c = course("1", &[]);
        assert!(course_progress(&user(&["L1"]), &c).abs() < f64::EPSILON);
    }

    #[test]
    fn lessons_from_other_courses_do_not_count() {
        let c = course("1", &["L1", "L2"]);
        let u = user(&["X1", "X2", "L1"]);
        assert_eq!(completed_lessons_in(&u, &c), 1);
        assert!((course_progress(&u, &c) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn hundred_percent_iff_certified() {
        let c = course("1", &["L1", "L2"]);
        for done in [&[][..], &["L1"][..], &["L2"][..], &["L1", "L2"][..]] {
            let u = user(done);
            let full = (course_progress(&u, &c) - 100.0).abs() < f64::EPSILON;
            assert_eq!(full, is_course_certified(&u, &c));
        }
    }

    #[test]
    fn overall_progress_spans_enrolled_courses() {
        let a = course("1", &["1-1", "1-2", "1-3"]);
        let b = course("2", &["2-1"]);
        let u = user(&["1-1", "2-1", "9-9"]);
        assert_eq!(round_percent(overall_progress(&u, [&a, &b])), 50);
        assert!(overall_progress(&u, Vec::<&Course>::new()).abs() < f64::EPSILON);
        assert!(overall_progress(&u, [&course("3", &[])]).abs() < f64::EPSILON);
    }

    #[test]
    fn round_percent_clamps() {
        assert_eq!(round_percent(-3.0), 0);
        assert_eq!(round_percent(150.0), 100);
        assert_eq!(round_percent(f64::NAN), 0);
        assert_eq!(round_percent(66.5), 67);
    }
}
