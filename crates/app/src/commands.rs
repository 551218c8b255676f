use anyhow::{Context, bail};
use learnify_core::model::User;
use services::{AppServices, CourseFilter, SessionStore};

use crate::cli::Commands;

/// Run one subcommand against a session restored from storage.
pub async fn dispatch(
    command: Commands,
    app: &AppServices,
    session: &mut SessionStore,
) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => {
            let Some(user) = session.login(&email, &password).await? else {
                bail!("no account accepts {email} with that password");
            };
            println!("Logged in as {} <{}>", user.name(), user.email());
        }
        Commands::Signup {
            email,
            name,
            password,
        } => {
            let user = session.signup(&name, &email, &password).await?;
            println!("Welcome, {}! Your id is {}.", user.name(), user.id());
        }
        Commands::Logout => {
            session.logout().await?;
            println!("Logged out.");
        }
        Commands::Whoami => match session.current_user() {
            Some(user) => print_user(user),
            None => println!("Not logged in."),
        },
        Commands::Courses { category, search } => {
            let filter = CourseFilter {
                category,
                query: search,
            };
            let courses = app.course_service();
            for course in courses.list(&filter) {
                let marker = if session
                    .current_user()
                    .is_some_and(|u| u.is_enrolled(course.id().as_str()))
                {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{marker} [{}] {} ({}, {:?}, {} lessons, ${:.2})",
                    course.id(),
                    course.title(),
                    course.category(),
                    course.level(),
                    course.lessons().len(),
                    course.price(),
                );
            }
        }
        Commands::Course { course_id } => {
            let courses = app.course_service();
            let overview = courses
                .overview(session.current_user(), &course_id)
                .with_context(|| format!("no course with id {course_id}"))?;
            let course = overview.course;
            println!("{} by {}", course.title(), course.instructor().name);
            println!("{}", course.description());
            println!(
                "{} | {:?} | {} | rating {:.1} | {} students",
                course.category(),
                course.level(),
                course.duration(),
                course.rating(),
                course.students()
            );
            if overview.is_enrolled {
                println!(
                    "Progress: {}% ({}/{} lessons){}",
                    overview.percent(),
                    overview.completed_lessons,
                    course.lessons().len(),
                    if overview.certified { ", certified" } else { "" }
                );
            }
            for lesson in course.lessons() {
                let done = session
                    .current_user()
                    .is_some_and(|u| u.has_completed_lesson(lesson.id().as_str()));
                println!(
                    "  [{}] {} {} ({:?}, {})",
                    if done { "x" } else { " " },
                    lesson.id(),
                    lesson.title(),
                    lesson.kind(),
                    lesson.duration()
                );
            }
        }
        Commands::Enroll { course_id } => {
            require_user(session)?;
            let Some(enrollment) = app.course_service().enroll(session, &course_id).await? else {
                bail!("no course with id {course_id}");
            };
            match enrollment.first_lesson {
                Some(first) => println!("Enrolled. Start with lesson {first}."),
                None => println!("Enrolled."),
            }
        }
        Commands::Lesson {
            course_id,
            lesson_id,
        } => {
            let lessons = app.lesson_service();
            let view = lessons
                .open_lesson(session.current_user(), &course_id, &lesson_id)
                .with_context(|| format!("no lesson {lesson_id} in course {course_id}"))?;
            println!(
                "{} · lesson {} of {}",
                view.course.title(),
                view.position + 1,
                view.total
            );
            let done = if view.is_completed { " (completed)" } else { "" };
            println!("{}{done}", view.lesson.title());
            if let Some(url) = view.lesson.video_url() {
                println!("Video: {url}");
            }
            if let Some(content) = view.lesson.content() {
                println!("\n{content}\n");
            }
            if let Some(attempt) = &view.quiz {
                for (idx, question) in attempt.quiz().questions().iter().enumerate() {
                    println!("{}. {}", idx + 1, question.question());
                    for (opt, text) in question.options().iter().enumerate() {
                        println!("   {opt}) {text}");
                    }
                }
            }
            if let Some(prev) = view.previous {
                println!("Previous: {} {}", prev.id(), prev.title());
            }
            if let Some(next) = view.next {
                println!("Next: {} {}", next.id(), next.title());
            }
        }
        Commands::Complete {
            course_id,
            lesson_id,
        } => {
            require_user(session)?;
            let lessons = app.lesson_service();
            if lessons
                .mark_complete(session, &course_id, &lesson_id)
                .await?
                .is_none()
            {
                bail!("no lesson {lesson_id} in course {course_id}");
            }
            let next = lessons
                .open_lesson(session.current_user(), &course_id, &lesson_id)
                .and_then(|view| view.next.map(|l| l.id().clone()));
            match next {
                Some(next) => println!("Lesson {lesson_id} completed. Next up: {next}."),
                None => println!("Lesson {lesson_id} completed. That was the last lesson."),
            }
        }
        Commands::Quiz {
            course_id,
            lesson_id,
            answers,
        } => {
            require_user(session)?;
            let lessons = app.lesson_service();
            let mut attempt = lessons
                .open_lesson(session.current_user(), &course_id, &lesson_id)
                .with_context(|| format!("no lesson {lesson_id} in course {course_id}"))?
                .quiz
                .with_context(|| format!("lesson {lesson_id} has no quiz"))?;

            let expected = attempt.quiz().question_count();
            if answers.len() != expected {
                bail!("expected {expected} answers, got {}", answers.len());
            }
            for (idx, answer) in answers.into_iter().enumerate() {
                if !attempt.select_answer(answer) {
                    bail!("question {} has no option {answer}", idx + 1);
                }
                attempt.next();
            }

            let submission = lessons
                .finish_quiz(session, &attempt)
                .await?
                .context("quiz attempt did not complete")?;
            for (idx, outcome) in submission.result.outcomes().iter().enumerate() {
                println!(
                    "{}. {} {}",
                    idx + 1,
                    if outcome.is_correct { "✓" } else { "✗" },
                    outcome.question
                );
                if !outcome.is_correct {
                    println!(
                        "   Your answer: {}",
                        outcome.selected_text.as_deref().unwrap_or("not answered")
                    );
                    println!("   Correct answer: {}", outcome.correct_text);
                }
                println!("   {}", outcome.explanation);
            }
            println!(
                "Score: {}% ({}/{}) {}",
                submission.score(),
                submission.result.correct(),
                submission.result.total(),
                if submission.passed { "passed" } else { "not passed" }
            );
        }
        Commands::Dashboard => {
            let user = require_user(session)?;
            let stats = app.dashboard(user);
            println!("Welcome back, {}!", user.name());
            println!(
                "Enrolled: {} | Lessons completed: {} | Certificates: {} | Overall: {}%",
                stats.enrolled_courses,
                stats.completed_lessons,
                stats.certificates,
                stats.overall_percent()
            );
            for row in &stats.courses {
                println!(
                    "  [{}] {}: {}% ({}/{}){}",
                    row.course_id,
                    row.title,
                    row.percent(),
                    row.completed,
                    row.total,
                    if row.certified { " certified" } else { "" }
                );
                if let Some(next) = &row.next_lesson {
                    println!("      Continue: learnify lesson {} {next}", row.course_id);
                }
            }
        }
    }
    Ok(())
}

fn require_user(session: &SessionStore) -> anyhow::Result<&User> {
    session
        .current_user()
        .context("not logged in; run `learnify login <email>` first")
}

fn print_user(user: &User) {
    println!("{} <{}> ({:?})", user.name(), user.email(), user.role());
    println!("  id: {}", user.id());
    println!("  enrolled courses: {}", user.enrolled_courses().len());
    println!("  completed lessons: {}", user.completed_lessons().len());
    println!("  completed quizzes: {}", user.completed_quizzes().len());
}
