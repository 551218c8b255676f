//! Bundled demo catalog and user directory.

use serde::Deserialize;

use learnify_core::Catalog;
use learnify_core::model::{Course, Quiz, User};

use crate::error::CatalogLoadError;

const BUNDLED_SEED: &str = include_str!("../data/catalog.json");

#[derive(Debug, Deserialize)]
struct Seed {
    courses: Vec<Course>,
    #[serde(default)]
    quizzes: Vec<Quiz>,
    #[serde(default)]
    users: Vec<User>,
}

/// Catalog plus the accounts that can log in.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub catalog: Catalog,
    pub users: Vec<User>,
}

/// Parse and validate a seed document.
///
/// Every quiz-type lesson must have a quiz attached.
///
/// # Errors
///
/// Returns `CatalogLoadError` for malformed JSON, invalid records, or
/// quiz lessons without a quiz.
pub fn parse_seed(json: &str) -> Result<SeedData, CatalogLoadError> {
    let seed: Seed = serde_json::from_str(json)?;
    let catalog =
        Catalog::new(seed.courses, seed.quizzes).map_err(learnify_core::Error::from)?;

    let orphans = catalog.quiz_lessons_without_quiz();
    if !orphans.is_empty() {
        let ids: Vec<&str> = orphans.iter().map(|id| id.as_str()).collect();
        return Err(CatalogLoadError::MissingQuiz(ids.join(", ")));
    }

    tracing::debug!(
        courses = catalog.courses().len(),
        quizzes = catalog.quizzes().len(),
        users = seed.users.len(),
        "loaded catalog seed"
    );
    Ok(SeedData {
        catalog,
        users: seed.users,
    })
}

/// The four demo courses, the React quiz, and the demo student.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the bundled document fails validation.
pub fn bundled_seed() -> Result<SeedData, CatalogLoadError> {
    parse_seed(BUNDLED_SEED)
}
