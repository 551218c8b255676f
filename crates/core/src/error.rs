use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::{CourseError, QuizError};

/// Any validation failure raised while building domain records.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
