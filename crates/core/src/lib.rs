#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod model;
pub mod progress;
pub mod quiz;
pub mod time;

pub use catalog::{Catalog, CatalogError};
pub use error::Error;
pub use quiz::{QuestionOutcome, QuizAttempt, QuizResult};
pub use time::Clock;
