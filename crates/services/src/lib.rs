#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth;
pub mod config;
pub mod course_service;
pub mod dashboard;
pub mod error;
pub mod lesson_service;
pub mod seed;
pub mod session_store;

pub use learnify_core::Clock;

pub use app_services::AppServices;
pub use auth::{AcceptAnyPassword, CredentialVerifier};
pub use config::SessionConfig;
pub use course_service::{CourseFilter, CourseOverview, CourseService, Enrollment};
pub use dashboard::{CourseProgressRow, DashboardStats};
pub use error::{AppServicesError, CatalogLoadError, SessionStoreError};
pub use lesson_service::{LessonService, LessonView, PASSING_SCORE, QuizSubmission};
pub use seed::{SeedData, bundled_seed, parse_seed};
pub use session_store::SessionStore;
