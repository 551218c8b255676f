use std::sync::Arc;

use learnify_core::model::{CourseId, LessonId, QuizId, Role, User, UserId};
use storage::repository::{KeyValueStore, Storage, UserDirectory};

use crate::auth::{AcceptAnyPassword, CredentialVerifier};
use crate::config::SessionConfig;
use crate::error::SessionStoreError;

/// The signed-in user and their persisted snapshot.
///
/// Owned by whoever drives the UI; there is no global session. Every method
/// that changes the user writes the whole snapshot back under the session key
/// before returning, and hands the caller a copy of the new state.
///
/// Without an active session the mutating methods do nothing and return
/// `Ok(None)`.
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
    directory: Arc<dyn UserDirectory>,
    verifier: Arc<dyn CredentialVerifier>,
    config: SessionConfig,
    current: Option<User>,
}

impl SessionStore {
    #[must_use]
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        directory: Arc<dyn UserDirectory>,
        config: SessionConfig,
    ) -> Self {
        Self {
            kv,
            directory,
            verifier: Arc::new(AcceptAnyPassword),
            config,
            current: None,
        }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, config: SessionConfig) -> Self {
        Self::new(Arc::clone(&storage.kv), Arc::clone(&storage.users), config)
    }

    #[must_use]
    pub fn with_verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Restore the snapshot saved by a previous run.
    ///
    /// Missing, unreadable, or malformed snapshots all mean "logged out"; this
    /// never fails.
    pub async fn load_session(&mut self) -> Option<User> {
        let raw = match self.kv.get(&self.config.session_key).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored session");
                None
            }
        };

        self.current = raw.and_then(|raw| match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed session snapshot");
                None
            }
        });

        if let Some(user) = &self.current {
            tracing::info!(user_id = %user.id(), "restored session");
        }
        self.current.clone()
    }

    /// Sign in as the directory account registered under `email`.
    ///
    /// Returns `Ok(None)` when no account matches or the verifier refuses the
    /// password; the current session is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the directory or snapshot storage fails.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, SessionStoreError> {
        self.simulate_latency().await;

        let Some(user) = self.directory.find_by_email(email).await? else {
            tracing::info!(email, "login failed: unknown email");
            return Ok(None);
        };
        if !self.verifier.verify(&user, password) {
            tracing::info!(email, "login failed: credentials rejected");
            return Ok(None);
        }

        self.persist(&user).await?;
        tracing::info!(user_id = %user.id(), "logged in");
        self.current = Some(user.clone());
        Ok(Some(user))
    }

    /// Create a fresh student account and sign in as it.
    ///
    /// The password is not stored anywhere.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the snapshot cannot be written.
    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        _password: &str,
    ) -> Result<User, SessionStoreError> {
        self.simulate_latency().await;

        let user = User::new(
            UserId::generate(),
            name,
            email,
            self.config.default_avatar.as_str(),
            Role::Student,
        );
        self.persist(&user).await?;
        tracing::info!(user_id = %user.id(), "signed up");
        self.current = Some(user.clone());
        Ok(user)
    }

    /// Forget the current user, in memory and in storage.
    ///
    /// The in-memory session is cleared even if removing the snapshot fails.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the stored snapshot cannot be removed.
    pub async fn logout(&mut self) -> Result<(), SessionStoreError> {
        if let Some(user) = self.current.take() {
            tracing::info!(user_id = %user.id(), "logged out");
        }
        self.kv.remove(&self.config.session_key).await?;
        Ok(())
    }

    /// Add `course_id` to the enrolled set.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the snapshot cannot be written.
    pub async fn enroll(
        &mut self,
        course_id: CourseId,
    ) -> Result<Option<User>, SessionStoreError> {
        self.update("enroll", |user| user.enroll(course_id)).await
    }

    /// Add `lesson_id` to the completed-lesson set.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the snapshot cannot be written.
    pub async fn complete_lesson(
        &mut self,
        lesson_id: LessonId,
    ) -> Result<Option<User>, SessionStoreError> {
        self.update("complete_lesson", |user| user.complete_lesson(lesson_id))
            .await
    }

    /// Add `quiz_id` to the completed-quiz set.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the snapshot cannot be written.
    pub async fn complete_quiz(
        &mut self,
        quiz_id: QuizId,
    ) -> Result<Option<User>, SessionStoreError> {
        self.update("complete_quiz", |user| user.complete_quiz(quiz_id))
            .await
    }

    /// Record a finished quiz together with the lesson that hosts it.
    ///
    /// Both ids land in one snapshot write, so either both are saved or
    /// neither is.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the snapshot cannot be written.
    pub async fn complete_quiz_lesson(
        &mut self,
        quiz_id: QuizId,
        lesson_id: LessonId,
    ) -> Result<Option<User>, SessionStoreError> {
        self.update("complete_quiz_lesson", |user| {
            let quiz = user.complete_quiz(quiz_id);
            let lesson = user.complete_lesson(lesson_id);
            quiz || lesson
        })
        .await
    }

    async fn update<F>(
        &mut self,
        action: &'static str,
        apply: F,
    ) -> Result<Option<User>, SessionStoreError>
    where
        F: FnOnce(&mut User) -> bool,
    {
        let Some(current) = self.current.as_ref() else {
            tracing::debug!(action, "ignored: no active session");
            return Ok(None);
        };

        let mut next = current.clone();
        if !apply(&mut next) {
            tracing::debug!(action, user_id = %next.id(), "already recorded");
            return Ok(Some(next));
        }

        self.persist(&next).await?;
        tracing::info!(action, user_id = %next.id(), "session updated");
        self.current = Some(next.clone());
        Ok(Some(next))
    }

    async fn persist(&self, user: &User) -> Result<(), SessionStoreError> {
        let snapshot = serde_json::to_string(user)?;
        self.kv.set(&self.config.session_key, &snapshot).await?;
        Ok(())
    }

    async fn simulate_latency(&self) {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
    }
}
