use std::time::Duration;

/// Storage key holding the serialized session snapshot.
pub const DEFAULT_SESSION_KEY: &str = "learnify-user";

pub const DEFAULT_AVATAR: &str = concat!(
    "https://images.pexels.com/photos/2379004/pexels-photo-2379004.jpeg",
    "?auto=compress&cs=tinysrgb&w=150",
);

/// Knobs for `SessionStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub session_key: String,
    /// Artificial delay before login and signup resolve.
    pub latency: Duration,
    /// Avatar assigned to accounts created by signup.
    pub default_avatar: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_key: DEFAULT_SESSION_KEY.to_owned(),
            latency: Duration::ZERO,
            default_avatar: DEFAULT_AVATAR.to_owned(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    #[must_use]
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }
}
