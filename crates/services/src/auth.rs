use learnify_core::model::User;

/// Decides whether a password unlocks an account found in the directory.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, user: &User, password: &str) -> bool;
}

/// Accepts every password.
///
/// The demo directory has no stored credentials, so login succeeds on email
/// alone. Plug a real verifier in through `SessionStore::with_verifier`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAnyPassword;

impl CredentialVerifier for AcceptAnyPassword {
    fn verify(&self, _user: &User, _password: &str) -> bool {
        true
    }
}
