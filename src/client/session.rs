use std::fs;
use std::path::PathBuf;

use crate::auth::dto::PublicUser;
use crate::client::ClientError;

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// Authenticated session: user profile plus bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: PublicUser,
    pub token: String,
}

/// Holds the current session in memory, mirrored to two files (`token` and
/// `user`) under a storage directory. `set_auth` and `logout` are the only
/// mutators; both update memory and disk together.
pub struct SessionStore {
    dir: PathBuf,
    session: Option<Session>,
}

impl SessionStore {
    /// Reconstructs the session from durable storage. If either key is
    /// missing or unreadable the store starts unauthenticated.
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let token = fs::read_to_string(dir.join(TOKEN_KEY)).ok();
        let user = fs::read_to_string(dir.join(USER_KEY))
            .ok()
            .and_then(|s| serde_json::from_str::<PublicUser>(&s).ok());

        let session = match (token, user) {
            (Some(token), Some(user)) => Some(Session { user, token }),
            _ => None,
        };

        Self { dir, session }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn user(&self) -> Option<&PublicUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Establish a session: persist both keys, then swap the in-memory
    /// state. Nothing changes in memory if a write fails.
    pub fn set_auth(&mut self, user: PublicUser, token: String) -> Result<(), ClientError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(TOKEN_KEY), &token)?;
        fs::write(self.dir.join(USER_KEY), serde_json::to_string(&user)?)?;
        self.session = Some(Session { user, token });
        Ok(())
    }

    /// Clear the session: both keys are removed together and memory is
    /// cleared regardless of whether the files existed.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        for key in [TOKEN_KEY, USER_KEY] {
            match fs::remove_file(self.dir.join(key)) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.session = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user() -> PublicUser {
        PublicUser {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
        }
    }

    #[test]
    fn starts_unauthenticated_when_storage_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::load(dir.path());
        assert!(store.session().is_none());
        assert!(store.token().is_none());
    }

    #[test]
    fn set_auth_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let u = user();

        let mut store = SessionStore::load(dir.path());
        store.set_auth(u.clone(), "jwt-token".into()).unwrap();
        assert_eq!(store.token(), Some("jwt-token"));

        let reloaded = SessionStore::load(dir.path());
        let session = reloaded.session().expect("session restored");
        assert_eq!(session.token, "jwt-token");
        assert_eq!(session.user.email, u.email);
        assert_eq!(session.user.id, u.id);
    }

    #[test]
    fn logout_clears_memory_and_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::load(dir.path());
        store.set_auth(user(), "jwt-token".into()).unwrap();

        store.logout().unwrap();
        assert!(store.session().is_none());
        assert!(SessionStore::load(dir.path()).session().is_none());

        // Logging out twice is fine.
        store.logout().unwrap();
    }

    #[test]
    fn missing_user_key_means_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("token"), "jwt-token").unwrap();
        let store = SessionStore::load(dir.path());
        assert!(store.session().is_none());
    }

    #[test]
    fn corrupt_user_json_means_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("token"), "jwt-token").unwrap();
        std::fs::write(dir.path().join("user"), "{not json").unwrap();
        let store = SessionStore::load(dir.path());
        assert!(store.session().is_none());
    }
}
