use crate::errors::{StockchatError, StockchatResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

const USER_FILE: &str = "user.json";
// Written by no current code path; removed on logout in case an older build
// left one behind.
const LEGACY_SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
}

/// Mock identity. The role is derived entirely from the email string; this is
/// a placeholder, not a trust boundary, and nothing downstream may treat it
/// as one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub role: Role,
    pub name: String,
    pub login_time: DateTime<Utc>,
}

impl User {
    fn from_email(email: &str) -> Self {
        let role = if email.contains("admin") {
            Role::Admin
        } else {
            Role::Client
        };
        let name = match role {
            Role::Admin => "Admin User",
            Role::Client => "Client User",
        };
        Self {
            email: email.to_string(),
            role,
            name: name.to_string(),
            login_time: Utc::now(),
        }
    }
}

/// Explicit persistence boundary for the logged-in user: loaded once at
/// startup, written at login, removed at logout. No ambient state.
#[derive(Debug)]
pub struct AuthStore {
    dir: PathBuf,
    user: Option<User>,
}

impl AuthStore {
    /// Opens the store under `dir`, loading a previously persisted login if
    /// one parses; an unreadable file is discarded rather than surfaced.
    pub fn open(dir: PathBuf) -> Self {
        let user_path = dir.join(USER_FILE);
        let user = fs::read_to_string(&user_path)
            .ok()
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::warn!("discarding corrupt login file: {}", e);
                    let _ = fs::remove_file(&user_path);
                    None
                }
            });
        Self { dir, user }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.user.as_ref().map(|u| u.role), Some(Role::Admin))
    }

    pub fn login(&mut self, email: &str) -> StockchatResult<&User> {
        let user = User::from_email(email.trim());

        fs::create_dir_all(&self.dir).map_err(|e| {
            StockchatError::storage_error(format!("Failed to create auth directory: {}", e))
        })?;
        let raw = serde_json::to_string_pretty(&user)
            .map_err(|e| StockchatError::storage_error(format!("Failed to serialize user: {}", e)))?;
        fs::write(self.dir.join(USER_FILE), raw).map_err(|e| {
            StockchatError::storage_error(format!("Failed to persist login: {}", e))
        })?;

        log::info!("logged in as {} ({:?})", user.email, user.role);
        self.user = Some(user);
        Ok(self.user.as_ref().expect("just set"))
    }

    pub fn logout(&mut self) {
        self.user = None;
        let _ = fs::remove_file(self.dir.join(USER_FILE));
        let _ = fs::remove_file(self.dir.join(LEGACY_SESSION_FILE));
        log::info!("logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_role_is_derived_from_email() {
        let dir = tempdir().unwrap();
        let mut store = AuthStore::open(dir.path().to_path_buf());

        let user = store.login("admin@makerstech.com").unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.name, "Admin User");
        assert!(store.is_admin());

        let user = store.login("jane@makerstech.com").unwrap();
        assert_eq!(user.role, Role::Client);
        assert_eq!(user.name, "Client User");
        assert!(!store.is_admin());
    }

    #[test]
    fn test_login_survives_reopen() {
        let dir = tempdir().unwrap();
        let mut store = AuthStore::open(dir.path().to_path_buf());
        store.login("admin@makerstech.com").unwrap();

        let reopened = AuthStore::open(dir.path().to_path_buf());
        assert!(reopened.is_authenticated());
        assert!(reopened.is_admin());
        assert_eq!(reopened.user().unwrap().email, "admin@makerstech.com");
    }

    #[test]
    fn test_logout_removes_persisted_state() {
        let dir = tempdir().unwrap();
        let mut store = AuthStore::open(dir.path().to_path_buf());
        store.login("jane@makerstech.com").unwrap();
        store.logout();

        assert!(!store.is_authenticated());
        assert!(!dir.path().join(USER_FILE).exists());

        let reopened = AuthStore::open(dir.path().to_path_buf());
        assert!(!reopened.is_authenticated());
    }

    #[test]
    fn test_corrupt_user_file_is_discarded() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(USER_FILE), "not json").unwrap();

        let store = AuthStore::open(dir.path().to_path_buf());
        assert!(!store.is_authenticated());
        assert!(!dir.path().join(USER_FILE).exists());
    }
}
