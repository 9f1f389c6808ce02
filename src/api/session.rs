use crate::api::types::AuthResponse;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// An authenticated dashboard session, persisted between runs as a small
/// JSON blob. Holds the issued token, never the access code itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
    pub token: String,
    pub company: String,
    pub email: Option<String>,
    pub level: String,
    #[serde(rename = "loginAt")]
    pub login_at: DateTime<Utc>,
}

impl Session {
    pub fn from_auth(auth: &AuthResponse) -> Self {
        Self {
            authenticated: true,
            token: auth.access_token.clone(),
            company: auth.client.company_name.clone(),
            email: auth.client.email.clone(),
            level: auth.client.access_level.clone(),
            login_at: Utc::now(),
        }
    }
}

/// File-backed session persistence. A missing or unreadable blob simply
/// means no session; corruption is treated the same way.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Option<Session> {
        let raw = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Logout. Removing a blob that does not exist is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ClientInfo;
    use tempfile::tempdir;

    fn sample_auth() -> AuthResponse {
        AuthResponse {
            access_token: "jwt-token".to_string(),
            expires_in: 24 * 3600,
            client: ClientInfo {
                company_name: "Demo Engineering Co.".to_string(),
                email: Some("demo@geotech.ru".to_string()),
                access_level: "standard".to_string(),
            },
        }
    }

    #[test]
    fn test_save_load_clear_round_trip() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        assert!(store.load().is_none());

        let session = Session::from_auth(&sample_auth());
        store.save(&session).unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.authenticated);
        assert_eq!(loaded.token, "jwt-token");
        assert_eq!(loaded.company, "Demo Engineering Co.");
        assert_eq!(loaded.level, "standard");

        store.clear().unwrap();
        assert!(store.load().is_none());
        // clearing twice stays quiet
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_blob_means_no_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = SessionStore::new(&path);
        assert!(store.load().is_none());
    }
}
