//! Authenticated session model and on-disk persistence.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, io::ErrorKind, path::Path};

/// Access level granted by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Pesquisador,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Wire/display label, matching what the backend stores.
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Pesquisador => "pesquisador",
        }
    }
}

/// One account row as returned by `GET /api/users`.
#[derive(Clone, Debug, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub name: String,
    pub role: Role,
}

/// The logged-in user, persisted between runs in `session.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub name: String,
    pub role: Role,
}

impl Session {
    /// Read the persisted session, if any. A missing or corrupt file is
    /// treated as no session.
    pub fn load(path: &Path) -> Option<Self> {
        let data = fs::read(path).ok()?;
        serde_json::from_slice(&data).ok()
    }

    /// Persist the session after a successful login.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    /// Remove the persisted session on logout. A missing file is fine.
    pub fn clear(path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_round_trips_through_disk() {
        let path = std::env::temp_dir().join("transcritor_tui_session_test.json");
        let session = Session {
            username: "maria".into(),
            name: "Maria da Silva".into(),
            role: Role::Pesquisador,
        };
        session.save(&path).unwrap();
        assert_eq!(Session::load(&path), Some(session));

        Session::clear(&path).unwrap();
        assert_eq!(Session::load(&path), None);
        // Clearing twice must not fail.
        Session::clear(&path).unwrap();
    }

    #[test]
    fn corrupt_session_file_reads_as_absent() {
        let path = std::env::temp_dir().join("transcritor_tui_session_corrupt.json");
        fs::write(&path, b"not json").unwrap();
        assert_eq!(Session::load(&path), None);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn role_serializes_with_backend_labels() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"pesquisador\"").unwrap(),
            Role::Pesquisador
        );
    }
}
