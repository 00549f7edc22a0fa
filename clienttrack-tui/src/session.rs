//! On-disk session storage.
//!
//! The token and user profile are written to the per-user config directory
//! after signup/login, loaded at startup to restore the session, and
//! removed on logout.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clienttrack_core::models::UserProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

fn session_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("dev", "rocket-tycoon", "clienttrack")
        .context("could not resolve a config directory")?;
    Ok(dirs.config_dir().join("session.json"))
}

/// Restore a saved session, if any. Unreadable or stale files read as
/// "not logged in".
pub fn load() -> Option<Session> {
    let path = session_path().ok()?;
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

pub fn save(session: &Session) -> Result<()> {
    let path = session_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(session)?)?;
    Ok(())
}

pub fn clear() -> Result<()> {
    let path = session_path()?;
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn session_round_trips_through_json() {
        let session = Session {
            token: "abc.def.ghi".into(),
            user: UserProfile {
                id: Uuid::new_v4(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
        };

        let raw = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored.token, session.token);
        assert_eq!(restored.user.id, session.user.id);
    }
}
