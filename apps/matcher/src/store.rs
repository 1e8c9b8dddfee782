//! Session/History Store — user accounts and match history in a JSON flat file.
//!
//! Loaded once at process start, saved after every mutation. Writes are
//! plain last-writer-wins overwrites: concurrent sessions for different
//! users are not serialized against each other. That is acceptable for
//! single-operator interactive use and is a documented limitation, not
//! something this module papers over.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;

/// One persisted match run. Skill fields only ever hold canonical registry
/// identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub match_percentage: f64,
    pub resume_skills: Vec<String>,
    pub job_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Identity of the logged-in user, passed explicitly to every operation
/// that touches per-user state. There is no ambient "current user".
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
}

/// The on-disk account map plus its backing path.
pub struct UserStore {
    path: PathBuf,
    accounts: BTreeMap<String, UserAccount>,
}

impl UserStore {
    /// Loads the store from `path`. A missing file is a fresh store; a file
    /// that fails to parse is quarantined (renamed aside, original bytes
    /// preserved) and the store starts empty rather than crashing.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let accounts = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(accounts) => accounts,
                Err(e) => {
                    let backup = quarantine_path(path);
                    warn!(
                        "User store {} is corrupt ({e}); moving it to {} and starting empty",
                        path.display(),
                        backup.display()
                    );
                    std::fs::rename(path, &backup)?;
                    BTreeMap::new()
                }
            },
        };
        Ok(UserStore {
            path: path.to_path_buf(),
            accounts,
        })
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Creates an account. Duplicate usernames are an auth failure and leave
    /// the store untouched.
    pub fn register(&mut self, username: &str, password: &str) -> Result<(), AppError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".to_string(),
            ));
        }
        if self.accounts.contains_key(username) {
            return Err(AppError::Auth(format!("Username '{username}' is already taken")));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))?
            .to_string();

        self.accounts.insert(
            username.to_string(),
            UserAccount {
                username: username.to_string(),
                password_hash,
                history: Vec::new(),
                profile_image: None,
            },
        );
        self.save()?;
        info!("Registered account '{username}'");
        Ok(())
    }

    /// Verifies credentials and opens a session. Unknown user and wrong
    /// password produce the same message; nothing is mutated either way.
    pub fn login(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let account = self
            .accounts
            .get(username)
            .ok_or_else(|| AppError::Auth("Invalid username or password".to_string()))?;

        let parsed = PasswordHash::new(&account.password_hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored hash unreadable: {e}")))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AppError::Auth("Invalid username or password".to_string()))?;

        Ok(Session {
            username: username.to_string(),
        })
    }

    pub fn history(&self, session: &Session) -> Result<&[HistoryEntry], AppError> {
        Ok(&self.account(session)?.history)
    }

    /// Appends a match run to the session user's history and saves.
    pub fn append_history(
        &mut self,
        session: &Session,
        entry: HistoryEntry,
    ) -> Result<(), AppError> {
        self.account_mut(session)?.history.push(entry);
        self.save()
    }

    /// Empties the session user's history (the account itself is never
    /// deleted) and saves.
    pub fn clear_history(&mut self, session: &Session) -> Result<(), AppError> {
        self.account_mut(session)?.history.clear();
        self.save()
    }

    pub fn set_profile_image(
        &mut self,
        session: &Session,
        reference: Option<String>,
    ) -> Result<(), AppError> {
        self.account_mut(session)?.profile_image = reference;
        self.save()
    }

    fn account(&self, session: &Session) -> Result<&UserAccount, AppError> {
        self.accounts
            .get(&session.username)
            .ok_or_else(|| AppError::Auth("Session user no longer exists".to_string()))
    }

    fn account_mut(&mut self, session: &Session) -> Result<&mut UserAccount, AppError> {
        self.accounts
            .get_mut(&session.username)
            .ok_or_else(|| AppError::Auth("Session user no longer exists".to_string()))
    }

    /// Serializes the whole account map over the previous file contents.
    fn save(&self) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(&self.accounts)
            .map_err(|e| AppError::Store(format!("Could not serialize store: {e}")))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

fn quarantine_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    path.with_file_name(name)
}
