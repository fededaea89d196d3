use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use spdlog::{debug, info};
use thiserror::Error;

pub const TOKEN_KEY: &str = "authToken";
pub const USER_ID_KEY: &str = "userId";
pub const USERNAME_KEY: &str = "username";
pub const PROFILE_PICTURE_KEY: &str = "profilePicture";

const SESSION_KEYS: [&str; 4] = [TOKEN_KEY, USER_ID_KEY, USERNAME_KEY, PROFILE_PICTURE_KEY];

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Io(#[from] io::Error),

    #[error("Session storage is corrupted: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistent string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

#[derive(Default)]
pub struct MemoryKeyValueStore {
    items: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Key-value storage kept as a JSON object in a single file.
pub struct FileKeyValueStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileKeyValueStore {
    pub fn open(path: &Path) -> Result<Self, SessionError> {
        let items = match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(FileKeyValueStore {
            path: path.to_path_buf(),
            items,
        })
    }

    fn flush(&self) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.items)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.items.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// A logged-in user. Produced by login or register, dropped by logout.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub profile_picture: String,
}

/// Keeps the current session in a key-value store.
pub struct SessionStore<K: KeyValueStore> {
    storage: K,
}

impl<K: KeyValueStore> SessionStore<K> {
    pub fn new(storage: K) -> Self {
        SessionStore { storage }
    }

    pub fn save(&mut self, session: &Session) -> Result<(), SessionError> {
        self.storage.set(TOKEN_KEY, &session.token)?;
        self.storage.set(USER_ID_KEY, &session.user_id)?;
        self.storage.set(USERNAME_KEY, &session.username)?;
        self.storage.set(PROFILE_PICTURE_KEY, &session.profile_picture)?;
        info!("Session saved for {}", session.username);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        for key in SESSION_KEYS {
            self.storage.remove(key)?;
        }
        debug!("Session cleared");
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY)
    }

    /// The stored session, if token, user id and username are all present.
    pub fn current(&self) -> Option<Session> {
        Some(Session {
            token: self.storage.get(TOKEN_KEY)?,
            user_id: self.storage.get(USER_ID_KEY)?,
            username: self.storage.get(USERNAME_KEY)?,
            profile_picture: self.storage.get(PROFILE_PICTURE_KEY).unwrap_or_default(),
        })
    }
}
