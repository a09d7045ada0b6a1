//! User records and their JSON persistence.
//!
//! A user record is one collected account: its unique id, an optional
//! screen name for display, and the set of account ids it follows. Records
//! are stored as a JSON array:
//!
//! ```json
//! [
//!   { "id": "783214", "screen_name": "alice", "friends": ["12", "99"] },
//!   { "id": "6253282", "friends_id": [12, 41] }
//! ]
//! ```
//!
//! Ids may be JSON strings or integers; both are stored as strings. The
//! followed-account list is accepted under `friends` or `friends_id`.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, instrument};

/// Errors from loading or saving user records.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid user record JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two records share the same user id.
    #[error("duplicate user id in records: {0}")]
    DuplicateUser(String),
}

/// One collected user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    #[serde(default, alias = "friends_id", deserialize_with = "id_set")]
    pub friends: BTreeSet<String>,
}

impl UserRecord {
    /// Create a record with no screen name.
    pub fn new<I, S>(id: impl Into<String>, friends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            screen_name: None,
            friends: friends.into_iter().map(Into::into).collect(),
        }
    }

    /// Attach a screen name.
    #[must_use]
    pub fn with_screen_name(mut self, name: impl Into<String>) -> Self {
        self.screen_name = Some(name.into());
        self
    }

    /// Display label: the screen name if known, else the id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.screen_name.as_deref().unwrap_or(&self.id)
    }
}

/// Parse a JSON array of user records.
///
/// # Errors
///
/// Returns [`RecordError::Parse`] on malformed JSON and
/// [`RecordError::DuplicateUser`] if an id appears twice.
pub fn parse_users(json: &str) -> Result<Vec<UserRecord>, RecordError> {
    let users: Vec<UserRecord> = serde_json::from_str(json)?;
    let mut seen = HashSet::with_capacity(users.len());
    for user in &users {
        if !seen.insert(user.id.as_str()) {
            return Err(RecordError::DuplicateUser(user.id.clone()));
        }
    }
    Ok(users)
}

/// Load user records from a JSON file.
///
/// # Errors
///
/// Returns [`RecordError::Io`] if the file cannot be read, or any error
/// from [`parse_users`].
#[instrument]
pub fn load_users(path: &Path) -> Result<Vec<UserRecord>, RecordError> {
    let content = fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let users = parse_users(&content)?;
    debug!(count = users.len(), "loaded user records");
    Ok(users)
}

/// Write user records to a JSON file, replacing any existing content.
///
/// # Errors
///
/// Returns [`RecordError::Io`] if the file cannot be written.
#[instrument(skip(users), fields(count = users.len()))]
pub fn save_users(path: &Path, users: &[UserRecord]) -> Result<(), RecordError> {
    let json = serde_json::to_string_pretty(users)?;
    fs::write(path, json).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    RawId::deserialize(de).map(String::from)
}

fn id_set<'de, D: Deserializer<'de>>(de: D) -> Result<BTreeSet<String>, D::Error> {
    let raw: Vec<RawId> = Vec::deserialize(de)?;
    Ok(raw.into_iter().map(String::from).collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
