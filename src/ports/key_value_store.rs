//! Key-Value Store Port - persistence of named JSON blobs.
//!
//! The journey persists three blobs (cycle, entries, insight). Each is
//! written whole, so a put either replaces the previous value or fails.

use async_trait::async_trait;
use thiserror::Error;

/// Port for string-valued key/value persistence.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` for a key that was never written or was deleted
/// - Replace the whole value on `put` (no partial writes)
/// - Treat deleting a missing key as success
/// - Report a stored value that is not valid text as `StorageError::Corrupt`
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value, replacing any previous one.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Errors that can occur during key-value storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The backing medium failed.
    #[error("IO error: {message}")]
    Io { message: String },

    /// A value could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// A stored value exists but cannot be read back as text.
    #[error("Corrupt value at '{key}': {message}")]
    Corrupt { key: String, message: String },
}

impl StorageError {
    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a corrupt-value error for a key.
    pub fn corrupt(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Returns true if the stored value is unreadable rather than the
    /// medium having failed.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

/// Physical keys for the three journey blobs.
///
/// With the default prefix the keys are `maskoff_cycle`,
/// `maskoff_entries` and `maskoff_insight`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    cycle: String,
    entries: String,
    insight: String,
}

impl StorageKeys {
    pub const DEFAULT_PREFIX: &'static str = "maskoff_";

    /// Builds keys under a namespace prefix.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            cycle: format!("{}cycle", prefix),
            entries: format!("{}entries", prefix),
            insight: format!("{}insight", prefix),
        }
    }

    pub fn cycle(&self) -> &str {
        &self.cycle
    }

    pub fn entries(&self) -> &str {
        &self.entries
    }

    pub fn insight(&self) -> &str {
        &self.insight
    }

    /// All three keys, in the order they are cleared.
    pub fn all(&self) -> [&str; 3] {
        [&self.cycle, &self.entries, &self.insight]
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_prefix(Self::DEFAULT_PREFIX)
    }
}
