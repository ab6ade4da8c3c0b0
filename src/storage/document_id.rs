//! Store-assigned document identifiers.
//!
//! A [`DocumentId`] is 12 bytes: a big-endian creation second, five bytes unique to
//! the generator, and a big-endian 24-bit counter. It renders as 24 lowercase hex
//! characters. Byte order and string order agree, so sorting identifiers sorts
//! documents by creation second and then by insertion within the generator.
//!
//! ```rust
//! use grocery_list::storage::{DocumentId, DocumentIdGenerator};
//!
//! let generator = DocumentIdGenerator::new();
//! let first = generator.next_id();
//! let second = generator.next_id();
//! assert!(second > first);
//!
//! let parsed = DocumentId::parse(&first.to_string()).unwrap();
//! assert_eq!(parsed, first);
//! ```

use crate::storage::StorageError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

const ID_LEN: usize = 12;
const COUNTER_MASK: u32 = 0x00FF_FFFF;

/// A validated, store-assigned document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId([u8; ID_LEN]);

impl DocumentId {
    /// Parse the 24 character hex form.
    ///
    /// Anything else fails with [`StorageError::InvalidQuery`], the same way a store
    /// rejects a lookup value it cannot cast to its identifier type.
    pub fn parse(value: &str) -> Result<Self, StorageError> {
        let cast_error =
            || StorageError::invalid_query("Cast to DocumentId failed", value.to_string());

        if value.len() != ID_LEN * 2 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(cast_error());
        }

        let mut bytes = [0u8; ID_LEN];
        for (index, byte) in bytes.iter_mut().enumerate() {
            let pair = &value[index * 2..index * 2 + 2];
            *byte = u8::from_str_radix(pair, 16).map_err(|_| cast_error())?;
        }

        Ok(Self(bytes))
    }

    /// The creation second encoded in the identifier.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let seconds = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(i64::from(seconds), 0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for DocumentId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DocumentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Produces increasing [`DocumentId`]s for a single store.
///
/// Callers that need strict ordering must serialise calls to [`next_id`](Self::next_id)
/// with the write that persists the document. The stamped second never goes
/// backwards, even when the system clock does.
#[derive(Debug)]
pub struct DocumentIdGenerator {
    unique: [u8; 5],
    counter: AtomicU32,
    last_second: AtomicU32,
}

impl DocumentIdGenerator {
    /// Create a generator with a random unique segment.
    pub fn new() -> Self {
        let random = uuid::Uuid::new_v4();
        let mut unique = [0u8; 5];
        unique.copy_from_slice(&random.as_bytes()[..5]);

        Self {
            unique,
            counter: AtomicU32::new(0),
            last_second: AtomicU32::new(0),
        }
    }

    /// Generate the next identifier, stamped with the current second.
    pub fn next_id(&self) -> DocumentId {
        self.next_id_at(Utc::now())
    }

    fn next_id_at(&self, now: DateTime<Utc>) -> DocumentId {
        let now = now.timestamp().clamp(0, i64::from(u32::MAX)) as u32;
        let seconds = self.last_second.fetch_max(now, Ordering::Relaxed).max(now);
        let count = self.counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&self.unique);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

        DocumentId(bytes)
    }
}

impl Default for DocumentIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
