//! Record identifiers.
//!
//! The SQL backend lets the store assign auto-increment integers. The
//! document and embedded backends generate a 12-byte [`ObjectId`] (4-byte
//! big-endian seconds, 5 process-unique random bytes, 3-byte counter) and
//! render it as 24 lowercase hex characters. Either way the canonical string
//! form is what travels through URLs, templates and composite storage keys.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::db::{DbError, DbResult};

/// Length of an object id in hex characters.
pub const OBJECT_ID_HEX_LEN: usize = 24;

fn process_unique() -> &'static [u8; 5] {
    static UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    UNIQUE.get_or_init(|| {
        let mut bytes = [0u8; 5];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes
    })
}

fn counter() -> &'static AtomicU32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER.get_or_init(|| AtomicU32::new(rand::thread_rng().next_u32()))
}

/// Generated 12-byte identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        let secs = u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX);
        let count = counter().fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Canonical lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse the canonical form: exactly 24 lowercase hex characters.
    /// Returns `None` for anything else, uppercase included.
    pub fn parse_str(s: &str) -> Option<Self> {
        if s.len() != OBJECT_ID_HEX_LEN
            || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return None;
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).ok()?;
        Some(Self(bytes))
    }

    /// Creation time embedded in the id (second precision).
    pub fn timestamp(&self) -> DateTime<Utc> {
        let mut secs = [0u8; 4];
        secs.copy_from_slice(&self.0[..4]);
        Utc.timestamp_opt(i64::from(u32::from_be_bytes(secs)), 0)
            .single()
            .unwrap_or_default()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s).ok_or(DbError::NoResult)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_str(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid object id '{}'", s)))
    }
}

/// Native identifier shape of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// Store-assigned auto-increment integer.
    Integer,
    /// Generated [`ObjectId`].
    Object,
}

/// Backend-native identifier. `Display` renders the canonical string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Object(ObjectId),
}

impl RecordId {
    /// Reconstruct a native id from its canonical string.
    ///
    /// Anything that is not the canonical rendering for `kind` is reported as
    /// [`DbError::NoResult`]: no record can carry such an id.
    pub fn parse(kind: IdKind, s: &str) -> DbResult<Self> {
        match kind {
            IdKind::Integer => {
                let n: i64 = s.parse().map_err(|_| DbError::NoResult)?;
                if n <= 0 || n.to_string() != s {
                    return Err(DbError::NoResult);
                }
                Ok(RecordId::Int(n))
            }
            IdKind::Object => s.parse::<ObjectId>().map(RecordId::Object),
        }
    }

    pub fn kind(&self) -> IdKind {
        match self {
            RecordId::Int(_) => IdKind::Integer,
            RecordId::Object(_) => IdKind::Object,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            RecordId::Int(n) => Some(*n),
            RecordId::Object(_) => None,
        }
    }

    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            RecordId::Object(oid) => Some(*oid),
            RecordId::Int(_) => None,
        }
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        RecordId::Object(oid)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Object(oid) => write!(f, "{}", oid),
        }
    }
}
