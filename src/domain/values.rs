//! Value objects shared by every entity.
//!
//! Identifiers are store-native object ids that travel over the wire as
//! 24-character hex strings; timestamps are UTC instants.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

// =============================================================================
// Record Identifier
// =============================================================================

/// Raised when an identifier string is not a valid 24-character hex object id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier: '{0}'")]
pub struct InvalidIdentifier(pub String);

/// Identifier of a stored record (user, task list or task).
///
/// Wraps the document store's native `ObjectId` so that an identifier which
/// fails to parse is rejected before any query is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Parses a hex string into a `RecordId`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIdentifier`] if `value` is not 24 hex characters.
    pub fn parse(value: &str) -> Result<Self, InvalidIdentifier> {
        ObjectId::parse_str(value)
            .map(Self)
            .map_err(|_| InvalidIdentifier(value.to_string()))
    }

    /// Generates a fresh identifier.
    ///
    /// Only the in-memory adapters call this; the document store assigns
    /// identifiers itself.
    #[must_use]
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Wraps a store-native object id.
    #[must_use]
    pub const fn from_object_id(object_id: ObjectId) -> Self {
        Self(object_id)
    }

    /// Returns the store-native object id.
    #[must_use]
    pub const fn as_object_id(&self) -> &ObjectId {
        &self.0
    }

    /// Returns the 24-character lowercase hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0.to_hex())
    }
}

impl std::str::FromStr for RecordId {
    type Err = InvalidIdentifier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Timestamp
// =============================================================================

/// A timestamp wrapper for `DateTime<Utc>`.
///
/// Serialized as RFC 3339 in JSON. The persistence adapter converts to the
/// store's native datetime itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a `Timestamp` from a `DateTime<Utc>`.
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Creates a `Timestamp` from milliseconds since the UNIX epoch.
    ///
    /// Out-of-range values clamp to the epoch.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(DateTime::from_timestamp_millis(millis).unwrap_or_default())
    }

    /// Returns the inner `DateTime<Utc>`.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns milliseconds since the UNIX epoch.
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the current time as a `Timestamp`.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0.to_rfc3339())
    }
}
