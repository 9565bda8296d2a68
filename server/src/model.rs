//! Time entry documents and the payloads that create or modify them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Store-assigned identifier of an entry. Serialized as `_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for EntryId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single time-tracking record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(rename = "_id")]
    pub id: EntryId,
    #[serde(with = "entry_date")]
    pub date: DateTime<Utc>,
    pub in_time: String,
    pub out_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Entry {
    pub fn new(id: EntryId, input: NewEntry) -> Self {
        Self {
            id,
            date: input.date,
            in_time: input.in_time,
            out_time: input.out_time,
            location: input.location,
        }
    }

    /// Replaces every field the patch carries; the id never changes.
    pub fn apply(&mut self, patch: EntryPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(in_time) = patch.in_time {
            self.in_time = in_time;
        }
        if let Some(out_time) = patch.out_time {
            self.out_time = out_time;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
    }
}

/// Body of `POST /api`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    #[serde(deserialize_with = "entry_date::deserialize")]
    pub date: DateTime<Utc>,
    pub in_time: String,
    pub out_time: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// Body of `PUT /api/{id}`. Absent fields are left untouched; `location`
/// may also be sent as `null` to clear it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[serde(default, deserialize_with = "entry_date::deserialize_option")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub in_time: Option<String>,
    #[serde(default)]
    pub out_time: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub location: Option<Option<String>>,
}

// Only runs when the key is present, so `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Serde adapter for the `date` field: written as RFC 3339 UTC with
/// milliseconds, read from any form [`crate::dates::parse_entry_date`]
/// understands or from integer epoch milliseconds.
pub mod entry_date {
    use chrono::{DateTime, Local, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::dates::{from_epoch_millis, parse_entry_date};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DateInput {
        Millis(i64),
        Text(String),
    }

    impl DateInput {
        fn resolve<E: de::Error>(self) -> Result<DateTime<Utc>, E> {
            match self {
                DateInput::Millis(millis) => from_epoch_millis(millis),
                DateInput::Text(text) => parse_entry_date(&text, &Local),
            }
            .map_err(E::custom)
        }
    }

    pub fn serialize<S: Serializer>(
        date: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        DateInput::deserialize(deserializer)?.resolve()
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<DateInput>::deserialize(deserializer)?
            .map(DateInput::resolve)
            .transpose()
    }
}
