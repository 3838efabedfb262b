use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One child of a listed directory, as returned by the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "WireEntry")]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
    pub size: Option<u64>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Identity of an entry across fetches. Listings are fetched fresh every
/// time, so selection and context targets key on this instead of the entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryKey {
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    pub fn dir(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_dir: true,
            size: None,
            modified_at: None,
        }
    }

    pub fn file(name: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            is_dir: false,
            size: Some(size),
            modified_at: None,
        }
    }

    pub fn key(&self) -> EntryKey {
        EntryKey {
            name: self.name.clone(),
            is_dir: self.is_dir,
        }
    }
}

impl EntryKey {
    pub fn dir(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_dir: true,
        }
    }

    pub fn file(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_dir: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireEntry {
    name: String,
    directory: bool,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    modified: Option<WireTimestamp>,
}

/// The backend may send epoch milliseconds or an ISO-8601 string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    Millis(i64),
    Text(String),
}

impl WireTimestamp {
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            WireTimestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            WireTimestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|d| d.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                        .ok()
                        .map(|naive| naive.and_utc())
                }),
        }
    }
}

impl From<WireEntry> for Entry {
    fn from(wire: WireEntry) -> Self {
        let modified_at = wire.modified.as_ref().and_then(WireTimestamp::to_utc);
        Self {
            name: wire.name,
            is_dir: wire.directory,
            size: if wire.directory { None } else { wire.size },
            modified_at,
        }
    }
}

/// JSON body of the rename request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest<'a> {
    pub old_name: &'a str,
    pub new_name: &'a str,
    pub user_path: &'a str,
}
