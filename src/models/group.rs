//! Group document: the top-level object of one roster `.json` file.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::Member;

/// Display name given to a group created without one.
pub const DEFAULT_GROUP_NAME: &str = "New Group";

/// A roster group as stored on disk.
///
/// `uuid` is the document's identity and is independent of the filename it
/// is stored under. Every mutation refreshes `last_updated` via
/// [`Group::touch`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    pub name: String,
    pub uuid: String,
    /// RFC 3339 UTC timestamp of the last mutation.
    pub last_updated: String,
    pub formation_bonus: String,
    pub group_label: String,
    /// Display order is insertion order.
    pub members: Vec<Member>,
    /// Keys not modelled above, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Group {
    /// A fresh, empty group with a new identity and the current timestamp.
    pub fn new(name: String, formation_bonus: String, group_label: String) -> Self {
        Self {
            name,
            uuid: Uuid::new_v4().to_string(),
            last_updated: timestamp_now(),
            formation_bonus,
            group_label,
            members: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Refresh `last_updated` to the current time.
    pub fn touch(&mut self) {
        self.last_updated = timestamp_now();
    }

    /// Look up a member by uuid.
    pub fn member(&self, uuid: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.uuid == uuid)
    }
}

/// Current UTC time, microsecond precision.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
