// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Record schema: an id, a parent reference, and an opaque field bag.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record identifier.
pub type RecordId = u64;

/// Opaque, order-preserving payload carried by a record.
pub type Fields = serde_json::Map<String, Value>;

/// Wire literal for [`ParentRef::Root`].
pub const ROOT_SENTINEL: &str = "root";

/// Parent link of a record.
///
/// On the wire this is either an integer id or the string [`ROOT_SENTINEL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawParent", into = "RawParent")]
pub enum ParentRef {
    /// No parent; the record is a root.
    Root,
    /// Id of the parent record (may be dangling).
    Node(RecordId),
}

impl ParentRef {
    /// Parent id, or `None` for the root sentinel.
    pub fn node(self) -> Option<RecordId> {
        match self {
            Self::Root => None,
            Self::Node(id) => Some(id),
        }
    }

    /// Returns `true` for the root sentinel.
    pub fn is_root(self) -> bool {
        matches!(self, Self::Root)
    }
}

impl From<RecordId> for ParentRef {
    fn from(id: RecordId) -> Self {
        Self::Node(id)
    }
}

impl std::fmt::Display for ParentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => f.write_str(ROOT_SENTINEL),
            Self::Node(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawParent {
    Node(RecordId),
    Sentinel(String),
}

impl TryFrom<RawParent> for ParentRef {
    type Error = String;

    fn try_from(raw: RawParent) -> Result<Self, Self::Error> {
        match raw {
            RawParent::Node(id) => Ok(Self::Node(id)),
            RawParent::Sentinel(s) if s == ROOT_SENTINEL => Ok(Self::Root),
            RawParent::Sentinel(s) => Err(format!(
                "parent must be an integer id or \"{ROOT_SENTINEL}\", got \"{s}\""
            )),
        }
    }
}

impl From<ParentRef> for RawParent {
    fn from(parent: ParentRef) -> Self {
        match parent {
            ParentRef::Root => Self::Sentinel(ROOT_SENTINEL.to_owned()),
            ParentRef::Node(id) => Self::Node(id),
        }
    }
}

/// A single tree-structured record.
///
/// `fields` holds every key besides `id` and `parent`, in input order. The
/// index never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique key.
    pub id: RecordId,
    /// Parent link.
    pub parent: ParentRef,
    /// Additional payload, returned verbatim.
    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    /// Create a record with an empty payload.
    pub fn new(id: RecordId, parent: impl Into<ParentRef>) -> Self {
        Self {
            id,
            parent: parent.into(),
            fields: Fields::new(),
        }
    }

    /// Create a root record with an empty payload.
    pub fn root(id: RecordId) -> Self {
        Self::new(id, ParentRef::Root)
    }

    /// Append a payload field (replaces an existing key in place).
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a payload field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns `true` if the parent is the root sentinel.
    pub fn is_root(&self) -> bool {
        self.parent.is_root()
    }
}
