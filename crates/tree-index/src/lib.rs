// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Immutable in-memory index over a flat list of parent-linked records.
//!
//! A [`TreeIndex`] is built once from an ordered `Vec<Record>` and answers
//! three kinds of query against precomputed tables:
//!
//! - point lookup by id ([`TreeIndex::item`]),
//! - direct children in input order ([`TreeIndex::children`]),
//! - the ancestor chain from the top-most resolvable ancestor down to the
//!   queried record ([`TreeIndex::ancestry`]).
//!
//! # Absence Semantics
//!
//! `item` and `ancestry` return `None` for unknown ids. `children` never
//! does: an id with no children and an id that is not a record both yield an
//! empty list. Use `item` to tell the two apart.
//!
//! # Malformed Input
//!
//! Nothing is validated. Dangling parent references truncate ancestor chains
//! silently, duplicate ids resolve to the last occurrence, and parent cycles
//! are cut off after `len()` steps.
#![forbid(unsafe_code)]

mod index;
mod load;
mod record;

pub use index::TreeIndex;
pub use load::{records_from_json_slice, records_from_reader, records_to_json_vec, LoadError};
pub use record::{Fields, ParentRef, Record, RecordId, ROOT_SENTINEL};
